//! HTTP client for the N2YO and CelesTrak services.
//!
//! Requests are issued once; a failure is returned to the caller as an
//! [`Error`] without retrying.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::n2yo::{self, AboveResponse, PositionsResponse};
use crate::tle::{TleEntry, parse_tle};

/// User agent for API requests.
const USER_AGENT: &str = "satscope/0.1 (https://github.com/satscope/satscope)";

/// Query parameter carrying the N2YO key.
const API_KEY_PARAM: &str = "apiKey=";

/// HTTP client for satellite lookups.
///
/// Cloning is cheap: the underlying `reqwest::Client` is `Arc`-based, so
/// clones share the same connection pool.
///
/// # Example
///
/// ```ignore
/// let client = Client::new(ApiConfig::default().with_api_key("KEY"))?;
/// let above = client.satellites_above(40.7, -74.0, 0.0, 10.0, 0).await?;
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ApiConfig,
}

impl Client {
    /// Create a new client from a configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ClientBuild {
                message: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Set or clear the N2YO API key. A blank key clears it.
    pub fn set_api_key(&mut self, key: &str) {
        self.config.set_api_key(key);
    }

    /// Satellites currently above an observer.
    ///
    /// `observer_alt_m` is the observer's height above sea level in meters;
    /// `search_radius_deg` is the N2YO search radius (0–90°).
    pub async fn satellites_above(
        &self,
        lat: f64,
        lon: f64,
        observer_alt_m: f64,
        search_radius_deg: f64,
        category: u32,
    ) -> Result<AboveResponse> {
        let key = self.api_key()?;
        let url = format!(
            "{}/above/{lat}/{lon}/{observer_alt_m}/{search_radius_deg}/{category}/&{API_KEY_PARAM}{key}",
            self.config.n2yo_base_url
        );
        let response: AboveResponse = n2yo::decode(&self.fetch_text(&url).await?)?;
        tracing::info!(
            count = response.above.len(),
            transactions = response.info.transactions_count,
            "n2yo above lookup complete"
        );
        Ok(response)
    }

    /// Predicted positions of one satellite for the next `seconds` seconds.
    pub async fn satellite_positions(
        &self,
        norad_id: u32,
        lat: f64,
        lon: f64,
        observer_alt_m: f64,
        seconds: u32,
    ) -> Result<PositionsResponse> {
        let key = self.api_key()?;
        let url = format!(
            "{}/positions/{norad_id}/{lat}/{lon}/{observer_alt_m}/{seconds}/&{API_KEY_PARAM}{key}",
            self.config.n2yo_base_url
        );
        let response: PositionsResponse = n2yo::decode(&self.fetch_text(&url).await?)?;
        tracing::info!(
            norad_id,
            count = response.positions.len(),
            "n2yo positions lookup complete"
        );
        Ok(response)
    }

    /// Element sets for a CelesTrak group such as `stations`.
    pub async fn celestrak_tle(&self, group: &str) -> Result<Vec<TleEntry>> {
        let url = celestrak_url(&self.config.celestrak_base_url, group);
        let entries = parse_tle(&self.fetch_text(&url).await?)?;
        tracing::info!(group, count = entries.len(), "celestrak lookup complete");
        Ok(entries)
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .n2yo_api_key
            .as_deref()
            .ok_or(Error::MissingApiKey)
    }

    /// Fetch a URL and return the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let redacted = redact_api_key(url);
        tracing::debug!(url = %redacted, "fetching");

        let response = self.http.get(url).send().await.map_err(|e| Error::Http {
            url: redacted.clone(),
            message: e.without_url().to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: redacted,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Error::Http {
            url: redacted,
            message: e.without_url().to_string(),
        })
    }
}

fn celestrak_url(base: &str, group: &str) -> String {
    format!("{base}?GROUP={}&FORMAT=tle", urlencoding::encode(group))
}

/// Replace the value of the `apiKey` parameter so URLs can be logged.
pub(crate) fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find(API_KEY_PARAM).map(|i| i + API_KEY_PARAM.len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}***{}", &url[..start], &url[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_api_key() {
        let url = "https://api.n2yo.com/rest/v1/satellite/above/1/2/0/10/0/&apiKey=SECRET";
        let redacted = redact_api_key(url);
        assert!(!redacted.contains("SECRET"));
        assert!(redacted.ends_with("&apiKey=***"));
    }

    #[test]
    fn test_redact_keeps_following_params() {
        let redacted = redact_api_key("https://x/?apiKey=SECRET&other=1");
        assert_eq!(redacted, "https://x/?apiKey=***&other=1");
    }

    #[test]
    fn test_redact_without_key() {
        let url = "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle";
        assert_eq!(redact_api_key(url), url);
    }

    #[test]
    fn test_celestrak_url_encodes_group() {
        let url = celestrak_url("https://c/gp.php", "gps ops");
        assert_eq!(url, "https://c/gp.php?GROUP=gps%20ops&FORMAT=tle");
    }

    #[test]
    fn test_client_default_config() {
        let client = Client::new(ApiConfig::default()).unwrap();
        assert!(client.config().n2yo_base_url.starts_with("https://"));
        assert!(!client.config().has_api_key());
    }

    #[test]
    fn test_set_api_key() {
        let mut client = Client::new(ApiConfig::default()).unwrap();
        client.set_api_key("test_api_key");
        assert_eq!(client.config().n2yo_api_key.as_deref(), Some("test_api_key"));
    }

    #[tokio::test]
    async fn test_above_without_key_fails_fast() {
        // Unroutable base URL: reaching the network would produce an Http error instead.
        let config = ApiConfig {
            n2yo_base_url: "http://127.0.0.1:9".to_string(),
            ..ApiConfig::default()
        };
        let client = Client::new(config).unwrap();
        let result = client.satellites_above(0.0, 0.0, 0.0, 10.0, 0).await;
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_positions_without_key_fails_fast() {
        let client = Client::new(ApiConfig::default()).unwrap();
        let result = client.satellite_positions(25544, 0.0, 0.0, 0.0, 60).await;
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }
}
