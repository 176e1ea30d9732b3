//! Endpoint configuration for the data sources.

use std::time::Duration;

/// Default N2YO REST endpoint.
pub const N2YO_BASE_URL: &str = "https://api.n2yo.com/rest/v1/satellite";

/// Default CelesTrak GP element endpoint.
pub const CELESTRAK_BASE_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints, credentials and timeouts for [`crate::Client`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// N2YO API key; `None` disables N2YO requests.
    pub n2yo_api_key: Option<String>,
    pub n2yo_base_url: String,
    pub celestrak_base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            n2yo_api_key: None,
            n2yo_base_url: N2YO_BASE_URL.to_string(),
            celestrak_base_url: CELESTRAK_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Set the N2YO API key.
    ///
    /// Surrounding whitespace is ignored and a blank key clears it.
    #[must_use]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.set_api_key(key);
        self
    }

    /// Set or clear the N2YO API key in place.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.n2yo_api_key = (!key.is_empty()).then(|| key.to_string());
    }

    /// Whether an N2YO API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.n2yo_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_key() {
        let config = ApiConfig::default();
        assert!(!config.has_api_key());
        assert!(config.n2yo_base_url.starts_with("https://"));
        assert!(config.celestrak_base_url.starts_with("https://"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_api_key_trimmed() {
        let config = ApiConfig::default().with_api_key("  ABC-123 \n");
        assert_eq!(config.n2yo_api_key.as_deref(), Some("ABC-123"));
    }

    #[test]
    fn test_blank_key_clears() {
        let mut config = ApiConfig::default().with_api_key("key");
        config.set_api_key("   ");
        assert!(!config.has_api_key());
    }
}
