//! N2YO REST API response types.
//!
//! Field names follow the JSON exactly; N2YO reports altitude in kilometers
//! and angles in degrees.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Category id for "all satellites" in `/above` queries.
pub const CATEGORY_ALL: u32 = 0;

/// Largest search radius `/above` accepts, in degrees.
pub const MAX_SEARCH_RADIUS_DEG: f64 = 90.0;

/// Response of the `/above` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AboveResponse {
    pub info: AboveInfo,
    /// Absent when nothing is overhead.
    #[serde(default)]
    pub above: Vec<AboveSatellite>,
}

/// Summary block of an `/above` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AboveInfo {
    pub category: String,
    #[serde(rename = "transactionscount")]
    pub transactions_count: u32,
    #[serde(rename = "satcount")]
    pub sat_count: u32,
}

/// One satellite returned by `/above`.
#[derive(Debug, Clone, Deserialize)]
pub struct AboveSatellite {
    #[serde(rename = "satid")]
    pub sat_id: u32,
    #[serde(rename = "satname", default)]
    pub sat_name: Option<String>,
    #[serde(rename = "intDesignator", default)]
    pub int_designator: Option<String>,
    #[serde(rename = "launchDate", default)]
    pub launch_date: Option<String>,
    #[serde(rename = "satlat")]
    pub sat_lat: f64,
    #[serde(rename = "satlng")]
    pub sat_lng: f64,
    #[serde(rename = "satalt")]
    pub sat_alt: f64,
}

/// Response of the `/positions` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    pub info: PositionsInfo,
    #[serde(default)]
    pub positions: Vec<SatellitePosition>,
}

/// Summary block of a `/positions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsInfo {
    #[serde(rename = "satname")]
    pub sat_name: String,
    #[serde(rename = "satid")]
    pub sat_id: u32,
    #[serde(rename = "transactionscount")]
    pub transactions_count: u32,
}

/// A predicted position from `/positions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SatellitePosition {
    #[serde(rename = "satlatitude")]
    pub latitude: f64,
    #[serde(rename = "satlongitude")]
    pub longitude: f64,
    #[serde(rename = "sataltitude")]
    pub altitude: f64,
    pub azimuth: f64,
    pub elevation: f64,
    pub ra: f64,
    pub dec: f64,
    /// Unix time in seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub eclipsed: bool,
}

/// Decode an N2YO response body.
///
/// N2YO reports failures such as a bad API key as `{"error": "..."}` with a
/// success status, so the body is checked for that shape first.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(Error::Api {
            message: message.to_string(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABOVE_BODY: &str = r#"{
        "info": {"category": "ANY", "transactionscount": 17, "satcount": 2},
        "above": [
            {"satid": 20185, "satname": "USA 53", "intDesignator": "1989-061A",
             "launchDate": "1989-08-08", "satlat": 40.1, "satlng": -76.2, "satalt": 35000.1},
            {"satid": 25544, "satname": "SPACE STATION", "intDesignator": "1998-067A",
             "launchDate": "1998-11-20", "satlat": 41.5, "satlng": -73.0, "satalt": 418.2}
        ]
    }"#;

    #[test]
    fn test_decode_above() {
        let response: AboveResponse = decode(ABOVE_BODY).unwrap();
        assert_eq!(response.info.sat_count, 2);
        assert_eq!(response.info.transactions_count, 17);
        assert_eq!(response.above.len(), 2);
        let iss = &response.above[1];
        assert_eq!(iss.sat_id, 25544);
        assert_eq!(iss.sat_name.as_deref(), Some("SPACE STATION"));
        assert!((iss.sat_alt - 418.2).abs() < 1e-9);
    }

    #[test]
    fn test_decode_above_without_list() {
        let body = r#"{"info": {"category": "ANY", "transactionscount": 3, "satcount": 0}}"#;
        let response: AboveResponse = decode(body).unwrap();
        assert!(response.above.is_empty());
    }

    #[test]
    fn test_decode_positions() {
        let body = r#"{
            "info": {"satname": "SPACE STATION", "satid": 25544, "transactionscount": 5},
            "positions": [
                {"satlatitude": -39.9, "satlongitude": 158.3, "sataltitude": 417.6,
                 "azimuth": 254.5, "elevation": -69.7, "ra": 44.0, "dec": -43.6,
                 "timestamp": 1521354418, "eclipsed": true}
            ]
        }"#;
        let response: PositionsResponse = decode(body).unwrap();
        assert_eq!(response.info.sat_id, 25544);
        assert_eq!(response.positions.len(), 1);
        assert!(response.positions[0].eclipsed);
        assert_eq!(response.positions[0].timestamp, 1_521_354_418);
    }

    #[test]
    fn test_error_field_maps_to_api_error() {
        let result: Result<AboveResponse> = decode(r#"{"error": "Invalid API Key!"}"#);
        match result {
            Err(Error::Api { message }) => assert_eq!(message, "Invalid API Key!"),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_invalid_data() {
        let result: Result<AboveResponse> = decode("<html>busy</html>");
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }

    #[test]
    fn test_missing_fields_is_invalid_data() {
        let result: Result<AboveResponse> = decode(r#"{"above": []}"#);
        assert!(matches!(result, Err(Error::InvalidData { .. })));
    }
}
