//! Launch parameter parsing for the viewer.
//!
//! Parameters come from the command line via clap. The API key may also be
//! supplied through the `N2YO_API_KEY` environment variable.

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;
use satscope_data::ObservationTime;
use satscope_data::n2yo::CATEGORY_ALL;

/// Default target latitude (New York City).
pub const DEFAULT_LAT: f64 = 40.7128;
/// Default target longitude (New York City).
pub const DEFAULT_LON: f64 = -74.0060;
/// Default ground search radius in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;
/// Default N2YO sky search radius in degrees from zenith.
pub const DEFAULT_SKY_RADIUS_DEG: f64 = 70.0;

/// Launch parameters for the viewer.
#[derive(Resource, Debug, Clone)]
pub struct LaunchParams {
    /// Target latitude in degrees.
    pub lat: f64,
    /// Target longitude in degrees.
    pub lon: f64,
    /// Ground search radius in kilometers.
    pub radius_km: f64,
    /// Sky search radius sent to N2YO, in degrees.
    pub sky_radius_deg: f64,
    pub time: ObservationTime,
    pub api_key: Option<String>,
    /// N2YO satellite category; 0 means all.
    pub category: u32,
    /// Ephemeris file to load at startup.
    pub ephemeris: Option<PathBuf>,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            lon: DEFAULT_LON,
            radius_km: DEFAULT_RADIUS_KM,
            sky_radius_deg: DEFAULT_SKY_RADIUS_DEG,
            time: ObservationTime::default(),
            api_key: None,
            category: CATEGORY_ALL,
            ephemeris: None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Find and plot satellites above a ground location")]
struct CliArgs {
    /// Target latitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LAT, allow_hyphen_values = true)]
    lat: f64,

    /// Target longitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LON, allow_hyphen_values = true)]
    lon: f64,

    /// Ground search radius in kilometers.
    #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
    radius: f64,

    /// N2YO sky search radius in degrees from zenith (0-90).
    #[arg(long, default_value_t = DEFAULT_SKY_RADIUS_DEG)]
    sky_radius: f64,

    /// Observation time in UTC (format: YYYY-MM-DDTHH:MM:SS).
    #[arg(long, default_value_t = ObservationTime::default())]
    time: ObservationTime,

    /// N2YO API key.
    #[arg(long, env = "N2YO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// N2YO satellite category (0 = all).
    #[arg(long, default_value_t = CATEGORY_ALL)]
    category: u32,

    /// Ephemeris CSV file to load at startup.
    #[arg(long)]
    ephemeris: Option<PathBuf>,
}

impl From<CliArgs> for LaunchParams {
    fn from(args: CliArgs) -> Self {
        Self {
            lat: args.lat,
            lon: args.lon,
            radius_km: args.radius,
            sky_radius_deg: args.sky_radius,
            time: args.time,
            api_key: args.api_key.filter(|key| !key.trim().is_empty()),
            category: args.category,
            ephemeris: args.ephemeris,
        }
    }
}

/// Parse launch parameters from the command line.
pub fn parse() -> LaunchParams {
    CliArgs::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> LaunchParams {
        CliArgs::try_parse_from(std::iter::once("satscope").chain(args.iter().copied()))
            .unwrap()
            .into()
    }

    #[test]
    fn test_defaults() {
        let params = parse_from(&[]);
        assert!((params.lat - DEFAULT_LAT).abs() < f64::EPSILON);
        assert!((params.lon - DEFAULT_LON).abs() < f64::EPSILON);
        assert!((params.radius_km - DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
        assert_eq!(params.time, ObservationTime::default());
        assert_eq!(params.category, CATEGORY_ALL);
        assert!(params.ephemeris.is_none());
    }

    #[test]
    fn test_negative_coordinates_and_time() {
        let params = parse_from(&[
            "--lat",
            "-33.8688",
            "--lon",
            "151.2093",
            "--time",
            "2024-06-21 12:00:00",
            "--ephemeris",
            "landsat.csv",
        ]);
        assert!((params.lat + 33.8688).abs() < 1e-12);
        assert_eq!(params.time.to_string(), "2024-06-21T12:00:00");
        assert_eq!(params.ephemeris, Some(PathBuf::from("landsat.csv")));
    }

    #[test]
    fn test_rejects_bad_time() {
        let result = CliArgs::try_parse_from(["satscope", "--time", "2024-02-30T00:00:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let params = parse_from(&["--api-key", "  "]);
        assert!(params.api_key.is_none());
    }
}
