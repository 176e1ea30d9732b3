//! Satellite records shown in the results table and plotted in 3D.
//!
//! Every source is reduced to the same shape: API results arrive geodetic and
//! get a Cartesian position for plotting, ephemeris rows arrive Cartesian and
//! get a geodetic position for display.

use satscope_geodesy::{CartesianPosition, GeodeticPosition};

use crate::ephemeris::EphemerisRow;
use crate::n2yo::{AboveSatellite, PositionsInfo, SatellitePosition};
use crate::tle::TleEntry;

/// Name shown when a source does not provide one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// One satellite, or one sample of a satellite's track.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRecord {
    pub name: String,
    pub id: String,
    pub geodetic: Option<GeodeticPosition>,
    pub cartesian: Option<CartesianPosition>,
    /// Sample time, for records taken from a time series.
    pub time: Option<String>,
}

impl SatelliteRecord {
    /// Build a record from an N2YO `/above` entry.
    #[must_use]
    pub fn from_above(satellite: &AboveSatellite) -> Self {
        let geodetic =
            GeodeticPosition::new(satellite.sat_lat, satellite.sat_lng, satellite.sat_alt);
        Self {
            name: satellite
                .sat_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            id: satellite.sat_id.to_string(),
            geodetic: Some(geodetic),
            cartesian: Some(geodetic.to_cartesian()),
            time: None,
        }
    }

    /// Build a record from one N2YO `/positions` sample.
    #[must_use]
    pub fn from_position(info: &PositionsInfo, position: &SatellitePosition) -> Self {
        let geodetic = GeodeticPosition::new(position.latitude, position.longitude, position.altitude);
        Self {
            name: info.sat_name.clone(),
            id: info.sat_id.to_string(),
            geodetic: Some(geodetic),
            cartesian: Some(geodetic.to_cartesian()),
            time: Some(position.timestamp.to_string()),
        }
    }

    /// Build a record from the `index`th (zero-based) ephemeris row.
    ///
    /// A row at the Earth's centre keeps its Cartesian position but has no
    /// geodetic one.
    #[must_use]
    pub fn from_ephemeris(index: usize, row: &EphemerisRow) -> Self {
        let number = index + 1;
        let geodetic = match row.position.to_geodetic() {
            Ok(geodetic) => Some(geodetic),
            Err(e) => {
                tracing::warn!(row = number, "skipping geodetic conversion: {e}");
                None
            }
        };
        Self {
            name: format!("Satellite_{number}"),
            id: format!("LOCAL_{number}"),
            geodetic,
            cartesian: Some(row.position),
            time: Some(row.time.clone()),
        }
    }

    /// Build a record from a TLE entry; it has no position until propagated.
    #[must_use]
    pub fn from_tle(entry: &TleEntry) -> Self {
        Self {
            name: entry.name.clone(),
            id: entry.norad_id.to_string(),
            geodetic: None,
            cartesian: None,
            time: None,
        }
    }

    /// Whether the record can be drawn in the 3D view.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.cartesian.is_some()
    }
}
