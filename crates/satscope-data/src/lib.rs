//! Satellite lookups from N2YO and CelesTrak, plus local ephemeris loading.
//!
//! This crate is the data-access layer of satscope. It fetches satellites
//! above a ground location from the N2YO REST API, element sets from
//! CelesTrak, and reads Cartesian ephemeris exports from disk. Each source is
//! reduced to [`SatelliteRecord`]s carrying both geodetic and ECEF positions.
//!
//! # Example
//!
//! ```ignore
//! use satscope_data::{ApiConfig, Client, SatelliteRecord};
//!
//! let client = Client::new(ApiConfig::default().with_api_key("KEY"))?;
//! let above = client.satellites_above(40.7, -74.0, 0.0, 10.0, 0).await?;
//! let records: Vec<_> = above.above.iter().map(SatelliteRecord::from_above).collect();
//! ```

mod client;
pub mod config;
pub mod ephemeris;
mod error;
pub mod n2yo;
mod record;
pub mod time;
mod tle;

pub use client::Client;
pub use config::ApiConfig;
pub use ephemeris::{EphemerisRow, load_ephemeris, parse_ephemeris, sample_ephemeris};
pub use error::{Error, Result};
pub use n2yo::{AboveResponse, AboveSatellite, PositionsResponse, SatellitePosition};
pub use record::SatelliteRecord;
pub use time::ObservationTime;
pub use tle::{TleEntry, parse_tle};
