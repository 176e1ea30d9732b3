//! WGS84 conversions between ECEF and geodetic coordinates.
//!
//! This crate holds the coordinate math used by satscope: converting satellite
//! positions reported as latitude/longitude/altitude into Earth-centered,
//! Earth-fixed Cartesian coordinates for plotting, and back again for
//! ephemeris records that arrive as Cartesian vectors.
//!
//! # Design principles
//!
//! - **Pure**: no I/O, no shared state; every function is safe to call from
//!   any thread
//! - **Kilometers at the edges**: inputs and outputs use km, the ellipsoid
//!   math runs in meters internally
//! - **Bounded work**: the inverse conversion uses a fixed iteration count
//!
//! # Example
//!
//! ```
//! use satscope_geodesy::{GeodeticPosition, cartesian_to_geodetic};
//!
//! let iss = GeodeticPosition::new(51.6, -0.1, 420.0);
//! let ecef = iss.to_cartesian();
//! let back = cartesian_to_geodetic(ecef.x, ecef.y, ecef.z).unwrap();
//! assert!((back.altitude - 420.0).abs() < 0.01);
//! ```

mod cone;
mod error;
mod position;
pub mod wgs84;

pub use cone::{CONE_HEIGHT_KM, SearchCone};
pub use error::{GeodesyError, GeodesyResult};
pub use position::{
    CartesianPosition, GeodeticPosition, cartesian_to_geodetic, geodetic_to_cartesian,
};
