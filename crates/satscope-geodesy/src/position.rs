//! Geodetic and ECEF position types and the conversions between them.
//!
//! All public distances are in kilometers; the ellipsoid math runs in meters
//! internally because the WGS84 constants are defined that way.

use glam::DVec3;

use crate::error::{GeodesyError, GeodesyResult};
use crate::wgs84::{
    ECCENTRICITY_SQ, LATITUDE_ITERATIONS, M_PER_KM, SEMI_MINOR_AXIS_M, prime_vertical_radius,
};

/// A position referenced to the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPosition {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Height above the ellipsoid in kilometers.
    pub altitude: f64,
}

impl GeodeticPosition {
    /// Create a new geodetic position.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Convert to Earth-centered, Earth-fixed coordinates.
    #[must_use]
    pub fn to_cartesian(&self) -> CartesianPosition {
        geodetic_to_cartesian(self.latitude, self.longitude, self.altitude)
    }
}

/// A position in the Earth-centered, Earth-fixed frame, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartesianPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPosition {
    /// The Earth's centre.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new ECEF position.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert to geodetic coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesyError::DegeneratePosition`] for the Earth's centre and
    /// [`GeodesyError::NonFinite`] if any component is NaN or infinite.
    pub fn to_geodetic(&self) -> GeodesyResult<GeodeticPosition> {
        cartesian_to_geodetic(self.x, self.y, self.z)
    }

    /// Distance from the Earth's centre in kilometers.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.as_dvec3().length()
    }

    /// Scale this position radially onto a sphere of the given radius.
    ///
    /// Returns `None` for the origin, which has no direction.
    #[must_use]
    pub fn project_to_sphere(&self, radius_km: f64) -> Option<Self> {
        let norm = self.norm();
        if norm <= 0.0 || !norm.is_finite() {
            return None;
        }
        Some((self.as_dvec3() * (radius_km / norm)).into())
    }

    /// View as a `DVec3`.
    #[must_use]
    pub const fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<DVec3> for CartesianPosition {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<CartesianPosition> for DVec3 {
    fn from(p: CartesianPosition) -> Self {
        p.as_dvec3()
    }
}

/// Convert geodetic coordinates (degrees, degrees, km) to ECEF (km).
///
/// Any real input is accepted; latitudes outside ±90° give a mathematically
/// defined but physically meaningless result.
#[must_use]
pub fn geodetic_to_cartesian(lat_deg: f64, lon_deg: f64, alt_km: f64) -> CartesianPosition {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let alt = alt_km * M_PER_KM;

    let n = prime_vertical_radius(lat);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let x = (n + alt) * cos_lat * cos_lon;
    let y = (n + alt) * cos_lat * sin_lon;
    let z = (n * (1.0 - ECCENTRICITY_SQ) + alt) * sin_lat;

    CartesianPosition::new(x / M_PER_KM, y / M_PER_KM, z / M_PER_KM)
}

/// Convert ECEF coordinates (km) to geodetic (degrees, degrees, km).
///
/// Latitude is refined with a fixed number of iterations rather than a
/// convergence check, so every call does the same amount of work.
///
/// Points on the polar axis resolve to ±90° latitude and 0° longitude.
///
/// # Errors
///
/// Returns [`GeodesyError::DegeneratePosition`] for the exact Earth centre and
/// [`GeodesyError::NonFinite`] if any component is NaN, infinite, or too large
/// to express in meters.
#[allow(clippy::float_cmp)]
pub fn cartesian_to_geodetic(x_km: f64, y_km: f64, z_km: f64) -> GeodesyResult<GeodeticPosition> {
    let x = x_km * M_PER_KM;
    let y = y_km * M_PER_KM;
    let z = z_km * M_PER_KM;

    // Checked after scaling so values that overflow to meters are caught too.
    for (axis, value) in [('x', x), ('y', y), ('z', z)] {
        if !value.is_finite() {
            return Err(GeodesyError::NonFinite { axis });
        }
    }

    let p = x.hypot(y);

    if p == 0.0 {
        if z == 0.0 {
            return Err(GeodesyError::DegeneratePosition);
        }
        let lat = if z > 0.0 { 90.0 } else { -90.0 };
        let alt = z.abs() - SEMI_MINOR_AXIS_M;
        return Ok(GeodeticPosition::new(lat, 0.0, alt / M_PER_KM));
    }

    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - ECCENTRICITY_SQ));
    let mut alt = 0.0;
    for _ in 0..LATITUDE_ITERATIONS {
        let n = prime_vertical_radius(lat);
        alt = altitude_above_ellipsoid(p, z, lat, n);
        lat = z.atan2(p * (1.0 - ECCENTRICITY_SQ * n / (n + alt)));
    }

    Ok(GeodeticPosition::new(
        lat.to_degrees(),
        lon.to_degrees(),
        alt / M_PER_KM,
    ))
}

/// Height above the ellipsoid (meters) for a point at distance `p` from the
/// polar axis, height `z` above the equatorial plane and latitude `lat`.
///
/// `p / cos(lat) - N` loses all precision as `cos(lat)` approaches zero, so
/// above 45° the equivalent `z / sin(lat) - N(1 - e²)` is used instead.
fn altitude_above_ellipsoid(p: f64, z: f64, lat: f64, n: f64) -> f64 {
    let (sin_lat, cos_lat) = lat.sin_cos();
    if cos_lat.abs() >= sin_lat.abs() {
        p / cos_lat - n
    } else {
        z / sin_lat - n * (1.0 - ECCENTRICITY_SQ)
    }
}
