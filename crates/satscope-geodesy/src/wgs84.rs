//! WGS84 reference ellipsoid parameters.

/// Semi-major (equatorial) axis in meters.
pub const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// Flattening.
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// First eccentricity squared, `2f - f²`.
pub const ECCENTRICITY_SQ: f64 = 2.0 * FLATTENING - FLATTENING * FLATTENING;

/// Semi-minor (polar) axis in meters.
pub const SEMI_MINOR_AXIS_M: f64 = SEMI_MAJOR_AXIS_M * (1.0 - FLATTENING);

/// Mean Earth radius in kilometers, used for the spherical globe in plots.
pub const MEAN_RADIUS_KM: f64 = 6371.0;

/// Meters per kilometer.
pub(crate) const M_PER_KM: f64 = 1000.0;

/// Number of latitude refinement passes in the Cartesian to geodetic solver.
pub(crate) const LATITUDE_ITERATIONS: usize = 5;

/// Prime-vertical radius of curvature (meters) at the given latitude (radians).
#[must_use]
pub fn prime_vertical_radius(lat_rad: f64) -> f64 {
    let sin_lat = lat_rad.sin();
    SEMI_MAJOR_AXIS_M / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eccentricity_matches_axes() {
        // e² = 1 - b²/a².
        let from_axes =
            1.0 - (SEMI_MINOR_AXIS_M * SEMI_MINOR_AXIS_M) / (SEMI_MAJOR_AXIS_M * SEMI_MAJOR_AXIS_M);
        assert!((ECCENTRICITY_SQ - from_axes).abs() < 1e-14);
    }

    #[test]
    fn test_prime_vertical_radius_at_equator() {
        assert!((prime_vertical_radius(0.0) - SEMI_MAJOR_AXIS_M).abs() < 1e-9);
    }

    #[test]
    fn test_prime_vertical_radius_grows_towards_pole() {
        let equator = prime_vertical_radius(0.0);
        let mid = prime_vertical_radius(45_f64.to_radians());
        let pole = prime_vertical_radius(90_f64.to_radians());
        assert!(equator < mid);
        assert!(mid < pole);
        // N at the pole is a²/b.
        let expected = SEMI_MAJOR_AXIS_M * SEMI_MAJOR_AXIS_M / SEMI_MINOR_AXIS_M;
        assert!((pole - expected).abs() < 1e-6);
    }
}
