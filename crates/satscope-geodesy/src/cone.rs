//! Search-area cone around a ground target.
//!
//! The cone has its apex at the Earth's centre and opens towards the target so
//! that its footprint on the globe is a circle of the search radius.

use glam::DVec3;

use crate::position::{CartesianPosition, geodetic_to_cartesian};

/// Length of the cone along its axis, in kilometers.
pub const CONE_HEIGHT_KM: f64 = 20_000.0;

/// A cone from the Earth's centre through a circular search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchCone {
    /// Apex, always the Earth's centre.
    pub apex: CartesianPosition,
    /// Target point on the ellipsoid surface; also the cone axis direction.
    pub target_surface: CartesianPosition,
    /// Length along the axis in kilometers.
    pub height: f64,
    /// Half-angle of the cone in radians.
    pub half_angle: f64,
}

impl SearchCone {
    /// Build the cone for a target and search radius.
    ///
    /// `sphere_radius_km` is the radius used to turn the ground search radius
    /// into an opening angle.
    #[must_use]
    pub fn new(target_lat: f64, target_lon: f64, radius_km: f64, sphere_radius_km: f64) -> Self {
        Self {
            apex: CartesianPosition::ORIGIN,
            target_surface: geodetic_to_cartesian(target_lat, target_lon, 0.0),
            height: CONE_HEIGHT_KM,
            half_angle: (radius_km / sphere_radius_km).atan(),
        }
    }

    /// Unit vector along the cone axis.
    #[must_use]
    pub fn axis(&self) -> DVec3 {
        self.target_surface.as_dvec3().normalize_or_zero()
    }

    /// Whether a point lies within the cone's angular extent.
    ///
    /// Distance along the axis is not limited, so anything in the right
    /// direction counts regardless of altitude.
    #[must_use]
    pub fn contains(&self, point: CartesianPosition) -> bool {
        let direction = point.as_dvec3().normalize_or_zero();
        if direction == DVec3::ZERO {
            return false;
        }
        let cos_angle = direction.dot(self.axis()).clamp(-1.0, 1.0);
        cos_angle.acos() <= self.half_angle
    }

    /// Points around the rim of the cone's far end, for drawing.
    #[must_use]
    pub fn rim(&self, segments: usize) -> Vec<CartesianPosition> {
        let axis = self.axis();
        if axis == DVec3::ZERO || segments == 0 {
            return Vec::new();
        }

        // Any vector not parallel to the axis gives a perpendicular basis.
        let helper = if axis.z.abs() < 0.9 {
            DVec3::Z
        } else {
            DVec3::X
        };
        let u = axis.cross(helper).normalize();
        let v = axis.cross(u);

        let rim_radius = self.height * self.half_angle.tan();
        let centre = axis * self.height;

        (0..segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let theta = std::f64::consts::TAU * i as f64 / segments as f64;
                let offset = (u * theta.cos() + v * theta.sin()) * rim_radius;
                CartesianPosition::from(centre + offset)
            })
            .collect()
    }
}
