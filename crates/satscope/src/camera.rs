//! Orbit camera around the Earth's centre.
//!
//! Drag with the left mouse button to rotate, scroll to zoom. Input is
//! ignored while the pointer is over the egui panels.

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::input::egui_wants_any_pointer_input;

use crate::lookup::SearchTarget;

/// Closest the camera may get to the Earth's centre, in kilometers.
pub const MIN_DISTANCE_KM: f32 = 8_000.0;
/// Farthest the camera may get from the Earth's centre, in kilometers.
pub const MAX_DISTANCE_KM: f32 = 150_000.0;
/// Starting distance, enough to frame the drawn axes.
pub const DEFAULT_DISTANCE_KM: f32 = 45_000.0;

/// Pitch limit short of the poles, so the up vector stays well defined.
const MAX_PITCH: f32 = 1.5;

/// Plugin for orbit camera controls.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitSettings>().add_systems(
            Update,
            (
                (orbit_with_mouse, zoom_with_scroll).run_if(not(egui_wants_any_pointer_input)),
                apply_orbit,
            )
                .chain(),
        );
    }
}

/// Settings for camera input.
#[derive(Resource)]
pub struct OrbitSettings {
    /// Radians of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Zoom factor per scroll line.
    pub zoom_step: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.005,
            zoom_step: 1.1,
        }
    }
}

/// Camera orbiting the origin, looking at it with Z up.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Azimuth around the Z axis in radians.
    pub yaw: f32,
    /// Elevation above the equatorial plane in radians.
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.4,
            distance: DEFAULT_DISTANCE_KM,
        }
    }
}

impl OrbitCamera {
    /// Camera facing a ground target from above.
    #[allow(clippy::cast_possible_truncation)]
    pub fn facing(target: &SearchTarget) -> Self {
        Self {
            yaw: target.lon.to_radians() as f32,
            pitch: (target.lat.to_radians() as f32).clamp(-MAX_PITCH, MAX_PITCH),
            ..Default::default()
        }
    }

    /// Rotate by a yaw and pitch delta, keeping pitch off the poles.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Scale the distance, clamped to the allowed range.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE_KM, MAX_DISTANCE_KM);
    }

    /// Camera position for the current angles.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.distance * Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(Vec3::ZERO, Vec3::Z)
    }
}

/// Rotate while the left mouse button is held.
#[allow(clippy::needless_pass_by_value)]
fn orbit_with_mouse(
    mouse: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    settings: Res<OrbitSettings>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if !mouse.pressed(MouseButton::Left) || delta == Vec2::ZERO {
        return;
    }

    for mut camera in &mut cameras {
        camera.rotate(
            -delta.x * settings.mouse_sensitivity,
            delta.y * settings.mouse_sensitivity,
        );
    }
}

/// Zoom with the scroll wheel.
#[allow(clippy::needless_pass_by_value)]
fn zoom_with_scroll(
    mut scroll_events: MessageReader<MouseWheel>,
    settings: Res<OrbitSettings>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    for event in scroll_events.read() {
        // Normalize scroll value: some platforms report pixels, others lines.
        let scroll = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 120.0,
        };
        if scroll != 0.0 {
            let factor = settings.zoom_step.powf(-scroll);
            for mut camera in &mut cameras {
                camera.zoom(factor);
            }
        }
    }
}

/// Write the orbit state into the camera transform.
fn apply_orbit(mut cameras: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (camera, mut transform) in &mut cameras {
        *transform = camera.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let camera = OrbitCamera {
            yaw: 1.0,
            pitch: 0.3,
            distance: 20_000.0,
        };
        assert!((camera.position().length() - 20_000.0).abs() < 0.5);
    }

    #[test]
    fn test_facing_target() {
        let target = SearchTarget {
            lat: 0.0,
            lon: 90.0,
            radius_km: 100.0,
        };
        let direction = OrbitCamera::facing(&target).position().normalize();
        assert!((direction - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, 10.0);
        assert!((camera.pitch - MAX_PITCH).abs() < f32::EPSILON);
        camera.rotate(0.0, -20.0);
        assert!((camera.pitch + MAX_PITCH).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(0.001);
        assert!((camera.distance - MIN_DISTANCE_KM).abs() < f32::EPSILON);
        camera.zoom(1_000.0);
        assert!((camera.distance - MAX_DISTANCE_KM).abs() < f32::EPSILON);
    }

    #[test]
    fn test_transform_looks_at_origin() {
        let transform = OrbitCamera::default().transform();
        let forward = transform.forward().as_vec3();
        let to_origin = -transform.translation.normalize();
        assert!(forward.dot(to_origin) > 0.9999);
    }
}
