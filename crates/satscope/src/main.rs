//! Desktop viewer for satellites above a ground location.
//!
//! Searches N2YO for satellites over a target, loads local ephemeris files
//! or CelesTrak element sets, and plots everything around a 3D globe.

mod async_runtime;
mod camera;
mod launch_params;
mod lookup;
mod scene;
mod ui;

use async_runtime::AsyncRuntimePlugin;
use bevy::prelude::*;
use camera::{OrbitCamera, OrbitCameraPlugin};
use lookup::{LookupPlugin, SearchTarget};
use scene::ScenePlugin;
use ui::PanelPlugin;

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((LookupPlugin, ScenePlugin, OrbitCameraPlugin, PanelPlugin))
            .add_systems(Startup, setup_camera);
    }
}

/// Spawn the camera facing the target.
#[allow(clippy::needless_pass_by_value)]
fn setup_camera(mut commands: Commands, target: Res<SearchTarget>) {
    let orbit = OrbitCamera::facing(&target);

    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: bevy::camera::ClearColorConfig::Custom(Color::srgb(0.02, 0.02, 0.05)),
            ..default()
        },
        orbit.transform(),
        Projection::Perspective(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_4,
            near: 10.0,
            far: 1_000_000.0, // Kilometers; well past the farthest zoom.
            ..Default::default()
        }),
        orbit,
    ));

    tracing::info!(
        lat = target.lat,
        lon = target.lon,
        "scene ready - drag to rotate, scroll to zoom"
    );
}

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let params = launch_params::parse();
    tracing::info!(time = %params.time, category = params.category, "starting satscope");

    let window = Window {
        title: "satscope".to_string(),
        resolution: (1280, 800).into(),
        ..Default::default()
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..Default::default()
        }))
        .add_plugins(AsyncRuntimePlugin)
        .insert_resource(params)
        .add_plugins(AppPlugin)
        .run();
}
