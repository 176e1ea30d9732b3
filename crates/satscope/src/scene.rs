//! 3D scene: the globe, the target, satellite markers and overlays.
//!
//! The scene is laid out in ECEF kilometers with Z up, so converter output
//! can be placed directly. Markers are meshes rebuilt whenever the results or
//! target change; pins, the search cone, the axes and any tracked pass are
//! drawn with gizmos every frame.

use bevy::light::light_consts::lux;
use bevy::prelude::*;
use satscope_data::SatelliteRecord;
use satscope_geodesy::wgs84::MEAN_RADIUS_KM;
use satscope_geodesy::{CartesianPosition, SearchCone, geodetic_to_cartesian};

use crate::lookup::{SatelliteResults, SearchTarget};

/// Half-length of each drawn coordinate axis in kilometers.
pub const AXIS_RANGE_KM: f32 = 25_000.0;
/// Number of rim points used to draw the search cone.
const CONE_SEGMENTS: usize = 24;
const MARKER_RADIUS_KM: f32 = 120.0;
const TARGET_RADIUS_KM: f32 = 150.0;

const EARTH_COLOR: Color = Color::srgba(0.2, 0.4, 1.0, 0.3);
const TARGET_COLOR: Color = Color::srgb(0.1, 0.9, 0.2);
const INSIDE_COLOR: Color = Color::srgb(0.95, 0.1, 0.1);
const OUTSIDE_COLOR: Color = Color::srgb(1.0, 0.6, 0.1);
const PIN_COLOR: Color = Color::BLACK;
const CONE_COLOR: Color = Color::srgba(0.1, 0.9, 0.2, 0.5);
const TRACK_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);

/// Plugin for the globe scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_globe).add_systems(
            Update,
            (
                sync_target_marker,
                rebuild_satellite_markers,
                draw_overlays,
            ),
        );
    }
}

/// Marker component for the ground target.
#[derive(Component)]
pub struct TargetMarker;

/// Marker component for a plotted satellite.
#[derive(Component)]
pub struct SatelliteMarker;

/// Shared mesh and materials for satellite markers.
#[derive(Resource)]
struct MarkerAssets {
    mesh: Handle<Mesh>,
    inside: Handle<StandardMaterial>,
    outside: Handle<StandardMaterial>,
}

/// Convert a Cartesian position to a render-space point.
#[allow(clippy::cast_possible_truncation)]
pub fn to_render(position: CartesianPosition) -> Vec3 {
    position.as_dvec3().as_vec3()
}

/// Line from a record's projection on the globe up to the record itself.
pub fn pin_segment(record: &SatelliteRecord, sphere_radius_km: f64) -> Option<(Vec3, Vec3)> {
    let position = record.cartesian?;
    let foot = position.project_to_sphere(sphere_radius_km)?;
    Some((to_render(foot), to_render(position)))
}

/// Lines outlining the cone: apex-to-rim spokes, then the rim itself.
pub fn cone_lines(cone: &SearchCone, segments: usize) -> Vec<(Vec3, Vec3)> {
    let apex = to_render(cone.apex);
    let rim: Vec<Vec3> = cone.rim(segments).into_iter().map(to_render).collect();

    let spokes = rim.iter().map(|point| (apex, *point));
    let ring = rim
        .iter()
        .zip(rim.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b));
    spokes.chain(ring).collect()
}

fn marker_material(
    assets: &MarkerAssets,
    cone: &SearchCone,
    position: CartesianPosition,
) -> Handle<StandardMaterial> {
    if cone.contains(position) {
        assets.inside.clone()
    } else {
        assets.outside.clone()
    }
}

fn unlit(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    }
}

/// Spawn the globe, the light and the target marker.
#[allow(clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
fn setup_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    target: Res<SearchTarget>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(MEAN_RADIUS_KM as f32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: EARTH_COLOR,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        TargetMarker,
        Mesh3d(meshes.add(Sphere::new(TARGET_RADIUS_KM))),
        MeshMaterial3d(materials.add(unlit(TARGET_COLOR))),
        Transform::from_translation(to_render(geodetic_to_cartesian(target.lat, target.lon, 0.0))),
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: lux::AMBIENT_DAYLIGHT,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(-1.0, -0.5, -0.3), Vec3::Z),
    ));

    commands.insert_resource(MarkerAssets {
        mesh: meshes.add(Sphere::new(MARKER_RADIUS_KM)),
        inside: materials.add(unlit(INSIDE_COLOR)),
        outside: materials.add(unlit(OUTSIDE_COLOR)),
    });
}

/// Move the target marker when the target changes.
#[allow(clippy::needless_pass_by_value)]
fn sync_target_marker(
    target: Res<SearchTarget>,
    mut markers: Query<&mut Transform, With<TargetMarker>>,
) {
    if !target.is_changed() {
        return;
    }
    let translation = to_render(geodetic_to_cartesian(target.lat, target.lon, 0.0));
    for mut transform in &mut markers {
        transform.translation = translation;
    }
}

/// Respawn satellite markers when the results or the target change.
#[allow(clippy::needless_pass_by_value)]
fn rebuild_satellite_markers(
    mut commands: Commands,
    results: Res<SatelliteResults>,
    target: Res<SearchTarget>,
    assets: Option<Res<MarkerAssets>>,
    existing: Query<Entity, With<SatelliteMarker>>,
) {
    let Some(assets) = assets else {
        return;
    };
    if !results.is_changed() && !target.is_changed() && !assets.is_added() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let cone = target.cone();
    let mut plotted = 0usize;
    for position in results.records.iter().filter_map(|record| record.cartesian) {
        commands.spawn((
            SatelliteMarker,
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(marker_material(&assets, &cone, position)),
            Transform::from_translation(to_render(position)),
        ));
        plotted += 1;
    }
    tracing::debug!(plotted, "rebuilt satellite markers");
}

/// Draw pins, the search cone, the axes and any tracked pass.
#[allow(clippy::needless_pass_by_value)]
fn draw_overlays(mut gizmos: Gizmos, results: Res<SatelliteResults>, target: Res<SearchTarget>) {
    gizmos.line(
        Vec3::new(-AXIS_RANGE_KM, 0.0, 0.0),
        Vec3::new(AXIS_RANGE_KM, 0.0, 0.0),
        Color::srgb(0.8, 0.3, 0.3),
    );
    gizmos.line(
        Vec3::new(0.0, -AXIS_RANGE_KM, 0.0),
        Vec3::new(0.0, AXIS_RANGE_KM, 0.0),
        Color::srgb(0.3, 0.8, 0.3),
    );
    gizmos.line(
        Vec3::new(0.0, 0.0, -AXIS_RANGE_KM),
        Vec3::new(0.0, 0.0, AXIS_RANGE_KM),
        Color::srgb(0.3, 0.3, 0.8),
    );

    for (start, end) in cone_lines(&target.cone(), CONE_SEGMENTS) {
        gizmos.line(start, end, CONE_COLOR);
    }

    for (foot, tip) in results
        .records
        .iter()
        .filter_map(|record| pin_segment(record, MEAN_RADIUS_KM))
    {
        gizmos.line(foot, tip, PIN_COLOR);
    }

    let track: Vec<Vec3> = results
        .track
        .iter()
        .filter_map(|record| record.cartesian.map(to_render))
        .collect();
    for pair in track.windows(2) {
        gizmos.line(pair[0], pair[1], TRACK_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use satscope_data::{EphemerisRow, sample_ephemeris};

    use super::*;

    fn record_at(position: CartesianPosition) -> SatelliteRecord {
        let row = EphemerisRow {
            time: "t".to_string(),
            position,
            velocity: None,
        };
        SatelliteRecord::from_ephemeris(0, &row)
    }

    #[test]
    fn test_pin_starts_on_sphere() {
        let record = record_at(CartesianPosition::new(5000.0, -3000.0, 4000.0));
        let (foot, tip) = pin_segment(&record, MEAN_RADIUS_KM).unwrap();
        assert!((foot.length() - 6371.0).abs() < 0.01);
        assert!((tip - Vec3::new(5000.0, -3000.0, 4000.0)).length() < 1e-3);
        assert!(foot.normalize().dot(tip.normalize()) > 0.999_999);
    }

    #[test]
    fn test_no_pin_without_position() {
        let mut record = record_at(CartesianPosition::new(1.0, 2.0, 3.0));
        record.cartesian = None;
        assert!(pin_segment(&record, MEAN_RADIUS_KM).is_none());
        let origin = record_at(CartesianPosition::ORIGIN);
        assert!(pin_segment(&origin, MEAN_RADIUS_KM).is_none());
    }

    #[test]
    fn test_cone_lines_close_the_rim() {
        let cone = SearchCone::new(40.7128, -74.006, 100.0, MEAN_RADIUS_KM);
        let lines = cone_lines(&cone, 8);
        assert_eq!(lines.len(), 16);
        assert!(lines[..8].iter().all(|(start, _)| *start == Vec3::ZERO));
        assert_eq!(lines[15].1, lines[8].0);
    }

    #[test]
    fn test_sample_data_within_axis_range() {
        for row in sample_ephemeris(satscope_data::ObservationTime::default()) {
            let point = to_render(row.position);
            assert!(point.abs().max_element() < AXIS_RANGE_KM);
        }
    }
}
