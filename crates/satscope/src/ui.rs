//! Control panel, results table and status bar.

use std::path::PathBuf;

use bevy::{ecs::system::SystemParam, prelude::*};
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use egui_extras::{Column, TableBuilder};
use satscope_data::{ObservationTime, SatelliteRecord};

use crate::async_runtime::TaskSpawner;
use crate::camera::OrbitCamera;
use crate::launch_params::LaunchParams;
use crate::lookup::{
    DataClient, LookupKind, LookupState, ResultSource, SatelliteResults, SearchRequest,
    SearchTarget,
};

/// Plugin for the egui panels.
pub struct PanelPlugin;

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        let form = app
            .world()
            .get_resource::<LaunchParams>()
            .map(SearchForm::from)
            .unwrap_or_default();

        app.add_plugins(EguiPlugin::default())
            .insert_resource(form)
            .add_systems(EguiPrimaryContextPass, panel_system);
    }
}

/// Text fields of the control panel.
#[derive(Resource, Debug, Clone)]
pub struct SearchForm {
    pub api_key: String,
    pub time: String,
    pub lat: String,
    pub lon: String,
    pub radius: String,
    pub sky_radius: String,
    pub ephemeris_path: String,
    pub tle_group: String,
    pub category: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::from(&LaunchParams::default())
    }
}

impl From<&LaunchParams> for SearchForm {
    fn from(params: &LaunchParams) -> Self {
        Self {
            api_key: params.api_key.clone().unwrap_or_default(),
            time: params.time.to_string(),
            lat: params.lat.to_string(),
            lon: params.lon.to_string(),
            radius: params.radius_km.to_string(),
            sky_radius: params.sky_radius_deg.to_string(),
            ephemeris_path: params
                .ephemeris
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            tle_group: "stations".to_string(),
            category: params.category,
        }
    }
}

fn parse_number(text: &str, name: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("Invalid {name}: expected a number, got {text:?}"))
}

impl SearchForm {
    /// Target location and radius from the form.
    pub fn target(&self) -> Result<SearchTarget, String> {
        let lat = parse_number(&self.lat, "latitude")?;
        let lon = parse_number(&self.lon, "longitude")?;
        let radius_km = parse_number(&self.radius, "radius")?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude out of range: {lat}"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude out of range: {lon}"));
        }
        if radius_km <= 0.0 {
            return Err(format!("Radius must be positive: {radius_km}"));
        }
        Ok(SearchTarget {
            lat,
            lon,
            radius_km,
        })
    }

    /// Observation time from the form.
    pub fn observation_time(&self) -> Result<ObservationTime, String> {
        self.time
            .parse::<ObservationTime>()
            .map_err(|e| format!("Invalid observation time: {e}"))
    }

    /// Full search request from the form.
    pub fn request(&self) -> Result<SearchRequest, String> {
        let target = self.target()?;
        let sky_radius_deg = parse_number(&self.sky_radius, "sky radius")?;
        let time = self.observation_time()?;
        Ok(SearchRequest {
            target,
            sky_radius_deg,
            category: self.category,
            time,
        })
    }
}

/// A button press collected while drawing, applied afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelAction {
    SetApiKey,
    Search,
    Visualize,
    LoadEphemeris,
    LoadSample,
    FetchTle,
    Track(u32),
}

/// Resources used by the panels.
#[derive(SystemParam)]
struct PanelParams<'w, 's> {
    form: ResMut<'w, SearchForm>,
    state: ResMut<'w, LookupState>,
    results: ResMut<'w, SatelliteResults>,
    target: ResMut<'w, SearchTarget>,
    client: Option<ResMut<'w, DataClient>>,
    spawner: TaskSpawner<'w>,
    cameras: Query<'w, 's, &'static mut OrbitCamera>,
}

fn panel_system(mut contexts: EguiContexts, mut params: PanelParams) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut action = None;

    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if params.state.error.is_some() {
                ui.colored_label(egui::Color32::RED, &params.state.status);
            } else {
                ui.label(&params.state.status);
            }
        });
    });

    egui::SidePanel::left("controls")
        .default_width(260.0)
        .show(ctx, |ui| {
            render_controls(ui, &mut params.form, &params.state, &mut action);
        });

    egui::Window::new("Results")
        .default_pos([300.0, 10.0])
        .default_width(560.0)
        .show(ctx, |ui| {
            render_results(ui, &params.results, &params.state, &mut action);
        });

    if let Some(action) = action {
        apply_action(action, &mut params);
    }

    Ok(())
}

fn render_controls(
    ui: &mut egui::Ui,
    form: &mut SearchForm,
    state: &LookupState,
    action: &mut Option<PanelAction>,
) {
    ui.heading("Search parameters");

    ui.label("N2YO API key:");
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut form.api_key)
                .password(true)
                .desired_width(150.0),
        );
        if ui.button("Set API key").clicked() {
            *action = Some(PanelAction::SetApiKey);
        }
    });

    ui.separator();

    egui::Grid::new("search_fields")
        .num_columns(2)
        .show(ui, |ui| {
            for (label, text) in [
                ("Time (UTC):", &mut form.time),
                ("Latitude:", &mut form.lat),
                ("Longitude:", &mut form.lon),
                ("Radius (km):", &mut form.radius),
                ("Sky radius (deg):", &mut form.sky_radius),
            ] {
                ui.label(label);
                ui.add(egui::TextEdit::singleline(text).desired_width(140.0));
                ui.end_row();
            }
        });

    ui.horizontal(|ui| {
        let searching = state.is_pending(LookupKind::Search);
        if ui
            .add_enabled(!searching, egui::Button::new("Search satellites"))
            .clicked()
        {
            *action = Some(PanelAction::Search);
        }
        if searching {
            ui.spinner();
        }
    });
    if ui
        .button("Visualize in 3D")
        .on_hover_text("Centre the view on the target")
        .clicked()
    {
        *action = Some(PanelAction::Visualize);
    }

    ui.separator();
    ui.label("Local ephemeris:");
    ui.add(
        egui::TextEdit::singleline(&mut form.ephemeris_path)
            .hint_text("path/to/ephemeris.csv")
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                !state.is_pending(LookupKind::Ephemeris),
                egui::Button::new("Load ephemeris"),
            )
            .clicked()
        {
            *action = Some(PanelAction::LoadEphemeris);
        }
        if ui.button("Load sample").clicked() {
            *action = Some(PanelAction::LoadSample);
        }
    });

    ui.separator();
    ui.label("CelesTrak group:");
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut form.tle_group).desired_width(120.0));
        if ui
            .add_enabled(
                !state.is_pending(LookupKind::Tle),
                egui::Button::new("Fetch TLE"),
            )
            .clicked()
        {
            *action = Some(PanelAction::FetchTle);
        }
    });

    if let Some(ref error) = state.error {
        ui.separator();
        ui.colored_label(egui::Color32::RED, error);
    }

    ui.separator();
    ui.label("Drag to rotate, scroll to zoom.");
}

fn format_cell(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

fn render_results(
    ui: &mut egui::Ui,
    results: &SatelliteResults,
    state: &LookupState,
    action: &mut Option<PanelAction>,
) {
    if results.records.is_empty() {
        ui.label("No results yet.");
        return;
    }

    let trackable = results.source == Some(ResultSource::N2yo);
    let tracking = state.is_pending(LookupKind::Track);

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::remainder().at_least(120.0))
        .column(Column::exact(80.0))
        .column(Column::exact(80.0))
        .column(Column::exact(80.0))
        .column(Column::exact(80.0));
    if trackable {
        table = table.column(Column::exact(50.0));
    }

    table
        .header(20.0, |mut header| {
            for title in ["Name", "ID", "Latitude", "Longitude", "Altitude (km)"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
            if trackable {
                header.col(|_| {});
            }
        })
        .body(|body| {
            body.rows(18.0, results.records.len(), |mut row| {
                let record: &SatelliteRecord = &results.records[row.index()];
                let geodetic = record.geodetic;
                row.col(|ui| {
                    ui.label(&record.name);
                });
                row.col(|ui| {
                    ui.label(&record.id);
                });
                row.col(|ui| {
                    ui.label(format_cell(geodetic.map(|g| g.latitude), 4));
                });
                row.col(|ui| {
                    ui.label(format_cell(geodetic.map(|g| g.longitude), 4));
                });
                row.col(|ui| {
                    ui.label(format_cell(geodetic.map(|g| g.altitude), 2));
                });
                if trackable {
                    row.col(|ui| {
                        if let Ok(norad_id) = record.id.parse::<u32>()
                            && ui
                                .add_enabled(!tracking, egui::Button::new("Track"))
                                .clicked()
                        {
                            *action = Some(PanelAction::Track(norad_id));
                        }
                    });
                }
            });
        });
}

fn apply_action(action: PanelAction, params: &mut PanelParams) {
    match action {
        PanelAction::SetApiKey => {
            let key = params.form.api_key.trim().to_string();
            if key.is_empty() {
                params.state.report_error("Please enter an API key");
                return;
            }
            let Some(client) = params.client.as_mut() else {
                params.state.report_error("HTTP client unavailable");
                return;
            };
            client.0.set_api_key(&key);
            params.state.report("API key set successfully");
        }
        PanelAction::Search => {
            let request = match params.form.request() {
                Ok(request) => request,
                Err(e) => {
                    params.state.report_error(e);
                    return;
                }
            };
            let Some(client) = params.client.as_deref() else {
                params.state.report_error("HTTP client unavailable");
                return;
            };
            *params.target = request.target;
            params.state.start_search(request, client, &params.spawner);
        }
        PanelAction::Visualize => {
            let target = match params.form.target() {
                Ok(target) => target,
                Err(e) => {
                    params.state.report_error(e);
                    return;
                }
            };
            let plottable = params
                .results
                .records
                .iter()
                .filter(|record| record.is_plottable())
                .count();
            if plottable == 0 {
                params.state.report_error("No data to visualize");
                return;
            }
            *params.target = target;
            for mut camera in &mut params.cameras {
                *camera = OrbitCamera::facing(&target);
            }
            params.state.report(format!(
                "Showing {plottable} satellites around {:.4}, {:.4}",
                target.lat, target.lon
            ));
        }
        PanelAction::LoadEphemeris => {
            let path = params.form.ephemeris_path.trim();
            if path.is_empty() {
                params.state.report_error("Please enter an ephemeris file path");
                return;
            }
            let path = PathBuf::from(path);
            params.state.start_ephemeris_load(path, &params.spawner);
        }
        PanelAction::LoadSample => {
            match params.form.observation_time() {
                Ok(time) => params.state.load_sample(time, &mut params.results),
                Err(e) => params.state.report_error(e),
            }
        }
        PanelAction::FetchTle => {
            let Some(client) = params.client.as_deref() else {
                params.state.report_error("HTTP client unavailable");
                return;
            };
            let group = params.form.tle_group.clone();
            params.state.start_tle(group, client, &params.spawner);
        }
        PanelAction::Track(norad_id) => {
            let Some(client) = params.client.as_deref() else {
                params.state.report_error("HTTP client unavailable");
                return;
            };
            let target = *params.target;
            let generation = params.results.generation();
            params
                .state
                .start_track(norad_id, target, generation, client, &params.spawner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_defaults() {
        let form = SearchForm::default();
        let request = form.request().unwrap();
        assert!((request.target.lat - 40.7128).abs() < 1e-12);
        assert!((request.target.lon + 74.006).abs() < 1e-12);
        assert!((request.target.radius_km - 100.0).abs() < f64::EPSILON);
        assert_eq!(request.time, ObservationTime::default());
        assert_eq!(form.time, "2025-01-01T00:00:00");
    }

    #[test]
    fn test_invalid_number_reported() {
        let form = SearchForm {
            lat: "north".to_string(),
            ..SearchForm::default()
        };
        let error = form.target().unwrap_err();
        assert!(error.starts_with("Invalid latitude"), "{error}");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let form = SearchForm {
            lon: "200".to_string(),
            ..SearchForm::default()
        };
        assert!(form.target().unwrap_err().contains("Longitude"));

        let form = SearchForm {
            radius: "0".to_string(),
            ..SearchForm::default()
        };
        assert!(form.target().unwrap_err().contains("Radius"));
    }

    #[test]
    fn test_bad_time_rejected() {
        let form = SearchForm {
            time: "tomorrow".to_string(),
            ..SearchForm::default()
        };
        assert!(
            form.request()
                .unwrap_err()
                .starts_with("Invalid observation time")
        );
    }

    #[test]
    fn test_observation_time_for_sample() {
        let form = SearchForm {
            time: "2024-06-21 12:00:00".to_string(),
            ..SearchForm::default()
        };
        assert_eq!(
            form.observation_time().unwrap().to_string(),
            "2024-06-21T12:00:00"
        );

        let form = SearchForm {
            time: "2024-02-30T00:00:00".to_string(),
            ..SearchForm::default()
        };
        let error = form.observation_time().unwrap_err();
        assert!(error.starts_with("Invalid observation time"), "{error}");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(Some(40.712_81), 4), "40.7128");
        assert_eq!(format_cell(Some(418.234), 2), "418.23");
        assert_eq!(format_cell(None, 2), "-");
    }
}
