//! Satellite lookups run in the background.
//!
//! N2YO searches, CelesTrak element sets and ephemeris files are fetched on
//! the Tokio runtime; results come back over an `async_channel` and are
//! applied to [`SatelliteResults`] once per frame.

use std::path::PathBuf;

use bevy::prelude::*;
use satscope_data::ephemeris::DEFAULT_ROW_LIMIT;
use satscope_data::n2yo::MAX_SEARCH_RADIUS_DEG;
use satscope_data::{
    AboveResponse, ApiConfig, Client, EphemerisRow, ObservationTime, PositionsResponse,
    SatelliteRecord, load_ephemeris, sample_ephemeris,
};
use satscope_geodesy::SearchCone;
use satscope_geodesy::wgs84::MEAN_RADIUS_KM;

use crate::async_runtime::TaskSpawner;
use crate::launch_params::LaunchParams;

/// Length of a tracked pass in seconds (N2YO allows up to 300).
pub const TRACK_SECONDS: u32 = 300;

/// Plugin for background satellite lookups.
pub struct LookupPlugin;

impl Plugin for LookupPlugin {
    fn build(&self, app: &mut App) {
        let params = app
            .world()
            .get_resource::<LaunchParams>()
            .cloned()
            .unwrap_or_default();

        let mut config = ApiConfig::default();
        if let Some(key) = &params.api_key {
            config.set_api_key(key);
        }

        let mut state = LookupState::default();
        match Client::new(config) {
            Ok(client) => {
                app.insert_resource(DataClient(client));
            }
            Err(e) => state.report_error(format!("HTTP client unavailable: {e}")),
        }

        app.insert_resource(state)
            .insert_resource(SearchTarget::from(&params))
            .init_resource::<SatelliteResults>()
            .add_systems(Startup, load_startup_ephemeris)
            .add_systems(Update, poll_lookup_results);
    }
}

/// Shared data client for all lookups.
#[derive(Resource, Clone)]
pub struct DataClient(pub Client);

/// Ground location the scene is centred on.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SearchTarget {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl From<&LaunchParams> for SearchTarget {
    fn from(params: &LaunchParams) -> Self {
        Self {
            lat: params.lat,
            lon: params.lon,
            radius_km: params.radius_km,
        }
    }
}

impl SearchTarget {
    /// Cone from the Earth's centre through the search area.
    pub fn cone(&self) -> SearchCone {
        SearchCone::new(self.lat, self.lon, self.radius_km, MEAN_RADIUS_KM)
    }
}

/// Where the current results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    N2yo,
    Ephemeris,
    Sample,
    Celestrak,
}

/// Results shown in the table and plotted in the scene.
#[derive(Resource, Default)]
pub struct SatelliteResults {
    pub records: Vec<SatelliteRecord>,
    pub source: Option<ResultSource>,
    /// Predicted positions of a single satellite, drawn as a polyline.
    pub track: Vec<SatelliteRecord>,
    generation: u64,
}

impl SatelliteResults {
    fn replace(&mut self, source: ResultSource, records: Vec<SatelliteRecord>) {
        self.records = records;
        self.source = Some(source);
        self.track.clear();
        self.generation += 1;
    }

    /// Bumped whenever the record set is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Kind of background lookup; one of each may be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Search,
    Ephemeris,
    Tle,
    Track,
}

/// Parameters for an N2YO `/above` search.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest {
    pub target: SearchTarget,
    pub sky_radius_deg: f64,
    pub category: u32,
    pub time: ObservationTime,
}

struct LookupOutcome {
    kind: LookupKind,
    /// Results generation the lookup was started against.
    generation: u64,
    result: Result<Vec<SatelliteRecord>, String>,
}

/// State for background lookups and the status line.
#[derive(Resource)]
pub struct LookupState {
    pub status: String,
    pub error: Option<String>,
    pending: Vec<LookupKind>,
    result_rx: async_channel::Receiver<LookupOutcome>,
    result_tx: async_channel::Sender<LookupOutcome>,
}

impl Default for LookupState {
    fn default() -> Self {
        let (result_tx, result_rx) = async_channel::unbounded();
        Self {
            status: "Ready".to_string(),
            error: None,
            pending: Vec::new(),
            result_rx,
            result_tx,
        }
    }
}

impl LookupState {
    /// Whether a lookup of this kind is in flight.
    pub fn is_pending(&self, kind: LookupKind) -> bool {
        self.pending.contains(&kind)
    }

    /// Show an informational message.
    pub fn report(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.error = None;
    }

    /// Show an error in the status bar and the panel.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.status.clone_from(&message);
        self.error = Some(message);
    }

    /// Mark a lookup as started. Returns false if one is already in flight.
    fn begin(&mut self, kind: LookupKind, status: String) -> bool {
        if self.is_pending(kind) {
            return false;
        }
        self.pending.push(kind);
        self.report(status);
        true
    }

    fn finish(&mut self, kind: LookupKind) {
        self.pending.retain(|k| *k != kind);
    }

    /// Start an N2YO search for satellites above the target.
    pub fn start_search(
        &mut self,
        request: SearchRequest,
        client: &DataClient,
        spawner: &TaskSpawner<'_>,
    ) {
        if !client.0.config().has_api_key() {
            self.report_error("Please set an API key first");
            return;
        }
        if !self.begin(LookupKind::Search, "Searching satellites...".to_string()) {
            return;
        }

        tracing::info!(
            lat = request.target.lat,
            lon = request.target.lon,
            radius_km = request.target.radius_km,
            time = %request.time,
            "starting satellite search"
        );

        let tx = self.result_tx.clone();
        let client = client.0.clone();
        spawner.spawn(async move {
            let sky_radius = request.sky_radius_deg.clamp(0.0, MAX_SEARCH_RADIUS_DEG);
            let result = client
                .satellites_above(
                    request.target.lat,
                    request.target.lon,
                    0.0,
                    sky_radius,
                    request.category,
                )
                .await
                .map(|response| above_records(&response))
                .map_err(|e| e.to_string());
            let _ = tx
                .send(LookupOutcome {
                    kind: LookupKind::Search,
                    generation: 0,
                    result,
                })
                .await;
        });
    }

    /// Start loading an ephemeris file.
    pub fn start_ephemeris_load(&mut self, path: PathBuf, spawner: &TaskSpawner<'_>) {
        if !self.begin(
            LookupKind::Ephemeris,
            format!("Loading {}...", path.display()),
        ) {
            return;
        }

        let tx = self.result_tx.clone();
        spawner.spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || load_ephemeris(&path, DEFAULT_ROW_LIMIT))
                    .await
                    .map_err(|e| format!("loader task failed: {e}"))
                    .and_then(|loaded| loaded.map_err(|e| e.to_string()))
                    .map(|rows| ephemeris_records(&rows));
            let _ = tx
                .send(LookupOutcome {
                    kind: LookupKind::Ephemeris,
                    generation: 0,
                    result,
                })
                .await;
        });
    }

    /// Replace the results with the built-in sample data set.
    pub fn load_sample(&mut self, time: ObservationTime, results: &mut SatelliteResults) {
        let records = ephemeris_records(&sample_ephemeris(time));
        self.report(format!(
            "Loaded {} satellite positions from sample data",
            records.len()
        ));
        results.replace(ResultSource::Sample, records);
    }

    /// Start fetching a CelesTrak element set group.
    pub fn start_tle(&mut self, group: String, client: &DataClient, spawner: &TaskSpawner<'_>) {
        let group = group.trim().to_string();
        if group.is_empty() {
            self.report_error("Please enter a CelesTrak group");
            return;
        }
        if !self.begin(LookupKind::Tle, format!("Fetching TLE group {group}...")) {
            return;
        }

        let tx = self.result_tx.clone();
        let client = client.0.clone();
        spawner.spawn(async move {
            let result = client
                .celestrak_tle(&group)
                .await
                .map(|entries| entries.iter().map(SatelliteRecord::from_tle).collect())
                .map_err(|e| e.to_string());
            let _ = tx
                .send(LookupOutcome {
                    kind: LookupKind::Tle,
                    generation: 0,
                    result,
                })
                .await;
        });
    }

    /// Start fetching the predicted pass of one satellite.
    ///
    /// The pass is dropped if the results are replaced before it arrives.
    pub fn start_track(
        &mut self,
        norad_id: u32,
        target: SearchTarget,
        generation: u64,
        client: &DataClient,
        spawner: &TaskSpawner<'_>,
    ) {
        if !self.begin(LookupKind::Track, format!("Tracking {norad_id}...")) {
            return;
        }

        let tx = self.result_tx.clone();
        let client = client.0.clone();
        spawner.spawn(async move {
            let result = client
                .satellite_positions(norad_id, target.lat, target.lon, 0.0, TRACK_SECONDS)
                .await
                .map(|response| track_records(&response))
                .map_err(|e| e.to_string());
            let _ = tx
                .send(LookupOutcome {
                    kind: LookupKind::Track,
                    generation,
                    result,
                })
                .await;
        });
    }
}

fn above_records(response: &AboveResponse) -> Vec<SatelliteRecord> {
    response
        .above
        .iter()
        .map(SatelliteRecord::from_above)
        .collect()
}

fn ephemeris_records(rows: &[EphemerisRow]) -> Vec<SatelliteRecord> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| SatelliteRecord::from_ephemeris(index, row))
        .collect()
}

fn track_records(response: &PositionsResponse) -> Vec<SatelliteRecord> {
    response
        .positions
        .iter()
        .map(|position| SatelliteRecord::from_position(&response.info, position))
        .collect()
}

/// Number of records whose position falls inside the search cone.
pub fn count_within(records: &[SatelliteRecord], cone: &SearchCone) -> usize {
    records
        .iter()
        .filter_map(|record| record.cartesian)
        .filter(|position| cone.contains(*position))
        .count()
}

/// Status line for a completed lookup.
fn completion_message(
    kind: LookupKind,
    records: &[SatelliteRecord],
    target: &SearchTarget,
) -> String {
    let count = records.len();
    match kind {
        LookupKind::Search => format!(
            "Found {count} satellites ({} within {} km)",
            count_within(records, &target.cone()),
            target.radius_km
        ),
        LookupKind::Ephemeris => format!("Loaded {count} satellite positions from local data"),
        LookupKind::Tle => format!("Loaded {count} element sets from CelesTrak"),
        LookupKind::Track => match records.first() {
            Some(first) => format!("Tracked {} over {count} samples", first.name),
            None => "No track samples returned".to_string(),
        },
    }
}

fn failure_prefix(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Search => "Search failed",
        LookupKind::Ephemeris => "Load failed",
        LookupKind::Tle => "TLE lookup failed",
        LookupKind::Track => "Track failed",
    }
}

/// Load the ephemeris file named on the command line, if any.
#[allow(clippy::needless_pass_by_value)]
fn load_startup_ephemeris(
    params: Option<Res<LaunchParams>>,
    mut state: ResMut<LookupState>,
    spawner: TaskSpawner,
) {
    if let Some(path) = params.and_then(|p| p.ephemeris.clone()) {
        state.start_ephemeris_load(path, &spawner);
    }
}

/// Apply finished lookups to the results.
#[allow(clippy::needless_pass_by_value)]
fn poll_lookup_results(
    mut state: ResMut<LookupState>,
    mut results: ResMut<SatelliteResults>,
    target: Res<SearchTarget>,
) {
    while let Ok(outcome) = state.result_rx.try_recv() {
        apply_outcome(&mut state, &mut results, &target, outcome);
    }
}

fn apply_outcome(
    state: &mut LookupState,
    results: &mut SatelliteResults,
    target: &SearchTarget,
    outcome: LookupOutcome,
) {
    state.finish(outcome.kind);
    if outcome.kind == LookupKind::Track && outcome.generation != results.generation {
        tracing::debug!("dropping track for replaced results");
        return;
    }
    match outcome.result {
        Ok(records) => {
            let message = completion_message(outcome.kind, &records, target);
            tracing::info!("{message}");
            state.report(message);
            match outcome.kind {
                LookupKind::Search => results.replace(ResultSource::N2yo, records),
                LookupKind::Ephemeris => results.replace(ResultSource::Ephemeris, records),
                LookupKind::Tle => results.replace(ResultSource::Celestrak, records),
                LookupKind::Track => results.track = records,
            }
        }
        Err(e) => {
            state.report_error(format!("{}: {e}", failure_prefix(outcome.kind)));
        }
    }
}
