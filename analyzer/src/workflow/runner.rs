use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, bail, Context};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sogcore::prelude::{AnalysisStage, SeriesMode, Settings, VesselId};
use sogcore::processing::{BoatStatistics, CourseSectorMatcher, PositionIngest, TrackKinematics};
use sogcore::race_interface::{
    parse_positions_json, parse_race_setup_json, BoatSummary, RaceSetup, SectorMarker,
    SectorStat, SpeedSeries, VesselPositions,
};
use sogcore::telemetry::MetricsSnapshot;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One race as handed over by the host: setup plus raw positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceData {
    pub race_id: String,
    pub setup: RaceSetup,
    pub boats: Vec<VesselPositions>,
}

impl RaceData {
    pub fn load<P: AsRef<Path>>(race_id: &str, setup_path: P, positions_path: P) -> anyhow::Result<Self> {
        let setup_path = setup_path.as_ref();
        let positions_path = positions_path.as_ref();

        let setup_json = fs::read_to_string(setup_path)
            .with_context(|| format!("reading race setup {}", setup_path.display()))?;
        let setup = parse_race_setup_json(&setup_json)
            .with_context(|| format!("parsing race setup {}", setup_path.display()))?;

        let positions_json = fs::read_to_string(positions_path)
            .with_context(|| format!("reading positions {}", positions_path.display()))?;
        let boats = parse_positions_json(&positions_json)
            .with_context(|| format!("parsing positions {}", positions_path.display()))?;

        Ok(Self {
            race_id: race_id.to_string(),
            setup,
            boats,
        })
    }
}

/// Which boats a run covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Fleet,
    Boat(VesselId),
    Class(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatReport {
    pub id: VesselId,
    pub name: String,
    pub fixes: usize,
    pub series: SpeedSeries,
    pub summary: BoatSummary,
    pub sectors: Vec<SectorStat>,
    pub markers: Vec<SectorMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub race_id: String,
    pub settings: Settings,
    pub mode: SeriesMode,
    pub boats: Vec<BoatReport>,
    pub metrics: MetricsSnapshot,
}

struct Session {
    race_id: Option<String>,
    kinematics: TrackKinematics,
}

/// Runs the analysis pipeline; clones share one ceiling memo.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    session: Arc<Mutex<Session>>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(Session {
                race_id: None,
                kinematics: TrackKinematics::new(),
            })),
        }
    }

    pub fn execute(&self, race: &RaceData, selection: &Selection) -> anyhow::Result<WorkflowResult> {
        let settings = self.config.to_settings()?;
        let mode = self.config.mode();

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("analysis session lock poisoned"))?;
        let session = &mut *session;

        if session.race_id.as_deref() != Some(race.race_id.as_str()) {
            session.kinematics.cleanup();
            session.race_id = Some(race.race_id.clone());
        }
        session
            .kinematics
            .initialize(&settings)
            .context("initializing track kinematics")?;

        let ingest = PositionIngest::with_epsilon(self.config.dedup_epsilon_nm);
        let tracks = ingest.ingest(&race.boats);
        let tracked: Vec<VesselId> = tracks.keys().copied().collect();
        let ids = resolve_selection(&race.setup, selection, &tracked)?;

        let matcher = CourseSectorMatcher::new();
        let statistics = BoatStatistics::new();
        let waypoints = race.setup.waypoints();

        let mut boats = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(track) = tracks.get(&id) else {
                warn!("boat {} has no positions in race {}", id, race.race_id);
                continue;
            };
            let series = session
                .kinematics
                .compute_series(id, track.fixes(), mode)
                .with_context(|| format!("computing speed series for boat {}", id))?;
            let summary = statistics
                .summarize(&mut session.kinematics, id, track.fixes(), mode)
                .with_context(|| format!("summarizing boat {}", id))?;

            boats.push(BoatReport {
                id,
                name: race.setup.boat_name(id),
                fixes: track.len(),
                series,
                summary,
                sectors: matcher.sector_stats(track, waypoints),
                markers: matcher.sector_markers(track, waypoints),
            });
        }

        info!(
            "race {} analysed {} boats ({:?} mode)",
            race.race_id,
            boats.len(),
            mode
        );

        Ok(WorkflowResult {
            race_id: race.race_id.clone(),
            settings,
            mode,
            boats,
            metrics: session.kinematics.metrics(),
        })
    }
}

/// Boat ids for a selection. The fleet is listed in team-name order, followed by
/// tracked boats the setup does not name.
fn resolve_selection(
    setup: &RaceSetup,
    selection: &Selection,
    tracked: &[VesselId],
) -> anyhow::Result<Vec<VesselId>> {
    match selection {
        Selection::Fleet => {
            let mut ids: Vec<VesselId> = setup
                .teams_by_name()
                .iter()
                .map(|team| team.id)
                .filter(|id| tracked.contains(id))
                .collect();
            for id in tracked {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
            Ok(ids)
        }
        Selection::Boat(id) => {
            if !tracked.contains(id) {
                bail!("boat {} has no positions", id);
            }
            Ok(vec![*id])
        }
        Selection::Class(key) => {
            let classes = setup.classes();
            let class = classes
                .get(key)
                .with_context(|| format!("unknown class {}", key))?;
            Ok(class.boats.clone())
        }
    }
}
