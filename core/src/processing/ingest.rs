use crate::math::geodesy::haversine_nm;
use crate::prelude::VesselId;
use crate::race_interface::{Fix, Track, VesselPositions};
use crate::telemetry::log::LogManager;
use std::collections::{BTreeMap, HashMap};

/// Two fixes at the same timestamp closer than this are retransmissions (~1.85 m).
pub const DEFAULT_DEDUP_EPSILON_NM: f64 = 0.001;

/// Turns raw per-vessel fix lists into deduplicated, time-ordered tracks.
pub struct PositionIngest {
    epsilon_nm: f64,
    logger: LogManager,
}

impl PositionIngest {
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_DEDUP_EPSILON_NM)
    }

    pub fn with_epsilon(epsilon_nm: f64) -> Self {
        Self {
            epsilon_nm,
            logger: LogManager::for_stage("sogcore::ingest"),
        }
    }

    pub fn epsilon_nm(&self) -> f64 {
        self.epsilon_nm
    }

    /// Builds one track per vessel id. Lists repeated under the same id are merged.
    pub fn ingest(&self, boats: &[VesselPositions]) -> BTreeMap<VesselId, Track> {
        let mut grouped: BTreeMap<VesselId, Vec<Fix>> = BTreeMap::new();
        for boat in boats {
            grouped
                .entry(boat.id)
                .or_default()
                .extend_from_slice(&boat.moments);
        }

        let tracks: BTreeMap<VesselId, Track> = grouped
            .into_iter()
            .map(|(id, fixes)| {
                let (track, dropped) = self.dedupe(&fixes);
                if dropped > 0 {
                    self.logger.detail(&format!(
                        "vessel {} dropped {} duplicate fixes of {}",
                        id,
                        dropped,
                        fixes.len()
                    ));
                }
                (id, track)
            })
            .collect();

        self.logger
            .record(&format!("ingested {} vessel tracks", tracks.len()));
        tracks
    }

    pub fn build_track(&self, fixes: &[Fix]) -> Track {
        self.dedupe(fixes).0
    }

    fn dedupe(&self, fixes: &[Fix]) -> (Track, usize) {
        let mut by_time: HashMap<i64, Vec<Fix>> = HashMap::new();
        let mut retained = Vec::with_capacity(fixes.len());

        for fix in fixes {
            let seen = by_time.entry(fix.timestamp).or_default();
            let duplicate = seen.iter().any(|prev| {
                haversine_nm(prev.latitude, prev.longitude, fix.latitude, fix.longitude)
                    <= self.epsilon_nm
            });
            if !duplicate {
                seen.push(*fix);
                retained.push(*fix);
            }
        }

        let dropped = fixes.len() - retained.len();
        retained.sort_by_key(|fix| fix.timestamp);
        (Track::from_ingested(retained), dropped)
    }
}

impl Default for PositionIngest {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// Applies the ingest rules with the default epsilon.
    pub fn from_fixes(fixes: &[Fix]) -> Self {
        PositionIngest::new().build_track(fixes)
    }
}
