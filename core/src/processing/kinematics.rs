use crate::math::geodesy::haversine_nm;
use crate::math::stats::StatsHelper;
use crate::prelude::{
    AnalysisStage, SeriesMode, Settings, StageError, StageResult, VesselId,
};
use crate::processing::ceiling_cache::{track_fingerprint, CeilingCache};
use crate::race_interface::{Fix, SpeedSeries};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Segment between two temporally consecutive fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub end_timestamp: i64,
    pub speed_kn: f64,
    pub distance_nm: f64,
}

/// Derives legs from fixes in chronological order.
///
/// Pairs whose elapsed time is not positive are skipped.
pub fn derive_legs(fixes: &[Fix]) -> Vec<Leg> {
    let mut ordered = fixes.to_vec();
    ordered.sort_by_key(|fix| fix.timestamp);

    ordered
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let elapsed_hours = (b.timestamp as f64 - a.timestamp as f64) / SECONDS_PER_HOUR;
            if elapsed_hours <= 0.0 {
                return None;
            }
            let distance_nm = haversine_nm(a.latitude, a.longitude, b.latitude, b.longitude);
            Some(Leg {
                end_timestamp: b.timestamp,
                speed_kn: distance_nm / elapsed_hours,
                distance_nm,
            })
        })
        .collect()
}

/// Speed-over-ground stage: leg derivation, outlier filtering and smoothing.
///
/// The percentile ceiling of each vessel is memoized for the exact fixes it was
/// computed from, until the percentile setting changes. A vessel whose fixes
/// change gets a fresh ceiling on its next run.
pub struct TrackKinematics {
    settings: Option<Settings>,
    ceilings: CeilingCache,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl TrackKinematics {
    pub fn new() -> Self {
        Self {
            settings: None,
            ceilings: CeilingCache::new(),
            logger: LogManager::for_stage("sogcore::kinematics"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Speed series using the configured smoothing window.
    pub fn compute_series(
        &mut self,
        vessel: VesselId,
        fixes: &[Fix],
        mode: SeriesMode,
    ) -> StageResult<SpeedSeries> {
        let window = self.require_settings()?.smoothing_window_len;
        self.run(vessel, fixes, mode, window)
    }

    /// Speed series with smoothing forced off, for summary statistics.
    pub fn compute_unsmoothed(
        &mut self,
        vessel: VesselId,
        fixes: &[Fix],
        mode: SeriesMode,
    ) -> StageResult<SpeedSeries> {
        self.require_settings()?;
        self.run(vessel, fixes, mode, 1)
    }

    /// Memoized ceiling for a vessel, if one has been computed.
    pub fn ceiling(&self, vessel: VesselId) -> Option<f64> {
        self.ceilings.get(vessel)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn require_settings(&self) -> StageResult<&Settings> {
        self.settings
            .as_ref()
            .ok_or_else(|| StageError::NotInitialized("track kinematics".into()))
    }

    fn run(
        &mut self,
        vessel: VesselId,
        fixes: &[Fix],
        mode: SeriesMode,
        window: usize,
    ) -> StageResult<SpeedSeries> {
        let settings = *self.require_settings()?;
        let legs = derive_legs(fixes);

        let fingerprint = track_fingerprint(fixes);
        let (ceiling_kn, hit) = self.ceilings.get_or_insert_with(vessel, fingerprint, || {
            let speeds: Vec<f64> = legs.iter().map(|leg| leg.speed_kn).collect();
            StatsHelper::percentile(&speeds, settings.percentile)
        });
        self.metrics.record_ceiling(hit);

        let filtered = mode.is_filtered();
        let (speeds_kn, timestamps): (Vec<f64>, Vec<i64>) = legs
            .iter()
            .filter(|leg| {
                !filtered
                    || (leg.speed_kn <= ceiling_kn
                        && leg.distance_nm <= settings.glitch_distance_nm)
            })
            .map(|leg| (leg.speed_kn, leg.end_timestamp))
            .unzip();

        let dropped = legs.len() - speeds_kn.len();
        if !legs.is_empty() && speeds_kn.is_empty() {
            self.logger.warn(&format!(
                "vessel {}: all {} legs removed by the filter (ceiling {:.2} kn)",
                vessel,
                legs.len(),
                ceiling_kn
            ));
        }
        self.metrics.record_track(speeds_kn.len(), dropped);
        self.logger.detail(&format!(
            "vessel {} legs {} retained {} ceiling {:.2} kn{}",
            vessel,
            legs.len(),
            speeds_kn.len(),
            ceiling_kn,
            if hit { " (cached)" } else { "" }
        ));

        let speeds_kn = if filtered && window > 1 {
            StatsHelper::centered_moving_average(&speeds_kn, window)
        } else {
            speeds_kn
        };

        Ok(SpeedSeries {
            speeds_kn,
            timestamps,
        })
    }
}

impl AnalysisStage for TrackKinematics {
    fn initialize(&mut self, settings: &Settings) -> StageResult<()> {
        settings.validate()?;
        if self.ceilings.set_percentile(settings.percentile) {
            self.logger.detail(&format!(
                "percentile set to {}, ceiling cache cleared",
                settings.percentile
            ));
        } else {
            self.logger.detail(&format!(
                "percentile unchanged, {} cached ceilings kept",
                self.ceilings.len()
            ));
        }
        self.settings = Some(*settings);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.ceilings = CeilingCache::new();
        self.settings = None;
        self.metrics.reset();
    }
}

impl Default for TrackKinematics {
    fn default() -> Self {
        Self::new()
    }
}
