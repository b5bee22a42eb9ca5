use crate::math::stats::StatsHelper;
use crate::prelude::{SeriesMode, StageResult, VesselId};
use crate::processing::kinematics::TrackKinematics;
use crate::race_interface::{BoatSummary, Fix};

/// Max/mean speed summaries for leaderboard display.
///
/// Summaries are always taken over the unsmoothed series so the display
/// smoothing preference never changes them.
#[derive(Debug, Default)]
pub struct BoatStatistics;

impl BoatStatistics {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        kinematics: &mut TrackKinematics,
        vessel: VesselId,
        fixes: &[Fix],
        mode: SeriesMode,
    ) -> StageResult<BoatSummary> {
        let series = kinematics.compute_unsmoothed(vessel, fixes, mode)?;
        Ok(BoatSummary::from_speeds(&series.speeds_kn))
    }
}

impl BoatSummary {
    pub fn from_speeds(speeds_kn: &[f64]) -> Self {
        Self {
            max_speed_kn: StatsHelper::max(speeds_kn),
            avg_speed_kn: StatsHelper::mean(speeds_kn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{AnalysisStage, Settings};

    /// Ten 1 nm legs east along the equator every 10 minutes, then a 5 nm leg.
    fn equator_track() -> Vec<Fix> {
        let mut fixes: Vec<Fix> = (0..=10)
            .map(|i| Fix::new(i * 600, 0.0, i as f64 / 60.0))
            .collect();
        fixes.push(Fix::new(11 * 600, 0.0, 15.0 / 60.0));
        fixes
    }

    fn kinematics(settings: Settings) -> TrackKinematics {
        let mut kin = TrackKinematics::new();
        kin.initialize(&settings).unwrap();
        kin
    }

    #[test]
    fn raw_summary_includes_the_outlier_leg() {
        let mut kin = kinematics(Settings::default());
        let summary = BoatStatistics::new()
            .summarize(&mut kin, 1, &equator_track(), SeriesMode::Raw)
            .unwrap();
        assert!((summary.max_speed_kn - 30.0).abs() < 0.1);
        assert!((summary.avg_speed_kn - 90.0 / 11.0).abs() < 0.1);
    }

    #[test]
    fn permissive_filter_matches_raw_summary() {
        let mut kin = kinematics(Settings {
            glitch_distance_nm: 10.0,
            percentile: 100.0,
            smoothing_window_len: 5,
        });
        let summary = BoatStatistics::new()
            .summarize(&mut kin, 1, &equator_track(), SeriesMode::Filtered)
            .unwrap();
        assert!((summary.max_speed_kn - 30.0).abs() < 0.1);
        assert!((summary.avg_speed_kn - 90.0 / 11.0).abs() < 0.1);
    }

    #[test]
    fn default_filter_summary_excludes_the_jump() {
        let mut kin = kinematics(Settings::default());
        let summary = BoatStatistics::new()
            .summarize(&mut kin, 1, &equator_track(), SeriesMode::Filtered)
            .unwrap();
        assert!((summary.max_speed_kn - 6.0).abs() < 0.01);
        assert!((summary.avg_speed_kn - 6.0).abs() < 0.01);
    }

    #[test]
    fn summary_ignores_display_smoothing() {
        let fixes = equator_track();
        let mut smooth = kinematics(Settings {
            glitch_distance_nm: 10.0,
            percentile: 100.0,
            smoothing_window_len: 7,
        });
        let mut plain = kinematics(Settings {
            glitch_distance_nm: 10.0,
            percentile: 100.0,
            smoothing_window_len: 1,
        });
        let stats = BoatStatistics::new();
        let a = stats.summarize(&mut smooth, 1, &fixes, SeriesMode::Filtered).unwrap();
        let b = stats.summarize(&mut plain, 1, &fixes, SeriesMode::Filtered).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_series_summarizes_to_zero() {
        assert_eq!(BoatSummary::from_speeds(&[]), BoatSummary::default());
        let mut kin = kinematics(Settings::default());
        let summary = BoatStatistics::new()
            .summarize(&mut kin, 1, &[], SeriesMode::Filtered)
            .unwrap();
        assert_eq!(summary.max_speed_kn, 0.0);
        assert_eq!(summary.avg_speed_kn, 0.0);
    }
}
