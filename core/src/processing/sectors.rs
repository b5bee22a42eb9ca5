use crate::math::geodesy::haversine_nm;
use crate::race_interface::{Fix, SectorMarker, SectorStat, Track, Waypoint};
use crate::telemetry::log::LogManager;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Matches course waypoints to the closest fix of a track.
///
/// Matching is nearest-position: the crossing time is the timestamp of the fix
/// closest to the mark, with no interpolation between bracketing fixes and no
/// signal when the boat never came near the mark.
pub struct CourseSectorMatcher {
    logger: LogManager,
}

impl CourseSectorMatcher {
    pub fn new() -> Self {
        Self {
            logger: LogManager::for_stage("sogcore::sectors"),
        }
    }

    /// Crossing markers for chart annotation, one per waypoint after the first.
    pub fn sector_markers(&self, track: &Track, waypoints: &[Waypoint]) -> Vec<SectorMarker> {
        let fixes = track.fixes();
        let Some(first) = track.first() else {
            return Vec::new();
        };
        if waypoints.len() < 2 {
            return Vec::new();
        }

        let mut markers = Vec::with_capacity(waypoints.len() - 1);
        let mut prev_time = first.timestamp;
        let mut prev_name = waypoint_name(waypoints, 0);

        for (idx, waypoint) in waypoints.iter().enumerate().skip(1) {
            let Some(nearest) = nearest_fix_index(fixes, waypoint) else {
                continue;
            };
            let crossing_time = fixes[nearest].timestamp;
            let name = waypoint_name(waypoints, idx);
            markers.push(SectorMarker {
                crossing_time,
                label: format!("{} – {}", prev_name, name),
                midpoint_time: (prev_time as f64 + crossing_time as f64) / 2.0,
            });
            prev_time = crossing_time;
            prev_name = name;
        }
        markers
    }

    /// Time, distance sailed and average speed for each consecutive waypoint pair.
    ///
    /// Sectors whose end match does not come strictly after the start match are skipped.
    pub fn sector_stats(&self, track: &Track, waypoints: &[Waypoint]) -> Vec<SectorStat> {
        let fixes = track.fixes();
        if fixes.is_empty() || waypoints.len() < 2 {
            return Vec::new();
        }

        let matches: Vec<Option<usize>> = waypoints
            .iter()
            .map(|waypoint| nearest_fix_index(fixes, waypoint))
            .collect();

        let mut stats = Vec::with_capacity(waypoints.len() - 1);
        for (sector_index, pair) in matches.windows(2).enumerate() {
            let (Some(start), Some(end)) = (pair[0], pair[1]) else {
                continue;
            };
            if end <= start {
                self.logger.detail(&format!(
                    "sector {} skipped: end fix {} not after start fix {}",
                    sector_index, end, start
                ));
                continue;
            }

            let time_taken_s = fixes[end].timestamp.saturating_sub(fixes[start].timestamp);
            let distance_nm = path_distance_nm(&fixes[start..=end]);
            let avg_speed_kn = if time_taken_s > 0 {
                distance_nm / (time_taken_s as f64 / SECONDS_PER_HOUR)
            } else {
                0.0
            };
            stats.push(SectorStat {
                sector_index,
                time_taken_s,
                distance_nm,
                avg_speed_kn,
            });
        }
        stats
    }
}

impl Default for CourseSectorMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the first fix with the smallest distance to the waypoint.
pub fn nearest_fix_index(fixes: &[Fix], waypoint: &Waypoint) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, fix) in fixes.iter().enumerate() {
        let distance = haversine_nm(
            waypoint.latitude,
            waypoint.longitude,
            fix.latitude,
            fix.longitude,
        );
        let closer = match best {
            Some((_, best_distance)) => distance < best_distance,
            None => distance < f64::INFINITY,
        };
        if closer {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Display name of a waypoint, falling back to Start, Finish or WP<n>.
pub fn waypoint_name(waypoints: &[Waypoint], idx: usize) -> String {
    if let Some(name) = waypoints.get(idx).and_then(|w| w.name.as_deref()) {
        return name.to_string();
    }
    if idx == 0 {
        "Start".to_string()
    } else if idx + 1 == waypoints.len() {
        "Finish".to_string()
    } else {
        format!("WP{}", idx + 1)
    }
}

fn path_distance_nm(fixes: &[Fix]) -> f64 {
    fixes
        .windows(2)
        .map(|pair| {
            haversine_nm(
                pair[0].latitude,
                pair[0].longitude,
                pair[1].latitude,
                pair[1].longitude,
            )
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Boat sailing north along the meridian at 1 nm per 10 minutes.
    fn northbound_track() -> Track {
        let fixes: Vec<Fix> = (0..=30)
            .map(|i| Fix::new(1_000 + i * 600, i as f64 / 60.0, 0.0))
            .collect();
        Track::from_fixes(&fixes)
    }

    fn course() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0.0, 0.01),
            Waypoint::new(10.0 / 60.0, -0.01),
            Waypoint::new(30.0 / 60.0, 0.0),
        ]
    }

    #[test]
    fn three_marks_give_two_sectors() {
        let matcher = CourseSectorMatcher::new();
        let track = northbound_track();
        let stats = matcher.sector_stats(&track, &course());
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.time_taken_s > 0));
        assert_eq!(stats[0].time_taken_s, 6_000);
        assert_eq!(stats[1].time_taken_s, 12_000);
        assert!((stats[0].distance_nm - 10.0).abs() < 0.01);
        assert!((stats[1].avg_speed_kn - 6.0).abs() < 0.01);
        assert_eq!(stats[1].sector_index, 1);

        let markers = matcher.sector_markers(&track, &course());
        assert_eq!(markers.len(), 2);
        assert!(markers[0].crossing_time < markers[1].crossing_time);
    }

    #[test]
    fn markers_use_default_labels_and_midpoints() {
        let matcher = CourseSectorMatcher::new();
        let track = northbound_track();
        let mut waypoints = course();
        waypoints.insert(2, Waypoint::named(20.0 / 60.0, 0.0, "Nab Tower"));

        let markers = matcher.sector_markers(&track, &waypoints);
        let labels: Vec<&str> = markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Start – WP2", "WP2 – Nab Tower", "Nab Tower – Finish"]);
        assert_eq!(markers[0].crossing_time, 7_000);
        assert_eq!(markers[0].midpoint_time, 4_000.0);
        assert_eq!(markers[1].midpoint_time, (7_000.0 + 13_000.0) / 2.0);
    }

    #[test]
    fn backwards_sector_is_skipped() {
        let matcher = CourseSectorMatcher::new();
        let track = northbound_track();
        let waypoints = vec![
            Waypoint::new(20.0 / 60.0, 0.0),
            Waypoint::new(5.0 / 60.0, 0.0),
            Waypoint::new(25.0 / 60.0, 0.0),
        ];
        let stats = matcher.sector_stats(&track, &waypoints);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].sector_index, 1);
    }

    #[test]
    fn extreme_timestamps_saturate_sector_time() {
        let matcher = CourseSectorMatcher::new();
        let track = Track::from_fixes(&[
            Fix::new(-9_000_000_000_000_000_000, 0.0, 0.0),
            Fix::new(9_000_000_000_000_000_000, 1.0 / 60.0, 0.0),
        ]);
        let waypoints = vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0 / 60.0, 0.0)];
        let stats = matcher.sector_stats(&track, &waypoints);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].time_taken_s, i64::MAX);
        assert!(stats[0].avg_speed_kn >= 0.0);

        let markers = matcher.sector_markers(&track, &waypoints);
        assert_eq!(markers.len(), 1);
        assert!(markers[0].midpoint_time.is_finite());
    }

    #[test]
    fn distant_mark_still_matches_closest_fix() {
        let track = northbound_track();
        let far = Waypoint::new(45.0, 0.0);
        assert_eq!(nearest_fix_index(track.fixes(), &far), Some(track.len() - 1));
    }

    #[test]
    fn ties_keep_the_earliest_fix() {
        let fixes = vec![
            Fix::new(0, 0.0, 0.0),
            Fix::new(60, 1.0, 0.0),
            Fix::new(120, 0.0, 0.0),
        ];
        assert_eq!(nearest_fix_index(&fixes, &Waypoint::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn nan_fixes_never_match() {
        let fixes = vec![Fix::new(0, f64::NAN, 0.0)];
        assert_eq!(nearest_fix_index(&fixes, &Waypoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn empty_inputs_give_empty_results() {
        let matcher = CourseSectorMatcher::new();
        let track = northbound_track();
        assert!(matcher.sector_stats(&track, &[]).is_empty());
        assert!(matcher.sector_markers(&track, &[]).is_empty());
        assert!(matcher.sector_stats(&track, &course()[..1]).is_empty());
        assert!(matcher.sector_stats(&Track::default(), &course()).is_empty());
        assert!(matcher.sector_markers(&Track::default(), &course()).is_empty());
    }

    #[test]
    fn waypoint_names_fall_back_by_position() {
        let waypoints = vec![Waypoint::new(0.0, 0.0); 4];
        assert_eq!(waypoint_name(&waypoints, 0), "Start");
        assert_eq!(waypoint_name(&waypoints, 1), "WP2");
        assert_eq!(waypoint_name(&waypoints, 2), "WP3");
        assert_eq!(waypoint_name(&waypoints, 3), "Finish");
    }
}
