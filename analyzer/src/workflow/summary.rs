use crate::workflow::runner::{BoatReport, WorkflowResult};
use sogcore::processing::waypoint_name;
use sogcore::race_interface::Waypoint;
use std::fmt::Write;

/// Formats seconds as `HH:MM:SS`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

pub fn render_boat(report: &BoatReport, waypoints: &[Waypoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (#{}): {} fixes, {} speed points, top {:.2} kn, avg {:.2} kn",
        report.name,
        report.id,
        report.fixes,
        report.series.len(),
        report.summary.max_speed_kn,
        report.summary.avg_speed_kn
    );
    if report.sectors.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<28} {:>9} {:>14} {:>15}",
        "Sector", "Time", "Distance (nm)", "Avg Speed (kn)"
    );
    for stat in &report.sectors {
        let label = format!(
            "{} – {}",
            waypoint_name(waypoints, stat.sector_index),
            waypoint_name(waypoints, stat.sector_index + 1)
        );
        let _ = writeln!(
            out,
            "  {:<28} {:>9} {:>14.2} {:>15.2}",
            label,
            format_duration(stat.time_taken_s),
            stat.distance_nm,
            stat.avg_speed_kn
        );
    }
    out
}

pub fn render_result(result: &WorkflowResult, waypoints: &[Waypoint]) -> String {
    let mode = if result.mode.is_filtered() { "filtered" } else { "raw" };
    let mut out = format!(
        "Race {} ({}, glitch {} nm, percentile {}, smoothing {})\n",
        result.race_id,
        mode,
        result.settings.glitch_distance_nm,
        result.settings.percentile,
        result.settings.smoothing_window_len
    );
    for boat in &result.boats {
        out.push_str(&render_boat(boat, waypoints));
    }
    let _ = writeln!(
        out,
        "legs retained {}, dropped {}",
        result.metrics.legs_retained, result.metrics.legs_dropped
    );
    out
}
