use serde::{Deserialize, Serialize};

/// Speed-over-ground points, one per retained leg, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedSeries {
    pub speeds_kn: Vec<f64>,
    /// Epoch seconds of each leg's end fix.
    pub timestamps: Vec<i64>,
}

impl SpeedSeries {
    pub fn len(&self) -> usize {
        self.speeds_kn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds_kn.is_empty()
    }

    /// `(timestamp, speed)` pairs for chart rendering.
    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.speeds_kn.iter().copied())
    }
}

/// Chart annotation for the moment a boat reached a waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorMarker {
    pub crossing_time: i64,
    pub label: String,
    pub midpoint_time: f64,
}

/// Timing row for the sector between two consecutive waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorStat {
    /// Index of the sector's start waypoint.
    pub sector_index: usize,
    pub time_taken_s: i64,
    pub distance_nm: f64,
    pub avg_speed_kn: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoatSummary {
    pub max_speed_kn: f64,
    pub avg_speed_kn: f64,
}
