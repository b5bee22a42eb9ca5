use crate::workflow::runner::WorkflowResult;
use serde::{Deserialize, Serialize};
use sogcore::prelude::{SeriesMode, VesselId};
use sogcore::race_interface::{BoatSummary, SectorMarker, SectorStat};

/// Chart-ready view of one boat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoatPanel {
    pub id: VesselId,
    pub name: String,
    /// `(epoch seconds, knots)` pairs.
    pub points: Vec<(i64, f64)>,
    pub summary: BoatSummary,
    pub sectors: Vec<SectorStat>,
    pub markers: Vec<SectorMarker>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReportModel {
    pub race_id: String,
    pub title: String,
    pub mode: SeriesMode,
    pub boats: Vec<BoatPanel>,
}

impl ReportModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_result(result: &WorkflowResult) -> Self {
        let mode_label = if result.mode.is_filtered() {
            "filtered"
        } else {
            "raw"
        };
        let title = match result.boats.as_slice() {
            [single] => format!("{} – Speed ({})", single.name, mode_label),
            _ => format!("Speed ({})", mode_label),
        };

        Self {
            race_id: result.race_id.clone(),
            title,
            mode: result.mode,
            boats: result
                .boats
                .iter()
                .map(|boat| BoatPanel {
                    id: boat.id,
                    name: boat.name.clone(),
                    points: boat.series.points().collect(),
                    summary: boat.summary,
                    sectors: boat.sectors.clone(),
                    markers: boat.markers.clone(),
                })
                .collect(),
        }
    }
}
