//! Track-analytics core for racing yacht GPS data.
//!
//! Raw position fixes are deduplicated and ordered into tracks, turned into a
//! filtered speed-over-ground series, and matched against the course to give
//! sector timings and per-boat speed summaries. The crate performs no I/O.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod race_interface;
pub mod telemetry;

pub use prelude::{AnalysisStage, SeriesMode, Settings, StageError, StageResult, VesselId};
