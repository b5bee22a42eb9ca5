pub mod positions;
pub mod records;
pub mod setup;

pub use positions::{parse_positions_json, Fix, Track, VesselPositions};
pub use records::{BoatSummary, SectorMarker, SectorStat, SpeedSeries};
pub use setup::{class_key, parse_race_setup_json, Course, RaceClass, RaceSetup, Tag, Team, Waypoint};
