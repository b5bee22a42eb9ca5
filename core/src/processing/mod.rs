pub mod ceiling_cache;
pub mod ingest;
pub mod kinematics;
pub mod sectors;
pub mod statistics;

pub use ceiling_cache::CeilingCache;
pub use ingest::{PositionIngest, DEFAULT_DEDUP_EPSILON_NM};
pub use kinematics::{derive_legs, Leg, TrackKinematics};
pub use sectors::{nearest_fix_index, waypoint_name, CourseSectorMatcher};
pub use statistics::BoatStatistics;
