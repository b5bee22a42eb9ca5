pub mod geodesy;
pub mod stats;

pub use geodesy::{destination, haversine_nm, EARTH_RADIUS_NM};
pub use stats::StatsHelper;
