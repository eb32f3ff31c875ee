pub mod occupancy;
mod open_set;
pub mod planner;
pub mod types;
pub mod workspace;

pub use occupancy::*;
pub use planner::*;
pub use types::*;
pub use workspace::*;
