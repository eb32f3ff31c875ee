pub mod fleet_planning_service;

pub use fleet_planning_service::*;
