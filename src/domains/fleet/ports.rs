use crate::common::DomainResult;
use super::context::Scenario;

/// Port through which the simulation layer hands over fleet and obstacle
/// state. Implementations (adapters) may read files, sockets or an engine API.
pub trait FleetStateSource: Send + Sync {
    /// Load a full scenario (bounds, fleet snapshot, obstacles) by name.
    fn load_scenario(&self, name: &str) -> DomainResult<Scenario>;
}
