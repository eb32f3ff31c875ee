use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{ArenaBounds, Obstacle};
use super::snapshot::FleetSnapshot;

/// Everything the physics layer reports for one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub bounds: ArenaBounds,
    pub fleet: FleetSnapshot,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

/// Explicit per-call planning context.
///
/// Built once per tick by the caller and passed by reference into every
/// service call; nothing in the crate keeps a "current fleet" of its own.
#[derive(Clone)]
pub struct PlanningContext {
    pub tick_id: Uuid,
    pub bounds: ArenaBounds,
    pub fleet: FleetSnapshot,
    pub obstacles: Vec<Obstacle>,
    pub config: Config,
    pub logger: DynLogger,
}

impl PlanningContext {
    pub fn new(
        bounds: ArenaBounds,
        fleet: FleetSnapshot,
        obstacles: Vec<Obstacle>,
        config: Config,
        logger: DynLogger,
    ) -> Self {
        Self {
            tick_id: Uuid::new_v4(),
            bounds,
            fleet,
            obstacles,
            config,
            logger,
        }
    }

    pub fn from_scenario(scenario: Scenario, config: Config, logger: DynLogger) -> Self {
        Self::new(scenario.bounds, scenario.fleet, scenario.obstacles, config, logger)
    }
}

impl std::fmt::Debug for PlanningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningContext")
            .field("tick_id", &self.tick_id)
            .field("bounds", &self.bounds)
            .field("vehicles", &self.fleet.len())
            .field("obstacles", &self.obstacles.len())
            .finish()
    }
}
