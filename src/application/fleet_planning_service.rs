// Fleet Planning Service - runs one planning tick over an injected context
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info_span};

use crate::common::{ApplicationResult, Point2, PlanningError, PlanningResult};
use crate::config::Config;
use crate::domains::carving::{BoundaryCarver, ForbiddenPoint};
use crate::domains::fleet::{FleetStateSource, PlanningContext};
use crate::domains::logger::{DynLogger, LogLevel};
use crate::domains::formation::{
    FormationAssignment, FormationFitter, StandardTemplates, TemplateGenerator, TemplatePool,
};
use crate::domains::path_planning::{plan_path, GridPath, Obstacle};
use crate::domains::safe_zone::{SafeZonePolygon, SafeZoneSynthesizer};

/// Result of [`FleetPlanningService::plan_formation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationPlan {
    pub assignment: FormationAssignment,
    /// Safe zone the assignment was validated against (carved when obstacles
    /// had to be excluded)
    pub zone: SafeZonePolygon,
    pub exclusions_applied: usize,
    pub exclusions_skipped: usize,
}

pub struct FleetPlanningService {
    generator: Arc<dyn TemplateGenerator + Send + Sync>,
}

impl Default for FleetPlanningService {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetPlanningService {
    pub fn new() -> Self {
        Self::with_generator(Arc::new(StandardTemplates))
    }

    pub fn with_generator(generator: Arc<dyn TemplateGenerator + Send + Sync>) -> Self {
        Self { generator }
    }

    /// Synthesize the safe zone, carve out obstacles that fall inside it and
    /// fit a formation. On failure the caller keeps its previous assignment.
    pub fn plan_formation(&self, ctx: &PlanningContext, pool: &mut TemplatePool) -> PlanningResult<FormationPlan> {
        let span = info_span!("plan_formation", tick = %ctx.tick_id);
        let _guard = span.enter();

        ctx.fleet.validate()?;

        let synthesizer = SafeZoneSynthesizer::new(ctx.config.safe_zone.clone());
        let zone = synthesizer.synthesize(&ctx.fleet)?.ok_or_else(|| {
            ctx.logger.warn(&format!("[{}] fleet positions do not span an area", ctx.tick_id));
            PlanningError::no_solution("Fleet positions are collinear or coincident")
        })?;
        debug!(vertices = zone.vertices.len(), area = zone.area(), "safe zone synthesized");

        let forbidden = forbidden_points(&zone, &ctx.obstacles);
        let (zone, applied, skipped) = if forbidden.is_empty() {
            (zone, 0, 0)
        } else {
            BoundaryCarver::new(ctx.config.carving.clone()).carve_zone(&zone, &forbidden)?
        };
        if skipped > 0 {
            ctx.logger.warn(&format!(
                "[{}] {} of {} exclusions skipped while carving",
                ctx.tick_id,
                skipped,
                forbidden.len()
            ));
        }

        let fitter = FormationFitter::new(ctx.config.formation.clone());
        let assignment = match fitter.fit(&ctx.fleet, &zone, pool, self.generator.as_ref()) {
            Ok(a) => a,
            Err(e) => {
                let level = if e.is_contract_violation() { LogLevel::Error } else { LogLevel::Warn };
                ctx.logger.log(level, &format!("[{}] formation fit failed: {}", ctx.tick_id, e));
                return Err(e);
            }
        };

        ctx.logger.info(&format!(
            "[{}] formation {} accepted after {} attempts ({} exclusions applied)",
            ctx.tick_id, assignment.template, assignment.attempts, applied
        ));

        Ok(FormationPlan {
            assignment,
            zone,
            exclusions_applied: applied,
            exclusions_skipped: skipped,
        })
    }

    /// Load `scenario` through the port and plan one tick for it.
    pub fn plan_scenario(
        &self,
        source: &dyn FleetStateSource,
        scenario: &str,
        config: Config,
        logger: DynLogger,
        pool: &mut TemplatePool,
    ) -> ApplicationResult<FormationPlan> {
        let scenario = source.load_scenario(scenario)?;
        let ctx = PlanningContext::from_scenario(scenario, config, logger);
        Ok(self.plan_formation(&ctx, pool)?)
    }

    /// Grid route from the leader's current position to `goal`.
    pub fn route_leader(&self, ctx: &PlanningContext, goal: Point2) -> PlanningResult<GridPath> {
        let span = info_span!("route_leader", tick = %ctx.tick_id);
        let _guard = span.enter();

        let leader = ctx.fleet.leader().ok_or_else(|| {
            PlanningError::invalid_input(format!("Leader {} is not part of the snapshot", ctx.fleet.leader_id))
        })?;

        match plan_path(leader.position.xy(), goal, &ctx.obstacles, ctx.bounds, &ctx.config.grid) {
            Ok(path) => {
                ctx.logger.info(&format!(
                    "[{}] leader route with {} waypoints, {:.1} m, cost {:.3}",
                    ctx.tick_id,
                    path.len(),
                    path.length_m(),
                    path.cost
                ));
                Ok(path)
            }
            Err(e) => {
                ctx.logger.warn(&format!("[{}] leader route failed: {}", ctx.tick_id, e));
                Err(e)
            }
        }
    }
}

/// Obstacles whose exclusion center lies inside `zone`, in reporting order.
/// Obstacles with no footprint are skipped.
pub fn forbidden_points(zone: &SafeZonePolygon, obstacles: &[Obstacle]) -> Vec<ForbiddenPoint> {
    obstacles
        .iter()
        .filter_map(|o| Some(ForbiddenPoint::new(o.exclusion_center()?, o.exclusion_radius()?)))
        .filter(|f| zone.contains(f.point))
        .collect()
}
