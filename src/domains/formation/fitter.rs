use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::{debug, trace};

use crate::common::{min_pairwise_distance, wrap_angle, Point3, PlanningError, PlanningResult};
use crate::domains::fleet::FleetSnapshot;
use crate::domains::safe_zone::SafeZonePolygon;
use super::pool::TemplatePool;
use super::template::{TemplateGenerator, TemplateId, TemplateParams};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Slot spacing handed to the template generator, meters
    pub spacing: f64,
    /// Minimum distance required between any two placed vehicles, meters
    pub min_separation: f64,
    /// Distance between successive candidate anchors on the way from the
    /// leader to the safe-zone centroid, meters
    pub anchor_step: f64,
    /// Yaw candidates, relative to the leader's current heading, radians
    pub yaw_offsets: Vec<f64>,
    /// Use depth-stacked template variants
    pub three_d: bool,
    /// Seed for the randomized part of the template try-order
    pub seed: Option<u64>,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            spacing: 4.0,
            min_separation: 3.0,
            anchor_step: 2.0,
            yaw_offsets: vec![0.0, FRAC_PI_2, -FRAC_PI_2, PI],
            three_d: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub position: Point3,
    pub yaw: f64,
}

/// Per-vehicle targets produced by one successful fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationAssignment {
    pub template: TemplateId,
    pub anchor: Point3,
    pub yaw: f64,
    pub targets: BTreeMap<String, Target>,
    /// Placements evaluated before this one was accepted, inclusive
    pub attempts: usize,
}

impl FormationAssignment {
    pub fn target(&self, vehicle_id: &str) -> Option<&Target> {
        self.targets.get(vehicle_id)
    }
}

/// Leader position, then points every `step` meters towards `centroid`, then
/// the centroid itself.
pub fn candidate_anchors(leader: Point3, centroid: Point3, step: f64) -> Vec<Point3> {
    let mut anchors = vec![leader];
    let dist = leader.xy().distance(centroid.xy());
    if dist <= crate::common::EPSILON {
        return anchors;
    }
    if step > 0.0 && step.is_finite() {
        let mut k = 1;
        while (k as f64) * step < dist {
            anchors.push(leader.lerp(centroid, (k as f64) * step / dist));
            k += 1;
        }
    }
    anchors.push(centroid);
    anchors
}

pub struct FormationFitter {
    config: FormationConfig,
}

impl FormationFitter {
    pub fn new(config: FormationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    /// Search anchors, then yaws, then templates for the first placement that
    /// lies inside `zone` and keeps every pair of vehicles at least
    /// `min_separation` apart.
    pub fn fit(
        &self,
        fleet: &FleetSnapshot,
        zone: &SafeZonePolygon,
        pool: &mut TemplatePool,
        generator: &dyn TemplateGenerator,
    ) -> PlanningResult<FormationAssignment> {
        if fleet.is_empty() {
            return Err(PlanningError::invalid_input("Fleet snapshot is empty"));
        }
        let leader = fleet.leader().ok_or_else(|| {
            PlanningError::invalid_input(format!("Leader {} is not part of the snapshot", fleet.leader_id))
        })?;
        let anchors = candidate_anchors(leader.position, zone.centroid, self.config.anchor_step);
        self.fit_with_anchors(fleet, zone, &anchors, pool, generator)
    }

    /// Same as [`FormationFitter::fit`] with an explicit anchor sequence.
    pub fn fit_with_anchors(
        &self,
        fleet: &FleetSnapshot,
        zone: &SafeZonePolygon,
        anchors: &[Point3],
        pool: &mut TemplatePool,
        generator: &dyn TemplateGenerator,
    ) -> PlanningResult<FormationAssignment> {
        let leader = fleet.leader().ok_or_else(|| {
            PlanningError::invalid_input(format!("Leader {} is not part of the snapshot", fleet.leader_id))
        })?;
        let mut yaw_offsets = self.config.yaw_offsets.clone();
        if yaw_offsets.is_empty() {
            yaw_offsets.push(0.0);
        }
        let yaws: Vec<f64> = yaw_offsets.iter().map(|o| wrap_angle(leader.yaw + o)).collect();

        let unsupported: Vec<String> = pool
            .catalog()
            .iter()
            .filter(|t| !generator.supports(t))
            .map(|t| t.to_string())
            .collect();
        if !unsupported.is_empty() {
            return Err(PlanningError::contract_violation(format!(
                "Template pool holds ids the generator cannot build: {}",
                unsupported.join(", ")
            )));
        }
        let order = pool.try_order();

        let mut attempts = 0usize;
        for anchor in anchors {
            for yaw in &yaws {
                for (index, template) in order.iter().enumerate() {
                    attempts += 1;
                    let params = TemplateParams {
                        spacing: self.config.spacing,
                        three_d: self.config.three_d,
                        anchor: *anchor,
                        yaw: *yaw,
                        vehicle_count: fleet.len(),
                    };
                    let positions = generator.generate(template, &params)?;
                    if positions.len() != fleet.len() {
                        return Err(PlanningError::contract_violation(format!(
                            "Template {} produced {} positions for {} vehicles",
                            template,
                            positions.len(),
                            fleet.len()
                        )));
                    }
                    if !self.accepts(zone, &positions) {
                        trace!(template = %template, yaw = *yaw, "placement rejected");
                        continue;
                    }

                    pool.requeue_untried(&order, index);
                    debug!(
                        template = %template,
                        attempts,
                        x = anchor.x,
                        y = anchor.y,
                        yaw = *yaw,
                        "formation fitted"
                    );
                    return Ok(self.commit(fleet, template, *anchor, *yaw, &positions, attempts));
                }
            }
        }

        debug!(attempts, anchors = anchors.len(), "formation search exhausted");
        Err(PlanningError::no_solution(format!(
            "No template fits the safe zone after {} placements ({} anchors x {} yaws x {} templates)",
            attempts,
            anchors.len(),
            yaws.len(),
            order.len()
        )))
    }

    fn accepts(&self, zone: &SafeZonePolygon, positions: &[Point3]) -> bool {
        if !zone.contains_all(positions) {
            return false;
        }
        min_pairwise_distance(positions).map_or(true, |d| d >= self.config.min_separation)
    }

    fn commit(
        &self,
        fleet: &FleetSnapshot,
        template: &TemplateId,
        anchor: Point3,
        yaw: f64,
        positions: &[Point3],
        attempts: usize,
    ) -> FormationAssignment {
        let mut targets = BTreeMap::new();
        targets.insert(fleet.leader_id.clone(), Target { position: anchor, yaw });
        for (vehicle, position) in fleet.followers().zip(positions.iter().skip(1)) {
            targets.insert(vehicle.id.clone(), Target { position: *position, yaw });
        }
        FormationAssignment {
            template: template.clone(),
            anchor,
            yaw,
            targets,
            attempts,
        }
    }
}
