use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::common::{Point3, PlanningError, PlanningResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub id: String,
    pub position: Point3,
    pub yaw: f64, // Heading in radians
}

/// Read-only view of the fleet for one planning tick.
///
/// Vehicles keep the order in which they were reported; that order is also the
/// order in which followers are matched to formation slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub leader_id: String,
    vehicles: Vec<VehicleState>,
}

impl FleetSnapshot {
    pub fn new(leader_id: impl Into<String>) -> Self {
        Self { leader_id: leader_id.into(), vehicles: Vec::new() }
    }

    pub fn from_vehicles(leader_id: impl Into<String>, vehicles: Vec<VehicleState>) -> PlanningResult<Self> {
        let mut snapshot = Self::new(leader_id);
        for v in vehicles {
            snapshot.insert(v)?;
        }
        Ok(snapshot)
    }

    pub fn insert(&mut self, vehicle: VehicleState) -> PlanningResult<()> {
        if self.vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(PlanningError::invalid_input(format!(
                "Vehicle {} is already part of the snapshot",
                vehicle.id
            )));
        }
        self.vehicles.push(vehicle);
        Ok(())
    }

    /// Re-check invariants after deserialization.
    pub fn validate(&self) -> PlanningResult<()> {
        let mut seen = HashSet::new();
        for v in &self.vehicles {
            if !seen.insert(v.id.as_str()) {
                return Err(PlanningError::invalid_input(format!("Duplicate vehicle id {}", v.id)));
            }
        }
        if self.leader().is_none() {
            return Err(PlanningError::invalid_input(format!(
                "Leader {} is not part of the snapshot",
                self.leader_id
            )));
        }
        Ok(())
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    pub fn get(&self, id: &str) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn leader(&self) -> Option<&VehicleState> {
        self.get(&self.leader_id)
    }

    pub fn followers(&self) -> impl Iterator<Item = &VehicleState> {
        self.vehicles.iter().filter(move |v| v.id != self.leader_id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3> {
        self.vehicles.iter().map(|v| v.position).collect()
    }
}
