use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{DomainError, DomainResult};
use crate::domains::fleet::{FleetStateSource, Scenario};

/// Environment variable overriding the scenario directory.
pub const SCENARIO_DIR_ENV: &str = "FLEET_SCENARIO_DIR";

/// Reads JSON scenarios (`<name>.json`) from a directory.
pub struct FilesystemScenarioSource {
    base: PathBuf,
}

impl FilesystemScenarioSource {
    /// Uses `base` when given, else `FLEET_SCENARIO_DIR`, else
    /// `./resources/scenarios` if it exists, else the system-wide directory.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| {
            if let Ok(v) = env::var(SCENARIO_DIR_ENV) {
                PathBuf::from(v)
            } else {
                let cwd_default = Path::new("resources/scenarios");
                if cwd_default.exists() {
                    cwd_default.to_path_buf()
                } else {
                    PathBuf::from("/usr/share/auv-fleet-planner/scenarios")
                }
            }
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let mut p = self.base.clone();
        if name.ends_with(".json") {
            p.push(name);
        } else {
            p.push(format!("{}.json", name));
        }
        p
    }

    /// Write a scenario as pretty JSON, creating the directory if needed.
    pub fn save_scenario(&self, name: &str, scenario: &Scenario) -> DomainResult<()> {
        if !self.base.exists() {
            fs::create_dir_all(&self.base).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        }
        let json = serde_json::to_string_pretty(scenario)?;
        fs::write(self.path_for(name), json).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        Ok(())
    }
}

impl FleetStateSource for FilesystemScenarioSource {
    fn load_scenario(&self, name: &str) -> DomainResult<Scenario> {
        let p = self.path_for(name);
        let content = fs::read_to_string(&p)
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", p.display(), e)))?;
        let scenario: Scenario = serde_json::from_str(&content)?;

        // Snapshots are read-only for the planner, reject broken ones at the edge.
        scenario
            .fleet
            .validate()
            .and_then(|_| scenario.bounds.validate())
            .map_err(|e| DomainError::InvalidCommand { reason: format!("{}: {}", name, e) })?;
        Ok(scenario)
    }
}
