use auv_fleet_planner::adapters::outbound::{init_combined_logger, FilesystemScenarioSource};
use auv_fleet_planner::application::FleetPlanningService;
use auv_fleet_planner::domains::formation::{StandardTemplates, TemplatePool};
use auv_fleet_planner::Config;
use std::error::Error;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let config_path = Path::new("config.toml");
    let config = Config::load(config_path.exists().then_some(config_path))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let scenario = std::env::args().nth(1).unwrap_or_else(|| "default".to_string());
    info!("Starting AUV fleet planner for scenario {}", scenario);

    let logger = init_combined_logger(&config.logging);
    let source = FilesystemScenarioSource::new(None);
    info!("Reading scenarios from {}", source.base().display());

    let mut pool = TemplatePool::new(StandardTemplates::catalog(), config.formation.seed)?;
    let service = FleetPlanningService::new();

    match service.plan_scenario(&source, &scenario, config, logger, &mut pool) {
        Ok(plan) => {
            println!("{}", serde_json::to_string_pretty(&plan.assignment)?);
            Ok(())
        }
        Err(e) => {
            error!("Planning failed: {}", e);
            Err(e.into())
        }
    }
}
