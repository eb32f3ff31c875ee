use auv_fleet_planner::adapters::outbound::{init_noop_logger, FilesystemScenarioSource};
use auv_fleet_planner::application::{forbidden_points, FleetPlanningService};
use auv_fleet_planner::common::{ApplicationError, Point2, Point3, PlanningError, PlanningResult};
use auv_fleet_planner::domains::fleet::{FleetSnapshot, PlanningContext, Scenario, VehicleState};
use auv_fleet_planner::domains::formation::{
    StandardTemplates, TemplateGenerator, TemplateId, TemplateParams, TemplatePool,
};
use auv_fleet_planner::domains::logger::DomainLogger;
use auv_fleet_planner::domains::path_planning::{ArenaBounds, Obstacle};
use auv_fleet_planner::Config;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CaptureLogger {
    messages: Mutex<Vec<String>>,
}

impl CaptureLogger {
    fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

fn vehicle(id: &str, x: f64, y: f64) -> VehicleState {
    VehicleState { id: id.to_string(), position: Point3::new(x, y, -5.0), yaw: 0.0 }
}

fn harbor_fleet() -> FleetSnapshot {
    FleetSnapshot::from_vehicles(
        "auv-0",
        vec![
            vehicle("auv-0", 0.0, 0.0),
            vehicle("auv-1", -15.0, 12.0),
            vehicle("auv-2", -15.0, -12.0),
            vehicle("auv-3", 12.0, -14.0),
            vehicle("auv-4", 14.0, 13.0),
        ],
    )
    .unwrap()
}

fn harbor_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::circle("rock-1", Point2::new(9.0, 7.0), 2.0, 1.0),
        Obstacle::polygon(
            "wreck",
            vec![
                Point2::new(30.0, 30.0),
                Point2::new(34.0, 30.0),
                Point2::new(34.0, 33.0),
                Point2::new(30.0, 33.0),
            ],
            0.5,
        ),
    ]
}

fn harbor_context(logger: Arc<CaptureLogger>) -> PlanningContext {
    PlanningContext::new(
        ArenaBounds::new(-60.0, 60.0, -60.0, 60.0),
        harbor_fleet(),
        harbor_obstacles(),
        Config::default(),
        logger,
    )
}

fn seeded_pool() -> TemplatePool {
    TemplatePool::new(StandardTemplates::catalog(), Some(17)).unwrap()
}

#[test]
fn test_plan_formation_carves_and_fits() {
    let logger = Arc::new(CaptureLogger::default());
    let ctx = harbor_context(logger.clone());
    let service = FleetPlanningService::new();

    let plan = service.plan_formation(&ctx, &mut seeded_pool()).unwrap();

    assert_eq!(plan.exclusions_applied, 1);
    assert_eq!(plan.exclusions_skipped, 0);
    assert!(!plan.zone.is_half_plane());
    assert!(!plan.zone.contains(Point2::new(9.0, 7.0)));

    assert_eq!(plan.assignment.attempts, 1);
    assert_eq!(plan.assignment.targets.len(), 5);
    let placed: Vec<Point3> = plan.assignment.targets.values().map(|t| t.position).collect();
    assert!(plan.zone.contains_all(&placed));

    assert!(logger.contains("INFO:"));
    assert!(logger.contains(&ctx.tick_id.to_string()));
}

#[test]
fn test_plan_without_obstacles_keeps_half_plane_zone() {
    let ctx = PlanningContext::new(
        ArenaBounds::default(),
        harbor_fleet(),
        Vec::new(),
        Config::default(),
        init_noop_logger(),
    );
    let plan = FleetPlanningService::default().plan_formation(&ctx, &mut seeded_pool()).unwrap();
    assert!(plan.zone.is_half_plane());
    assert_eq!(plan.exclusions_applied, 0);
}

#[test]
fn test_only_obstacles_inside_zone_are_forbidden() {
    let ctx = harbor_context(Arc::new(CaptureLogger::default()));
    let zone = auv_fleet_planner::domains::safe_zone::SafeZoneSynthesizer::new(ctx.config.safe_zone.clone())
        .synthesize(&ctx.fleet)
        .unwrap()
        .unwrap();

    let forbidden = forbidden_points(&zone, &ctx.obstacles);
    assert_eq!(forbidden.len(), 1);
    assert_eq!(forbidden[0].point, Point2::new(9.0, 7.0));
    assert!((forbidden[0].buffer - 3.0).abs() < 1e-12);
}

#[test]
fn test_collinear_fleet_has_no_plan() {
    let fleet = FleetSnapshot::from_vehicles(
        "a",
        vec![vehicle("a", 0.0, 0.0), vehicle("b", 5.0, 0.0), vehicle("c", 10.0, 0.0)],
    )
    .unwrap();
    let logger = Arc::new(CaptureLogger::default());
    let ctx = PlanningContext::new(ArenaBounds::default(), fleet, Vec::new(), Config::default(), logger.clone());

    let result = FleetPlanningService::new().plan_formation(&ctx, &mut seeded_pool());
    assert!(matches!(result, Err(PlanningError::NoSolution { .. })));
    assert!(logger.contains("WARN:"));
}

#[test]
fn test_invalid_snapshot_is_rejected() {
    let mut fleet = harbor_fleet();
    fleet.leader_id = "nobody".to_string();
    let ctx = PlanningContext::new(ArenaBounds::default(), fleet, Vec::new(), Config::default(), init_noop_logger());

    let result = FleetPlanningService::new().plan_formation(&ctx, &mut seeded_pool());
    assert!(matches!(result, Err(PlanningError::InvalidInput { .. })));
}

struct OneSlotGenerator;

impl TemplateGenerator for OneSlotGenerator {
    fn generate(&self, _template: &TemplateId, params: &TemplateParams) -> PlanningResult<Vec<Point3>> {
        Ok(vec![params.anchor])
    }
}

#[test]
fn test_contract_violation_is_logged_as_error() {
    let logger = Arc::new(CaptureLogger::default());
    let ctx = harbor_context(logger.clone());
    let service = FleetPlanningService::with_generator(Arc::new(OneSlotGenerator));

    match service.plan_formation(&ctx, &mut seeded_pool()) {
        Err(e) => assert!(e.is_contract_violation()),
        Ok(plan) => panic!("Expected ContractViolation, got {:?}", plan),
    }
    assert!(logger.contains("ERR:"));
}

#[test]
fn test_route_leader_around_rock() {
    let logger = Arc::new(CaptureLogger::default());
    let ctx = harbor_context(logger.clone());
    let goal = Point2::new(15.0, 12.0);

    let path = FleetPlanningService::new().route_leader(&ctx, goal).unwrap();
    assert_eq!(path.waypoints.first(), Some(&Point2::new(0.0, 0.0)));
    assert_eq!(path.waypoints.last(), Some(&goal));
    for w in &path.waypoints {
        assert!(w.distance(Point2::new(9.0, 7.0)) > 3.0);
    }
    assert!(logger.contains("leader route"));
    assert!(logger.contains(&format!("{:.1} m", path.length_m())));
}

#[test]
fn test_route_into_obstacle_fails() {
    let logger = Arc::new(CaptureLogger::default());
    let ctx = harbor_context(logger.clone());

    let result = FleetPlanningService::new().route_leader(&ctx, Point2::new(9.0, 7.0));
    assert!(matches!(result, Err(PlanningError::InvalidInput { .. })));
    assert!(logger.contains("WARN:"));
}

#[test]
fn test_contexts_get_distinct_tick_ids() {
    let a = harbor_context(Arc::new(CaptureLogger::default()));
    let b = harbor_context(Arc::new(CaptureLogger::default()));
    assert_ne!(a.tick_id, b.tick_id);
    assert!(format!("{:?}", a).contains("vehicles: 5"));
}

#[test]
fn test_plan_scenario_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let source = FilesystemScenarioSource::new(Some(dir.path().to_path_buf()));
    let scenario = Scenario {
        bounds: ArenaBounds::new(-60.0, 60.0, -60.0, 60.0),
        fleet: harbor_fleet(),
        obstacles: harbor_obstacles(),
    };
    source.save_scenario("harbor", &scenario).unwrap();

    let service = FleetPlanningService::new();
    let plan = service
        .plan_scenario(&source, "harbor", Config::default(), init_noop_logger(), &mut seeded_pool())
        .unwrap();
    assert_eq!(plan.exclusions_applied, 1);

    match service.plan_scenario(&source, "missing", Config::default(), init_noop_logger(), &mut seeded_pool()) {
        Err(ApplicationError::Domain(_)) => {}
        other => panic!("Expected a domain error, got {:?}", other.map(|p| p.assignment.template)),
    }
}

#[test]
fn test_bundled_default_scenario_plans() {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources").join("scenarios");
    let source = FilesystemScenarioSource::new(Some(base));
    let plan = FleetPlanningService::new()
        .plan_scenario(&source, "default", Config::default(), init_noop_logger(), &mut seeded_pool())
        .unwrap();
    assert_eq!(plan.assignment.targets.len(), 5);
    assert_eq!(plan.exclusions_applied, 1);
}

#[test]
fn test_vertexless_obstacle_is_not_carved() {
    let ghost = Obstacle::polygon("ghost", Vec::new(), 1.0);
    assert_eq!(ghost.exclusion_center(), None);
    assert_eq!(ghost.exclusion_radius(), None);

    let ctx = PlanningContext::new(
        ArenaBounds::new(-60.0, 60.0, -60.0, 60.0),
        harbor_fleet(),
        vec![ghost],
        Config::default(),
        init_noop_logger(),
    );
    let zone = auv_fleet_planner::domains::safe_zone::SafeZoneSynthesizer::new(ctx.config.safe_zone.clone())
        .synthesize(&ctx.fleet)
        .unwrap()
        .unwrap();
    assert!(zone.contains(Point2::new(0.0, 0.0)));
    assert!(forbidden_points(&zone, &ctx.obstacles).is_empty());

    let plan = FleetPlanningService::new().plan_formation(&ctx, &mut seeded_pool()).unwrap();
    assert_eq!(plan.exclusions_applied, 0);
    assert!(plan.zone.is_half_plane());
    assert!(plan.zone.contains(Point2::new(0.0, 0.0)));
}
