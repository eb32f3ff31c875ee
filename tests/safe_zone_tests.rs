use auv_fleet_planner::common::{Point2, Point3, PlanningError};
use auv_fleet_planner::domains::fleet::{FleetSnapshot, VehicleState};
use auv_fleet_planner::domains::safe_zone::*;

fn square_fleet() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, -4.0),
        Point3::new(10.0, 0.0, -6.0),
        Point3::new(10.0, 10.0, -4.0),
        Point3::new(0.0, 10.0, -6.0),
        Point3::new(5.0, 5.0, -5.0),
    ]
}

fn sorted_by_xy(mut pts: Vec<Point2>) -> Vec<Point2> {
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts
}

#[test]
fn test_all_fleet_positions_inside_safe_zone() {
    let synth = SafeZoneSynthesizer::new(SafeZoneConfig::default());
    let positions = square_fleet();
    let zone = synth.synthesize_points(&positions).unwrap().expect("square fleet spans an area");

    assert!(zone.is_half_plane());
    assert!(zone.contains_all(&positions));
    for p in &positions {
        assert!(zone.contains(p.xy()));
    }
}

#[test]
fn test_far_point_is_outside() {
    let config = SafeZoneConfig::default();
    let offset = config.offset;
    let zone = SafeZoneSynthesizer::new(config)
        .synthesize_points(&square_fleet())
        .unwrap()
        .unwrap();

    // Bounding box of the fleet is [0, 10] x [0, 10].
    assert!(!zone.contains(Point2::new(10.0 + 10.0 * offset, 5.0)));
    assert!(!zone.contains(Point2::new(5.0, -10.0 * offset)));
    assert!(!zone.contains(Point2::new(-10.0 * offset, -10.0 * offset)));
    // Within the offset band it is still inside.
    assert!(zone.contains(Point2::new(12.0, 5.0)));
}

#[test]
fn test_centroid_carries_mean_depth() {
    let zone = SafeZoneSynthesizer::new(SafeZoneConfig::default())
        .synthesize_points(&square_fleet())
        .unwrap()
        .unwrap();
    assert!((zone.centroid.x - 5.0).abs() < 1e-9);
    assert!((zone.centroid.y - 5.0).abs() < 1e-9);
    assert!((zone.centroid.z + 5.0).abs() < 1e-9);
}

#[test]
fn test_boundary_is_densified_and_counter_clockwise() {
    let config = SafeZoneConfig { offset: 5.0, densify_spacing: 1.0 };
    let zone = SafeZoneSynthesizer::new(config)
        .synthesize_points(&square_fleet())
        .unwrap()
        .unwrap();

    // Each side of the expanded square is 10 + 5 * sqrt(2) long.
    assert!(zone.vertices.len() >= 4 * 17);
    assert!(auv_fleet_planner::common::signed_area(&zone.vertices) > 0.0);
    for pair in zone.vertices.windows(2) {
        assert!(pair[0].distance(pair[1]) <= 1.0 + 1e-2);
    }
}

#[test]
fn test_densify_and_sort_are_idempotent() {
    let zone = SafeZoneSynthesizer::new(SafeZoneConfig::default())
        .synthesize_points(&square_fleet())
        .unwrap()
        .unwrap();

    let again = normalize_boundary(&zone.vertices, 1.0);
    assert_eq!(again.len(), zone.vertices.len());

    let a = sorted_by_xy(zone.vertices.clone());
    let b = sorted_by_xy(again);
    for (p, q) in a.iter().zip(b.iter()) {
        assert!(p.distance(*q) < 1e-6);
    }
}

#[test]
fn test_expand_hull_pushes_corners_along_bisector() {
    let square = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let expanded = expand_hull(&square, 1.0);
    assert_eq!(expanded.len(), 4);
    let d = std::f64::consts::FRAC_1_SQRT_2;
    assert!(expanded[0].distance(Point2::new(-d, -d)) < 1e-12);
    assert!(expanded[2].distance(Point2::new(1.0 + d, 1.0 + d)) < 1e-12);
}

#[test]
fn test_collinear_fleet_has_no_safe_zone() {
    let synth = SafeZoneSynthesizer::new(SafeZoneConfig::default());
    let line: Vec<Point3> = (0..4).map(|i| Point3::new(i as f64, 2.0 * i as f64, 0.0)).collect();
    assert_eq!(synth.synthesize_points(&line).unwrap(), None);

    let stacked = vec![Point3::new(1.0, 1.0, 0.0); 3];
    assert_eq!(synth.synthesize_points(&stacked).unwrap(), None);
}

#[test]
fn test_invalid_safe_zone_inputs() {
    let synth = SafeZoneSynthesizer::new(SafeZoneConfig::default());
    let two = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
    match synth.synthesize_points(&two) {
        Err(PlanningError::InvalidInput { reason }) => assert!(reason.contains("3 positions")),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }

    let no_offset = SafeZoneSynthesizer::new(SafeZoneConfig { offset: 0.0, densify_spacing: 1.0 });
    assert!(matches!(
        no_offset.synthesize_points(&square_fleet()),
        Err(PlanningError::InvalidInput { .. })
    ));

    let no_spacing = SafeZoneSynthesizer::new(SafeZoneConfig { offset: 1.0, densify_spacing: -1.0 });
    assert!(matches!(
        no_spacing.synthesize_points(&square_fleet()),
        Err(PlanningError::InvalidInput { .. })
    ));
}

#[test]
fn test_synthesize_from_snapshot() {
    let vehicles = square_fleet()
        .into_iter()
        .enumerate()
        .map(|(i, p)| VehicleState { id: format!("auv-{}", i), position: p, yaw: 0.0 })
        .collect();
    let fleet = FleetSnapshot::from_vehicles("auv-0", vehicles).unwrap();

    let synth = SafeZoneSynthesizer::new(SafeZoneConfig::default());
    let from_fleet = synth.synthesize(&fleet).unwrap().unwrap();
    let from_points = synth.synthesize_points(&fleet.positions()).unwrap().unwrap();
    assert_eq!(from_fleet, from_points);
}

#[test]
fn test_polygon_and_half_plane_forms_agree() {
    let zone = SafeZoneSynthesizer::new(SafeZoneConfig::default())
        .synthesize_points(&square_fleet())
        .unwrap()
        .unwrap();
    let explicit = SafeZonePolygon::from_ring(zone.vertices.clone(), zone.centroid);
    assert!(!explicit.is_half_plane());

    let probes = [
        Point2::new(5.0, 5.0),
        Point2::new(-2.0, 5.0),
        Point2::new(14.0, 14.0),
        Point2::new(20.0, 0.0),
        Point2::new(5.0, -3.0),
    ];
    for p in probes {
        assert_eq!(zone.contains(p), explicit.contains(p), "disagreement at {:?}", p);
    }
    assert!((zone.area() - explicit.area()).abs() < 1e-9);
}
