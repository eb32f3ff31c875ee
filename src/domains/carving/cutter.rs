use crate::common::{closest_point_on_segment, Point2};

/// Nearest point on the closed ring's boundary to `p`.
pub fn nearest_boundary_point(ring: &[Point2], p: Point2) -> Option<Point2> {
    let n = ring.len();
    (0..n)
        .map(|i| closest_point_on_segment(p, ring[i], ring[(i + 1) % n]))
        .min_by(|a, b| a.distance(p).total_cmp(&b.distance(p)))
}

/// Shape removed around one forbidden point: the exclusion disk united with a
/// straight corridor running from the disk center through `exit` and
/// `overshoot` meters beyond it.
///
/// Returned as a single counter-clockwise simple polygon. When the corridor is
/// at least as wide as the disk the union is just the corridor, started one
/// radius behind the center. Otherwise it is a keyhole: the far side of the
/// disk as an arc of `arc_segments` chords, joined to the corridor walls.
pub fn exclusion_cutter(
    center: Point2,
    radius: f64,
    exit: Point2,
    width: f64,
    overshoot: f64,
    arc_segments: usize,
) -> Vec<Point2> {
    let dir = (exit - center).normalized().unwrap_or(Point2::new(1.0, 0.0));
    let left = dir.perp();
    let half = width * 0.5;
    let reach = center.distance(exit).max(radius) + overshoot;
    let far = center + dir * reach;

    if half >= radius {
        let back = center - dir * radius;
        return vec![
            back - left * half,
            far - left * half,
            far + left * half,
            back + left * half,
        ];
    }

    let heading = dir.y.atan2(dir.x);
    let alpha = (half / radius).asin();
    let segments = arc_segments.max(4);
    let sweep = std::f64::consts::TAU - 2.0 * alpha;

    let mut ring = Vec::with_capacity(segments + 3);
    ring.push(far + left * half);
    for k in 0..=segments {
        let angle = heading + alpha + sweep * (k as f64 / segments as f64);
        ring.push(center + Point2::new(angle.cos(), angle.sin()) * radius);
    }
    ring.push(far - left * half);
    ring
}
