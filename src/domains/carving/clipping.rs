//! Polygon difference for simple polygons (Greiner-Hormann).
//!
//! Both inputs are closed rings without repeated end vertex, in any
//! orientation. Inputs whose vertices touch the other polygon's edges are
//! degenerate for the algorithm; the clip polygon is nudged by a tiny,
//! deterministic offset and the computation retried a bounded number of times.

use thiserror::Error;

use crate::common::{point_in_polygon, segment_distance, signed_area, Point2};

const MAX_PERTURBATIONS: usize = 8;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    #[error("polygon has fewer than 3 vertices")]
    TooFewVertices,

    #[error("clip polygon lies strictly inside the subject; the result would have a hole")]
    Enclosed,

    #[error("degenerate vertex/edge coincidence persisted after {0} perturbations")]
    Degenerate(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Subject,
    Clip,
}

#[derive(Debug, Clone)]
struct Node {
    p: Point2,
    next: usize,
    prev: usize,
    intersection: bool,
    entry: bool,
    neighbor: usize,
    visited: bool,
}

#[derive(Debug, Clone, Copy)]
struct Crossing {
    p: Point2,
    subject_edge: usize,
    subject_t: f64,
    clip_edge: usize,
    clip_t: f64,
}

/// `subject - clip`. Returns the surviving pieces (possibly none), each as a
/// counter-clockwise ring.
pub fn difference(subject: &[Point2], clip: &[Point2]) -> Result<Vec<Vec<Point2>>, ClipError> {
    if subject.len() < 3 || clip.len() < 3 {
        return Err(ClipError::TooFewVertices);
    }
    let scale = extent(subject).max(extent(clip)).max(1.0);
    let tolerance = 1e-9 * scale;

    for attempt in 0..=MAX_PERTURBATIONS {
        let shifted: Vec<Point2>;
        let clip_ring = if attempt == 0 {
            clip
        } else {
            let angle = attempt as f64 * 2.399_963; // golden angle
            let step = Point2::new(angle.cos(), angle.sin()) * (1e-7 * scale * attempt as f64);
            shifted = clip.iter().map(|p| *p + step).collect();
            &shifted
        };
        if touches(subject, clip_ring, tolerance) || touches(clip_ring, subject, tolerance) {
            continue;
        }
        return difference_once(subject, clip_ring, tolerance);
    }
    Err(ClipError::Degenerate(MAX_PERTURBATIONS))
}

fn difference_once(subject: &[Point2], clip: &[Point2], tolerance: f64) -> Result<Vec<Vec<Point2>>, ClipError> {
    let crossings = find_crossings(subject, clip);

    if crossings.is_empty() {
        if point_in_polygon(subject[0], clip) {
            return Ok(Vec::new());
        }
        if point_in_polygon(clip[0], subject) {
            return Err(ClipError::Enclosed);
        }
        return Ok(vec![ccw(subject.to_vec())]);
    }

    let (mut subj_nodes, subj_slots) = build_list(subject, &crossings, |c| (c.subject_edge, c.subject_t));
    let (mut clip_nodes, clip_slots) = build_list(clip, &crossings, |c| (c.clip_edge, c.clip_t));
    for (s, c) in subj_slots.iter().zip(clip_slots.iter()) {
        subj_nodes[*s].neighbor = *c;
        clip_nodes[*c].neighbor = *s;
    }

    // Subject flags are inverted so that walking "forward from an entry"
    // follows the subject boundary outside the clip polygon.
    mark_entries(&mut subj_nodes, point_in_polygon(subject[0], clip));
    mark_entries(&mut clip_nodes, !point_in_polygon(clip[0], subject));

    let step_budget = 2 * (subj_nodes.len() + clip_nodes.len());
    let mut pieces = Vec::new();

    while let Some(start) = subj_nodes.iter().position(|n| n.intersection && !n.visited) {
        let mut ring = vec![subj_nodes[start].p];
        let mut side = Side::Subject;
        let mut current = start;
        let mut steps = 0usize;

        loop {
            let (here, there) = match side {
                Side::Subject => (&mut subj_nodes, &mut clip_nodes),
                Side::Clip => (&mut clip_nodes, &mut subj_nodes),
            };
            here[current].visited = true;
            let twin = here[current].neighbor;
            there[twin].visited = true;

            let forward = here[current].entry;
            loop {
                current = if forward { here[current].next } else { here[current].prev };
                ring.push(here[current].p);
                steps += 1;
                if here[current].intersection || steps > step_budget {
                    break;
                }
            }
            if steps > step_budget {
                return Err(ClipError::Degenerate(0));
            }

            current = here[current].neighbor;
            side = match side {
                Side::Subject => Side::Clip,
                Side::Clip => Side::Subject,
            };
            let visited = match side {
                Side::Subject => subj_nodes[current].visited,
                Side::Clip => clip_nodes[current].visited,
            };
            if visited {
                break;
            }
        }

        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first.distance(last) <= tolerance {
                ring.pop();
            }
        }
        ring.dedup_by(|a, b| a.distance(*b) <= tolerance);
        if ring.len() >= 3 && signed_area(&ring).abs() > tolerance {
            pieces.push(ccw(ring));
        }
    }

    Ok(pieces)
}

fn find_crossings(subject: &[Point2], clip: &[Point2]) -> Vec<Crossing> {
    let mut out = Vec::new();
    for i in 0..subject.len() {
        let p1 = subject[i];
        let p2 = subject[(i + 1) % subject.len()];
        let r = p2 - p1;
        for j in 0..clip.len() {
            let q1 = clip[j];
            let q2 = clip[(j + 1) % clip.len()];
            let s = q2 - q1;
            let denom = r.cross(s);
            if denom.abs() <= f64::EPSILON * r.norm() * s.norm() {
                continue;
            }
            let qp = q1 - p1;
            let t = qp.cross(s) / denom;
            let u = qp.cross(r) / denom;
            if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
                out.push(Crossing {
                    p: p1 + r * t,
                    subject_edge: i,
                    subject_t: t,
                    clip_edge: j,
                    clip_t: u,
                });
            }
        }
    }
    out
}

/// Doubly linked ring with crossings spliced in along their edges. Returns
/// the nodes and, per crossing, the index of its node.
fn build_list<F>(ring: &[Point2], crossings: &[Crossing], key: F) -> (Vec<Node>, Vec<usize>)
where
    F: Fn(&Crossing) -> (usize, f64),
{
    let mut nodes = Vec::with_capacity(ring.len() + crossings.len());
    let mut slots = vec![0usize; crossings.len()];

    for (edge, p) in ring.iter().enumerate() {
        nodes.push(Node {
            p: *p,
            next: 0,
            prev: 0,
            intersection: false,
            entry: false,
            neighbor: 0,
            visited: false,
        });
        let mut on_edge: Vec<(usize, f64)> = crossings
            .iter()
            .enumerate()
            .filter_map(|(ci, c)| {
                let (e, t) = key(c);
                (e == edge).then_some((ci, t))
            })
            .collect();
        on_edge.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (ci, _) in on_edge {
            slots[ci] = nodes.len();
            nodes.push(Node {
                p: crossings[ci].p,
                next: 0,
                prev: 0,
                intersection: true,
                entry: false,
                neighbor: 0,
                visited: false,
            });
        }
    }

    let n = nodes.len();
    for (i, node) in nodes.iter_mut().enumerate() {
        node.next = (i + 1) % n;
        node.prev = (i + n - 1) % n;
    }
    (nodes, slots)
}

fn mark_entries(nodes: &mut [Node], mut entering: bool) {
    for node in nodes.iter_mut().filter(|n| n.intersection) {
        node.entry = entering;
        entering = !entering;
    }
}

/// True if any vertex of `a` lies on (or numerically next to) an edge of `b`.
fn touches(a: &[Point2], b: &[Point2], tolerance: f64) -> bool {
    a.iter().any(|p| {
        (0..b.len()).any(|j| segment_distance(*p, b[j], b[(j + 1) % b.len()]) <= tolerance)
    })
}

fn extent(ring: &[Point2]) -> f64 {
    ring.iter().map(|p| p.x.abs().max(p.y.abs())).fold(0.0, f64::max)
}

fn ccw(mut ring: Vec<Point2>) -> Vec<Point2> {
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}
