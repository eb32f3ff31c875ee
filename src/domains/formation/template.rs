//! Formation templates: named offset patterns relative to the leader.
//!
//! Offsets are expressed in the leader frame with the leader at the origin
//! facing +x; followers trail behind (negative x). Placing a template rotates
//! the offsets by the yaw and translates them onto the anchor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{Point2, Point3, PlanningError, PlanningResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Built-in formation patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationShape {
    /// Abreast, alternating left and right of the leader
    Line,
    /// Single file behind the leader
    Column,
    /// V opening backwards
    Wedge,
    /// Stacked rhombi behind the leader
    Diamond,
    /// Compact grid
    Box,
    /// Followers on a circle around the leader
    Ring,
}

impl FormationShape {
    pub const ALL: [FormationShape; 6] = [
        FormationShape::Line,
        FormationShape::Column,
        FormationShape::Wedge,
        FormationShape::Diamond,
        FormationShape::Box,
        FormationShape::Ring,
    ];

    pub fn id(&self) -> TemplateId {
        TemplateId::new(match self {
            FormationShape::Line => "line",
            FormationShape::Column => "column",
            FormationShape::Wedge => "wedge",
            FormationShape::Diamond => "diamond",
            FormationShape::Box => "box",
            FormationShape::Ring => "ring",
        })
    }

    pub fn from_id(id: &TemplateId) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == *id)
    }

    /// Leader-frame offsets for `count` vehicles (leader included).
    pub fn offsets(&self, count: usize, spacing: f64) -> Vec<Point2> {
        let s = spacing;
        let mut out = Vec::with_capacity(count);
        if count == 0 {
            return out;
        }
        out.push(Point2::new(0.0, 0.0));
        match self {
            FormationShape::Line => {
                for k in 1..count {
                    out.push(Point2::new(0.0, side(k) * rank(k) * s));
                }
            }
            FormationShape::Column => {
                for k in 1..count {
                    out.push(Point2::new(-(k as f64) * s, 0.0));
                }
            }
            FormationShape::Wedge => {
                for k in 1..count {
                    let r = rank(k);
                    out.push(Point2::new(-r * s, side(k) * r * s));
                }
            }
            FormationShape::Diamond => {
                for k in 1..count {
                    let layer = ((k - 1) / 3 + 1) as f64;
                    let p = match (k - 1) % 3 {
                        0 => Point2::new(-layer * s, layer * s),
                        1 => Point2::new(-layer * s, -layer * s),
                        _ => Point2::new(-2.0 * layer * s, 0.0),
                    };
                    out.push(p);
                }
            }
            FormationShape::Box => {
                let cols = (count as f64).sqrt().ceil().max(1.0) as usize;
                let center = (cols as f64 - 1.0) / 2.0;
                let leader_col = (cols - 1) / 2;
                let shift = (leader_col as f64 - center) * s;
                // Leader takes the middle slot of the front row.
                let mut slots: Vec<(usize, usize)> = (0..count + 1)
                    .map(|i| (i / cols, i % cols))
                    .filter(|(row, col)| !(*row == 0 && *col == leader_col))
                    .collect();
                slots.truncate(count - 1);
                for (row, col) in slots {
                    out.push(Point2::new(-(row as f64) * s, (col as f64 - center) * s - shift));
                }
            }
            FormationShape::Ring => {
                let m = count - 1;
                if m > 0 {
                    let radius = if m == 1 {
                        s
                    } else {
                        s.max(s / (2.0 * (std::f64::consts::PI / m as f64).sin()))
                    };
                    for k in 0..m {
                        let angle = std::f64::consts::PI + std::f64::consts::TAU * k as f64 / m as f64;
                        out.push(Point2::new(angle.cos() * radius, angle.sin() * radius));
                    }
                }
            }
        }
        out
    }
}

// 1, 1, 2, 2, 3, 3, ... for followers 1, 2, 3, ...
fn rank(k: usize) -> f64 {
    ((k + 1) / 2) as f64
}

// Followers alternate left (+) and right (-).
fn side(k: usize) -> f64 {
    if k % 2 == 1 { 1.0 } else { -1.0 }
}

/// A concrete template: id plus leader-relative offsets (depth in `z`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTemplate {
    pub id: TemplateId,
    pub offsets: Vec<Point3>,
}

impl FormationTemplate {
    pub fn from_shape(shape: FormationShape, count: usize, spacing: f64, three_d: bool) -> Self {
        let offsets = shape
            .offsets(count, spacing)
            .into_iter()
            .enumerate()
            .map(|(k, p)| {
                // In 3D every second follower drops half a spacing deeper.
                let dz = if three_d && k > 0 && k % 2 == 0 { -spacing * 0.5 } else { 0.0 };
                p.with_depth(dz)
            })
            .collect();
        Self { id: shape.id(), offsets }
    }

    /// Absolute positions with the template rotated by `yaw` around the anchor.
    pub fn place(&self, anchor: Point3, yaw: f64) -> Vec<Point3> {
        self.offsets
            .iter()
            .map(|o| {
                let r = o.xy().rotated(yaw);
                Point3::new(anchor.x + r.x, anchor.y + r.y, anchor.z + o.z)
            })
            .collect()
    }
}

/// Inputs handed to a [`TemplateGenerator`] for one placement attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateParams {
    pub spacing: f64,
    pub three_d: bool,
    pub anchor: Point3,
    pub yaw: f64,
    pub vehicle_count: usize,
}

/// Produces absolute vehicle positions for a template. Position 0 is the
/// leader; the rest follow the fleet's follower order. Implementations must
/// return exactly `vehicle_count` positions.
pub trait TemplateGenerator {
    fn generate(&self, template: &TemplateId, params: &TemplateParams) -> PlanningResult<Vec<Point3>>;

    /// Whether `template` can be generated at all.
    fn supports(&self, _template: &TemplateId) -> bool {
        true
    }
}

/// Generator for the [`FormationShape`] catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTemplates;

impl StandardTemplates {
    pub fn catalog() -> Vec<TemplateId> {
        FormationShape::ALL.iter().map(|s| s.id()).collect()
    }
}

impl TemplateGenerator for StandardTemplates {
    fn generate(&self, template: &TemplateId, params: &TemplateParams) -> PlanningResult<Vec<Point3>> {
        let shape = FormationShape::from_id(template).ok_or_else(|| {
            PlanningError::contract_violation(format!("Unknown formation template {}", template))
        })?;
        let t = FormationTemplate::from_shape(shape, params.vehicle_count, params.spacing, params.three_d);
        Ok(t.place(params.anchor, params.yaw))
    }

    fn supports(&self, template: &TemplateId) -> bool {
        FormationShape::from_id(template).is_some()
    }
}
