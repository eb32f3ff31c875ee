use serde::{Deserialize, Serialize};
use crate::common::Point2;

/// Integer cell index into an [`OccupancyGrid`](super::OccupancyGrid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// True if `other` is one of the 8 neighbors of this cell.
    pub fn is_adjacent(&self, other: &GridCell) -> bool {
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        dc <= 1 && dr <= 1 && (dc + dr) > 0
    }
}

/// Default ceiling on grid size, about a 2.2 km square arena at 1 m resolution.
pub const DEFAULT_MAX_GRID_CELLS: usize = 5_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AStarConfig {
    /// Cell edge length in meters
    pub resolution: f64,
    /// Minimum clearance applied to every obstacle; an obstacle's own margin
    /// wins when it is larger.
    pub safety_margin: f64,
    /// Maximum number of node expansions before giving up
    pub max_iterations: usize,
    /// Allow diagonal steps that squeeze between two blocked orthogonal cells
    pub allow_corner_cutting: bool,
    /// Largest occupancy grid (in cells) the planner will allocate
    pub max_grid_cells: usize,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            safety_margin: 0.0,
            max_iterations: 200_000,
            allow_corner_cutting: false,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
        }
    }
}

/// Collision-free route produced by the grid planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPath {
    pub waypoints: Vec<Point2>,
    pub cells: Vec<GridCell>,
    /// Total cost in cell units (1 per orthogonal step, sqrt(2) per diagonal step)
    pub cost: f64,
    pub nodes_expanded: usize,
}

impl GridPath {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Accumulated step cost at each waypoint, starting at 0.
    pub fn cumulative_costs(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.cells.len());
        let mut acc = 0.0;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                acc += step_cost(&self.cells[i - 1], cell);
            }
            out.push(acc);
        }
        out
    }

    /// Route length in meters.
    pub fn length_m(&self) -> f64 {
        self.waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

pub(crate) fn step_cost(from: &GridCell, to: &GridCell) -> f64 {
    if from.col != to.col && from.row != to.row {
        std::f64::consts::SQRT_2
    } else {
        1.0
    }
}
