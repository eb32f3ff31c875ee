use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{Point2, PlanningError, PlanningResult};
use super::types::{GridCell, DEFAULT_MAX_GRID_CELLS};
use super::workspace::{ArenaBounds, Obstacle};

/// Boolean obstacle map over the arena.
///
/// Cells are lattice points: cell `(col, row)` sits at world
/// `(min_x + col * resolution, min_y + row * resolution)` and a world point
/// maps to the nearest lattice point. A cell is occupied iff that point lies
/// within the margin-expanded footprint of some obstacle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyGrid {
    bounds: ArenaBounds,
    resolution: f64,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Empty grid covering `bounds`, limited to [`DEFAULT_MAX_GRID_CELLS`].
    pub fn new(bounds: ArenaBounds, resolution: f64) -> PlanningResult<Self> {
        Self::with_cell_limit(bounds, resolution, DEFAULT_MAX_GRID_CELLS)
    }

    /// Empty grid covering `bounds`. Fails with `InvalidInput` when the grid
    /// would need more than `max_cells` cells.
    pub fn with_cell_limit(bounds: ArenaBounds, resolution: f64, max_cells: usize) -> PlanningResult<Self> {
        bounds.validate()?;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(PlanningError::invalid_input(format!(
                "Grid resolution must be positive, got {}",
                resolution
            )));
        }
        let too_large = || {
            PlanningError::invalid_input(format!(
                "Grid for x [{}, {}], y [{}, {}] at resolution {} exceeds {} cells",
                bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y, resolution, max_cells
            ))
        };
        let width = axis_cells(bounds.max_x - bounds.min_x, resolution, max_cells).ok_or_else(too_large)?;
        let height = axis_cells(bounds.max_y - bounds.min_y, resolution, max_cells).ok_or_else(too_large)?;
        let cell_count = width.checked_mul(height).filter(|n| *n <= max_cells).ok_or_else(too_large)?;
        Ok(Self {
            bounds,
            resolution,
            width,
            height,
            cells: vec![false; cell_count],
        })
    }

    /// Grid with every obstacle burned in. `min_margin` is applied to
    /// obstacles whose own margin is smaller.
    pub fn rasterize(
        bounds: ArenaBounds,
        resolution: f64,
        obstacles: &[Obstacle],
        min_margin: f64,
    ) -> PlanningResult<Self> {
        Self::rasterize_capped(bounds, resolution, obstacles, min_margin, DEFAULT_MAX_GRID_CELLS)
    }

    /// [`rasterize`](Self::rasterize) with an explicit cell limit.
    pub fn rasterize_capped(
        bounds: ArenaBounds,
        resolution: f64,
        obstacles: &[Obstacle],
        min_margin: f64,
        max_cells: usize,
    ) -> PlanningResult<Self> {
        let mut grid = Self::with_cell_limit(bounds, resolution, max_cells)?;
        for obstacle in obstacles {
            grid.mark_obstacle(obstacle, obstacle.margin.max(min_margin));
        }
        debug!(
            width = grid.width,
            height = grid.height,
            occupied = grid.occupied_count(),
            obstacles = obstacles.len(),
            "rasterized occupancy grid"
        );
        Ok(grid)
    }

    fn mark_obstacle(&mut self, obstacle: &Obstacle, margin: f64) {
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = GridCell::new(col, row);
                if self.cells[self.index(cell)] {
                    continue;
                }
                if obstacle.blocks(self.grid_to_world(cell), margin) {
                    let idx = self.index(cell);
                    self.cells[idx] = true;
                }
            }
        }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn resolution(&self) -> f64 { self.resolution }
    pub fn bounds(&self) -> &ArenaBounds { &self.bounds }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Nearest cell to a world point, `None` outside the arena.
    pub fn world_to_grid(&self, p: Point2) -> Option<GridCell> {
        if !self.bounds.contains(p) {
            return None;
        }
        let col = ((p.x - self.bounds.min_x) / self.resolution).round() as usize;
        let row = ((p.y - self.bounds.min_y) / self.resolution).round() as usize;
        Some(GridCell::new(col.min(self.width - 1), row.min(self.height - 1)))
    }

    pub fn grid_to_world(&self, cell: GridCell) -> Point2 {
        Point2::new(
            self.bounds.min_x + cell.col as f64 * self.resolution,
            self.bounds.min_y + cell.row as f64 * self.resolution,
        )
    }

    pub fn in_bounds(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// Occupancy of a cell; cells outside the grid count as occupied.
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        if cell.col >= self.width || cell.row >= self.height {
            return true;
        }
        self.cells[self.index(cell)]
    }

    pub fn set_occupied(&mut self, cell: GridCell, occupied: bool) {
        if cell.col < self.width && cell.row < self.height {
            let idx = self.index(cell);
            self.cells[idx] = occupied;
        }
    }

    pub(crate) fn index(&self, cell: GridCell) -> usize {
        cell.row * self.width + cell.col
    }

    pub(crate) fn cell_at(&self, index: usize) -> GridCell {
        GridCell::new(index % self.width, index / self.width)
    }
}

/// Lattice points along one axis, `None` when more than `max_cells`.
fn axis_cells(span: f64, resolution: f64, max_cells: usize) -> Option<usize> {
    let steps = (span / resolution).floor();
    if !steps.is_finite() || steps + 1.0 > max_cells as f64 {
        return None;
    }
    Some(steps as usize + 1)
}
