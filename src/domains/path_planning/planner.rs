//! A* search over an [`OccupancyGrid`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::common::{Point2, PlanningError, PlanningResult};
use super::occupancy::OccupancyGrid;
use super::open_set::OpenSet;
use super::types::{step_cost, AStarConfig, GridCell, GridPath};
use super::workspace::{ArenaBounds, Obstacle};

// Orthogonal moves first, then diagonals.
const NEIGHBORS_8: [(i64, i64); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

pub struct GridPathPlanner<'a> {
    grid: &'a OccupancyGrid,
    config: AStarConfig,
}

impl<'a> GridPathPlanner<'a> {
    pub fn new(grid: &'a OccupancyGrid, config: AStarConfig) -> Self {
        Self { grid, config }
    }

    pub fn with_defaults(grid: &'a OccupancyGrid) -> Self {
        Self::new(grid, AStarConfig::default())
    }

    /// Find a path between two world points.
    ///
    /// Fails with `InvalidInput` without searching when either endpoint is
    /// outside the arena or on an occupied cell, and with `NoSolution` when the
    /// open set runs dry or the iteration cap is hit.
    pub fn find_path(&self, start: Point2, goal: Point2) -> PlanningResult<GridPath> {
        let start_cell = self.grid.world_to_grid(start).ok_or_else(|| {
            PlanningError::invalid_input(format!("Start ({:.2}, {:.2}) is outside the arena", start.x, start.y))
        })?;
        let goal_cell = self.grid.world_to_grid(goal).ok_or_else(|| {
            PlanningError::invalid_input(format!("Goal ({:.2}, {:.2}) is outside the arena", goal.x, goal.y))
        })?;
        self.find_path_cells(start_cell, goal_cell)
    }

    pub fn find_path_cells(&self, start: GridCell, goal: GridCell) -> PlanningResult<GridPath> {
        trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.col, start.row, goal.col, goal.row
        );

        if self.grid.is_occupied(start) {
            debug!("[AStar] start cell ({},{}) is occupied", start.col, start.row);
            return Err(PlanningError::invalid_input("Start cell is occupied"));
        }
        if self.grid.is_occupied(goal) {
            debug!("[AStar] goal cell ({},{}) is occupied", goal.col, goal.row);
            return Err(PlanningError::invalid_input("Goal cell is occupied"));
        }

        let start_idx = self.grid.index(start);
        let goal_idx = self.grid.index(goal);

        // Search state only holds cells the search has touched.
        let mut g_scores: HashMap<usize, f64> = HashMap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();
        let mut closed: HashSet<usize> = HashSet::new();
        let mut open = OpenSet::new();

        g_scores.insert(start_idx, 0.0);
        open.push(start_idx, heuristic(start, goal));

        let mut nodes_expanded = 0usize;

        while let Some((current_idx, _f)) = open.pop() {
            nodes_expanded += 1;
            if nodes_expanded > self.config.max_iterations {
                debug!(
                    "[AStar] iteration cap hit after {} expansions, frontier={}",
                    nodes_expanded - 1,
                    open.len()
                );
                return Err(PlanningError::no_solution(format!(
                    "A* exceeded its iteration cap of {}",
                    self.config.max_iterations
                )));
            }

            if current_idx == goal_idx {
                let cost = g_scores.get(&goal_idx).copied().unwrap_or(0.0);
                return Ok(self.reconstruct_path(&came_from, goal_idx, cost, nodes_expanded));
            }

            closed.insert(current_idx);
            let current_g = g_scores.get(&current_idx).copied().unwrap_or(f64::INFINITY);
            let current = self.grid.cell_at(current_idx);

            for (dc, dr) in NEIGHBORS_8 {
                let col = current.col as i64 + dc;
                let row = current.row as i64 + dr;
                if !self.grid.in_bounds(col, row) {
                    continue;
                }
                let neighbor = GridCell::new(col as usize, row as usize);
                let neighbor_idx = self.grid.index(neighbor);
                if closed.contains(&neighbor_idx) || self.grid.is_occupied(neighbor) {
                    continue;
                }
                if dc != 0 && dr != 0 && !self.config.allow_corner_cutting {
                    let side_a = GridCell::new(col as usize, current.row);
                    let side_b = GridCell::new(current.col, row as usize);
                    if self.grid.is_occupied(side_a) || self.grid.is_occupied(side_b) {
                        continue;
                    }
                }

                let tentative_g = current_g + step_cost(&current, &neighbor);
                if tentative_g >= g_scores.get(&neighbor_idx).copied().unwrap_or(f64::INFINITY) {
                    continue;
                }
                came_from.insert(neighbor_idx, current_idx);
                g_scores.insert(neighbor_idx, tentative_g);
                let f = tentative_g + heuristic(neighbor, goal);
                if open.contains(neighbor_idx) {
                    open.decrease(neighbor_idx, f);
                } else {
                    open.push(neighbor_idx, f);
                }
            }
        }

        debug!("[AStar] open set exhausted after {} expansions", nodes_expanded);
        Err(PlanningError::no_solution("No path between start and goal"))
    }

    fn reconstruct_path(
        &self,
        came_from: &HashMap<usize, usize>,
        goal_idx: usize,
        cost: f64,
        nodes_expanded: usize,
    ) -> GridPath {
        let mut indices = vec![goal_idx];
        let mut current = goal_idx;
        while let Some(&prev) = came_from.get(&current) {
            indices.push(prev);
            current = prev;
        }
        indices.reverse();

        let cells: Vec<GridCell> = indices.iter().map(|i| self.grid.cell_at(*i)).collect();
        let waypoints: Vec<Point2> = cells.iter().map(|c| self.grid.grid_to_world(*c)).collect();

        trace!(
            "[AStar] SUCCESS: path length={} cells, cost={:.3}, nodes_expanded={}",
            cells.len(), cost, nodes_expanded
        );

        GridPath { waypoints, cells, cost, nodes_expanded }
    }
}

/// Euclidean distance in cell units.
fn heuristic(from: GridCell, to: GridCell) -> f64 {
    let dc = from.col as f64 - to.col as f64;
    let dr = from.row as f64 - to.row as f64;
    dc.hypot(dr)
}

/// Rasterize the obstacles and search in one call.
pub fn plan_path(
    start: Point2,
    goal: Point2,
    obstacles: &[Obstacle],
    bounds: ArenaBounds,
    config: &AStarConfig,
) -> PlanningResult<GridPath> {
    let grid = OccupancyGrid::rasterize_capped(
        bounds,
        config.resolution,
        obstacles,
        config.safety_margin,
        config.max_grid_cells,
    )?;
    GridPathPlanner::new(&grid, config.clone()).find_path(start, goal)
}
