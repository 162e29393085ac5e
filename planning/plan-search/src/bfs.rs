//! Breadth-first search on a regular lattice.
//!
//! The start is snapped to the nearest lattice configuration, the search
//! expands face neighbours in breadth-first order, and it stops at the first
//! configuration within `goal_radius` of the goal. The returned path is the
//! sequence of lattice configurations from the snapped start to that
//! configuration, so it has the fewest possible moves.
//!
//! # Example
//!
//! ```
//! use plan_search::bfs::LatticeBfs;
//! use plan_spatial::{Point, Shape, ShapeMap};
//! use plan_types::{Bounds, LatticeConfig, Planner};
//!
//! let mut map = ShapeMap::new(2);
//! map.push(Shape::rectangle(4.5, 0.0, 5.5, 8.0))?;
//!
//! let planner = LatticeBfs::new(LatticeConfig::new(Bounds::rectangle(10.0, 10.0)));
//! let path = planner.plan(&Point::from([0.0, 0.0]), &Point::from([9.0, 0.0]), &map)?;
//!
//! assert_eq!(path.first(), Some(&Point::from([0.0, 0.0])));
//! assert!(path.iter().any(|p| p[1] >= 9.0)); // detours over the wall
//! # Ok::<(), plan_types::PlanningError>(())
//! ```

use std::time::Instant;

use pathfinding::prelude::bfs;
use plan_spatial::{ObstacleMap, Point, SpatialError};
use plan_types::{LatticeConfig, Path, PlanStats, Planner, PlanningError};
use tracing::{debug, info};

use crate::lattice::Lattice;
use crate::neighbors::NeighborGenerator;

const ALGORITHM: &str = "BFS";

/// Breadth-first lattice planner.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeBfs {
    /// Algorithm configuration.
    config: LatticeConfig,
}

impl LatticeBfs {
    /// Creates a planner with the given configuration.
    #[must_use]
    pub const fn new(config: LatticeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Plans a path and reports search statistics alongside it.
    ///
    /// In the statistics, `samples` and `nodes` count expanded lattice
    /// configurations and `rejected` counts blocked moves.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid, or the map has another dimensionality
    /// - Start or goal has the wrong dimensionality
    /// - Start or goal is outside the bounds or in collision
    /// - The snapped start configuration is in collision
    /// - The expansion limit is reached ([`PlanningError::Exhausted`])
    /// - No lattice configuration within reach is close enough to the goal
    pub fn solve<M: ObstacleMap + ?Sized>(
        &self,
        start: &Point,
        goal: &Point,
        map: &M,
    ) -> Result<(Path, PlanStats), PlanningError> {
        let started = Instant::now();
        let lattice = Lattice::new(&self.config)?;
        let dim = lattice.dim();

        for point in [start, goal] {
            if point.dim() != dim {
                return Err(SpatialError::DimensionMismatch {
                    expected: dim,
                    actual: point.dim(),
                }
                .into());
            }
        }
        if let Some(map_dim) = map.dimension().filter(|&d| d != dim) {
            return Err(PlanningError::invalid_config(format!(
                "obstacle map is {map_dim}-dimensional but the lattice is {dim}-dimensional"
            )));
        }

        let start_cell = lattice.nearest_cell(start).ok_or_else(|| {
            PlanningError::invalid_start(format!("start {start} is outside the planning bounds"))
        })?;
        if !map.is_point_free(start) {
            return Err(PlanningError::invalid_start(format!(
                "start {start} is in collision"
            )));
        }
        if !self.config.bounds().contains(goal) {
            return Err(PlanningError::invalid_goal(format!(
                "goal {goal} is outside the planning bounds"
            )));
        }
        if !map.is_point_free(goal) {
            return Err(PlanningError::invalid_goal(format!(
                "goal {goal} is in collision"
            )));
        }

        let generator = NeighborGenerator::new(&lattice, map);
        if !generator.is_free(&start_cell) {
            return Err(PlanningError::invalid_start(format!(
                "lattice configuration {} nearest to start {start} is in collision",
                lattice.point(&start_cell)
            )));
        }

        debug!(
            dim,
            cells = lattice.len(),
            step = lattice.step(),
            start_cell = %start_cell,
            "Starting lattice BFS"
        );

        let goal_radius = self.config.goal_radius();
        let limit = self.config.max_expansions();
        let mut expansions = 0usize;
        let mut rejected = 0usize;
        let mut truncated = false;

        let result = bfs(
            &start_cell,
            |cell| {
                if limit.is_some_and(|max| expansions >= max) {
                    truncated = true;
                    return Vec::new();
                }
                expansions += 1;
                let (free, blocked) = generator.successors(cell);
                rejected += blocked;
                free
            },
            |cell| lattice.point(cell).distance(goal) <= goal_radius,
        );

        let stats = PlanStats::new(ALGORITHM)
            .with_samples(expansions)
            .with_nodes(expansions)
            .with_rejected(rejected)
            .with_elapsed(started.elapsed());

        match result {
            Some(cells) => {
                let path: Path = cells.iter().map(|cell| lattice.point(cell)).collect();
                info!(
                    expansions,
                    waypoints = path.len(),
                    length = path.length(),
                    "Lattice BFS reached the goal region"
                );
                Ok((path, stats))
            }
            None if truncated => {
                info!(expansions, "Lattice BFS expansion limit reached");
                Err(PlanningError::Exhausted {
                    samples: expansions,
                })
            }
            None => {
                info!(expansions, "Lattice BFS found no path");
                Err(PlanningError::NoPathFound)
            }
        }
    }
}

impl<M: ObstacleMap + ?Sized> Planner<M> for LatticeBfs {
    fn name(&self) -> &str {
        ALGORITHM
    }

    fn plan(&self, start: &Point, goal: &Point, map: &M) -> Result<Path, PlanningError> {
        self.solve(start, goal, map).map(|(path, _)| path)
    }
}
