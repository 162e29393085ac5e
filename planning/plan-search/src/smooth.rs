//! Path smoothing and simplification.
//!
//! Planner output zig-zags: RRT paths follow random samples and lattice
//! paths follow the axes. This module removes unnecessary waypoints using
//! line-of-sight checks against the same obstacle map the planner used.
//!
//! # Example
//!
//! ```
//! use plan_search::bfs::LatticeBfs;
//! use plan_search::smooth::PathSmoother;
//! use plan_spatial::{FreeSpace, Point};
//! use plan_types::{Bounds, LatticeConfig, Planner};
//!
//! let planner = LatticeBfs::new(LatticeConfig::new(Bounds::rectangle(10.0, 10.0)));
//! let path = planner.plan(&Point::from([0.0, 0.0]), &Point::from([4.0, 4.0]), &FreeSpace)?;
//! assert_eq!(path.len(), 8);
//!
//! let smoothed = PathSmoother::new(&FreeSpace).smooth(&path);
//! assert_eq!(smoothed.len(), 2);
//! assert!(smoothed.length() < path.length());
//! # Ok::<(), plan_types::PlanningError>(())
//! ```

use plan_spatial::ObstacleMap;
use plan_types::Path;
use tracing::trace;

/// A path smoother that simplifies paths using line-of-sight checks.
///
/// The smoother uses a greedy algorithm: starting from the first waypoint,
/// it finds the furthest waypoint that has clear line of sight and skips
/// all intermediate waypoints. Endpoints are always kept, and because every
/// shortcut replaces a chain by a straight segment the result is never
/// longer than the input.
pub struct PathSmoother<'a, M: ObstacleMap + ?Sized> {
    /// Obstacle source for line-of-sight checks.
    map: &'a M,
}

impl<'a, M: ObstacleMap + ?Sized> PathSmoother<'a, M> {
    /// Creates a new path smoother over the given obstacle map.
    #[must_use]
    pub const fn new(map: &'a M) -> Self {
        Self { map }
    }

    /// Returns `true` if every segment of the path is collision-free.
    ///
    /// Single-waypoint paths are checked as a point; the empty path is free.
    #[must_use]
    pub fn is_path_free(&self, path: &Path) -> bool {
        match path.points() {
            [] => true,
            [only] => self.map.is_point_free(only),
            _ => path.segments().all(|(a, b)| self.map.is_segment_free(a, b)),
        }
    }

    /// Smooths a path by removing unnecessary waypoints.
    #[must_use]
    pub fn smooth(&self, path: &Path) -> Path {
        let points = path.points();

        if points.len() <= 2 {
            return path.clone();
        }

        let mut smoothed = Vec::new();
        let mut current = 0;

        while current < points.len() {
            smoothed.push(points[current].clone());

            if current == points.len() - 1 {
                break;
            }

            // Find the furthest waypoint with line of sight
            let mut furthest_visible = current + 1;
            for i in (current + 2)..points.len() {
                if self.map.is_segment_free(&points[current], &points[i]) {
                    furthest_visible = i;
                }
            }

            current = furthest_visible;
        }

        trace!(
            before = points.len(),
            after = smoothed.len(),
            "Smoothed path"
        );
        Path::new(smoothed)
    }
}
