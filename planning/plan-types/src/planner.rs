//! The planner contract.

use plan_spatial::{ObstacleMap, Point};

use crate::error::PlanningError;
use crate::path::Path;

/// A one-shot planner: given a start, a goal and an obstacle source,
/// produce a path or explain why not.
///
/// Implementations keep no state between calls, so the same planner value
/// can be reused for many problems.
///
/// # Example
///
/// ```
/// use plan_spatial::{FreeSpace, ObstacleMap, Point};
/// use plan_types::{Path, Planner, PlanningError};
///
/// /// Connects start and goal directly when nothing is in the way.
/// struct StraightLine;
///
/// impl<M: ObstacleMap + ?Sized> Planner<M> for StraightLine {
///     fn name(&self) -> &str {
///         "straight-line"
///     }
///
///     fn plan(&self, start: &Point, goal: &Point, map: &M) -> Result<Path, PlanningError> {
///         if map.is_segment_free(start, goal) {
///             Ok(Path::new(vec![start.clone(), goal.clone()]))
///         } else {
///             Err(PlanningError::NoPathFound)
///         }
///     }
/// }
///
/// let path = StraightLine.plan(&Point::from([0.0, 0.0]), &Point::from([3.0, 4.0]), &FreeSpace)?;
/// assert!((path.length() - 5.0).abs() < 1e-12);
/// # Ok::<(), PlanningError>(())
/// ```
pub trait Planner<M: ObstacleMap + ?Sized> {
    /// Short human-readable algorithm name.
    fn name(&self) -> &str;

    /// Plans a path from `start` to the goal region around `goal`.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanningError`] describing why no path was produced.
    fn plan(&self, start: &Point, goal: &Point, map: &M) -> Result<Path, PlanningError>;
}
