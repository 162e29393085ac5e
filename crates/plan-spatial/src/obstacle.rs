//! The obstacle query capability consumed by planners.
//!
//! Planners never inspect how obstacles are stored; they only ask whether a
//! configuration is free and whether the straight segment between two
//! configurations is free. Any type answering those two questions is a valid
//! obstacle source: continuous shape maps, discrete occupancy grids, or test
//! doubles.
//!
//! # Example
//!
//! ```
//! use plan_spatial::{ObstacleMap, Point};
//!
//! /// Everything left of x = 0 is blocked.
//! struct HalfPlane;
//!
//! impl ObstacleMap for HalfPlane {
//!     fn is_point_free(&self, p: &Point) -> bool {
//!         p[0] >= 0.0
//!     }
//!
//!     fn is_segment_free(&self, a: &Point, b: &Point) -> bool {
//!         self.is_point_free(a) && self.is_point_free(b)
//!     }
//! }
//!
//! assert!(HalfPlane.is_point_free(&Point::from([1.0, 0.0])));
//! assert!(!HalfPlane.is_segment_free(&Point::from([1.0, 0.0]), &Point::from([-1.0, 0.0])));
//! ```

use crate::point::Point;

/// A source of collision answers for configurations and straight motions.
///
/// Implementations must be pure: the same query always gets the same answer
/// and answering has no side effects.
pub trait ObstacleMap {
    /// Returns `true` if the configuration `point` is collision-free.
    fn is_point_free(&self, point: &Point) -> bool;

    /// Returns `true` if the straight segment from `a` to `b` is
    /// collision-free, endpoints included.
    fn is_segment_free(&self, a: &Point, b: &Point) -> bool;

    /// Dimensionality the map answers for, or `None` if it accepts any.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

impl<M: ObstacleMap + ?Sized> ObstacleMap for &M {
    fn is_point_free(&self, point: &Point) -> bool {
        (**self).is_point_free(point)
    }

    fn is_segment_free(&self, a: &Point, b: &Point) -> bool {
        (**self).is_segment_free(a, b)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}

impl<M: ObstacleMap + ?Sized> ObstacleMap for Box<M> {
    fn is_point_free(&self, point: &Point) -> bool {
        (**self).is_point_free(point)
    }

    fn is_segment_free(&self, a: &Point, b: &Point) -> bool {
        (**self).is_segment_free(a, b)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}

/// An obstacle map with no obstacles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeSpace;

impl ObstacleMap for FreeSpace {
    fn is_point_free(&self, _point: &Point) -> bool {
        true
    }

    fn is_segment_free(&self, _a: &Point, _b: &Point) -> bool {
        true
    }
}
