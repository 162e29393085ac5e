//! Spatial primitives for motion planning.
//!
//! This crate provides the layer-0 building blocks shared by the planning
//! crates:
//!
//! - [`Point`] - Immutable point in k-dimensional configuration space
//! - [`KdTree`] - Spatial index for nearest, k-nearest and radius queries
//! - [`ObstacleMap`] - The collision query capability consumed by planners
//! - [`ShapeMap`] - Continuous obstacle map of boxes and spheres
//! - [`OccupancyGrid`] - Discrete 2-D obstacle map
//!
//! # Dimensionality
//!
//! Dimensionality is a runtime property. An index is created for a fixed `k`
//! and rejects points of any other dimensionality with
//! [`SpatialError::DimensionMismatch`]. Obstacle maps that only understand a
//! fixed dimensionality report it through [`ObstacleMap::dimension`] and
//! treat queries of any other dimensionality as blocked.
//!
//! # Example
//!
//! ```
//! use plan_spatial::{KdTree, Point};
//!
//! let tree = KdTree::build(vec![
//!     Point::from([0.0, 0.0]),
//!     Point::from([2.0, 2.0]),
//!     Point::from([1.0, 1.0]),
//!     Point::from([5.0, 5.0]),
//! ])?;
//!
//! let nearest = tree.nearest(&Point::from([1.1, 1.1]))?;
//! assert_eq!(nearest.point, &Point::from([1.0, 1.0]));
//! assert!((nearest.distance - 0.1414).abs() < 1e-3);
//!
//! let close = tree.within_radius(&Point::from([0.0, 0.0]), 3.0)?;
//! assert_eq!(close.len(), 3);
//! # Ok::<(), plan_spatial::SpatialError>(())
//! ```
//!
//! # Obstacle Maps
//!
//! ```
//! use plan_spatial::{ObstacleMap, Point, Shape, ShapeMap};
//!
//! let mut map = ShapeMap::new(2);
//! map.push(Shape::circle(5.0, 5.0, 1.0))?;
//!
//! let a = Point::from([0.0, 5.0]);
//! let b = Point::from([10.0, 5.0]);
//! assert!(map.is_point_free(&a));
//! assert!(!map.is_segment_free(&a, &b));
//! # Ok::<(), plan_spatial::SpatialError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod grid;
mod kdtree;
mod obstacle;
mod point;
mod shapes;

pub use error::SpatialError;
pub use grid::OccupancyGrid;
pub use kdtree::{EntryId, KdTree, Neighbor};
pub use obstacle::{FreeSpace, ObstacleMap};
pub use point::Point;
pub use shapes::{Aabb, Shape, ShapeMap, Sphere};

// Re-export nalgebra's dynamic vector for callers building points directly
pub use nalgebra::DVector;
