//! Motion planning algorithms over continuous configuration spaces.
//!
//! This crate provides planners that work with any `plan-spatial` obstacle
//! map and return the `plan-types` domain types.
//!
//! # Overview
//!
//! - **RRT** ([`rrt::RrtSession`], [`rrt::RrtPlanner`]): Rapidly-exploring
//!   random tree, steppable one iteration at a time
//! - **Lattice BFS** ([`bfs::LatticeBfs`]): Breadth-first search over a
//!   regular lattice with face connectivity
//! - **Search trees** ([`tree::SearchTree`], [`tree::PathExtractor`]):
//!   Parent-linked trees and path reconstruction
//! - **Path Smoothing** ([`smooth::PathSmoother`]): Post-processing to
//!   simplify paths using line-of-sight checks
//!
//! # Quick Start
//!
//! ```
//! use plan_search::{PathSmoother, RrtPlanner};
//! use plan_spatial::{Point, Shape, ShapeMap};
//! use plan_types::{Bounds, Planner, RrtConfig};
//!
//! // Obstacles inflated by half a unit
//! let mut map = ShapeMap::new(2).with_margin(0.5);
//! map.push(Shape::rectangle(20.0, 10.0, 40.0, 20.0))?;
//! map.push(Shape::circle(10.0, 10.0, 3.0))?;
//!
//! let planner = RrtPlanner::new(
//!     RrtConfig::new(Bounds::rectangle(100.0, 100.0))
//!         .with_max_extension(5.0)
//!         .with_goal_tolerance(2.0)
//!         .with_goal_bias(0.1)
//!         .with_max_samples(50_000)
//!         .with_seed(7),
//! );
//!
//! let start = Point::from([0.0, 0.0]);
//! let goal = Point::from([50.0, 25.0]);
//! let path = planner.plan(&start, &goal, &map)?;
//!
//! // Optionally smooth the path
//! let smoothed = PathSmoother::new(&map).smooth(&path);
//! assert!(smoothed.length() <= path.length());
//! # Ok::<(), plan_types::PlanningError>(())
//! ```
//!
//! # Algorithm Selection
//!
//! | Algorithm | Best For | Trade-offs |
//! |-----------|----------|------------|
//! | RRT | High dimensions, large open spaces | Randomised, paths need smoothing |
//! | Lattice BFS | Low dimensions, reproducible answers | Cost grows with lattice size |
//!
//! # Integration with plan-spatial
//!
//! This crate uses the following from `plan-spatial`:
//!
//! - [`plan_spatial::KdTree`] for nearest-node queries while growing trees
//! - [`plan_spatial::ObstacleMap`] for every collision check
//! - [`plan_spatial::Point`] for configurations

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod bfs;
pub mod lattice;
pub mod neighbors;
pub mod rrt;
pub mod smooth;
pub mod tree;

// Re-export main types for convenience
pub use bfs::LatticeBfs;
pub use lattice::{Lattice, LatticeCell};
pub use neighbors::NeighborGenerator;
pub use rrt::{RrtPlanner, RrtSession, SessionStatus};
pub use smooth::PathSmoother;
pub use tree::{NodeId, PathExtractor, SearchTree, SnapshotEntry, TreeNode};
