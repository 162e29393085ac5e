//! Core types for motion planning: configuration, paths, statistics and
//! errors.
//!
//! This crate provides the vocabulary shared by the planners in
//! `plan-search` and their callers.
//!
//! # Overview
//!
//! - **Configuration**: Search region and algorithm settings ([`Bounds`],
//!   [`RrtConfig`], [`LatticeConfig`])
//! - **Paths**: Ordered configurations with cached length ([`Path`])
//! - **Statistics**: Counters and timing of a planning run ([`PlanStats`])
//! - **Errors**: Everything a planner can fail with ([`PlanningError`])
//! - **Contract**: The one-shot planner interface ([`Planner`])
//!
//! # Example
//!
//! ```
//! use plan_types::{Bounds, LatticeConfig, RrtConfig};
//!
//! // Continuous planner over a 400 x 400 field
//! let rrt = RrtConfig::new(Bounds::rectangle(400.0, 400.0))
//!     .with_max_extension(28.0)
//!     .with_goal_tolerance(10.0);
//! assert!(rrt.try_validate().is_ok());
//!
//! // Discrete planner over the same field, one configuration every 5 units
//! let lattice = LatticeConfig::new(Bounds::rectangle(400.0, 400.0)).with_step_size(5.0);
//! assert_eq!(lattice.cells_per_axis(), vec![81, 81]);
//! ```
//!
//! # Integration with plan-spatial
//!
//! Configurations are [`plan_spatial::Point`]s, and planners query obstacles
//! through [`plan_spatial::ObstacleMap`]. Spatial failures are carried in
//! [`PlanningError::Spatial`].
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod path;
pub mod planner;
pub mod stats;

// Re-export main types at crate root for convenience
pub use config::{Bounds, LatticeConfig, RrtConfig};
pub use error::PlanningError;
pub use path::Path;
pub use planner::Planner;
pub use stats::PlanStats;
