//! Error types for planning operations.
//!
//! This module defines the [`PlanningError`] enum which represents every
//! failure a planner can report. Running out of samples is reported by the
//! continuous planner's session as a terminal status rather than an error;
//! [`PlanningError::Exhausted`] only appears when a one-shot planner has to
//! turn that status into a `Result`.

use plan_spatial::SpatialError;

/// Errors that can occur while configuring or running a planner.
///
/// # Example
///
/// ```
/// use plan_types::PlanningError;
///
/// let error = PlanningError::invalid_start("start (5, 5) is in collision");
/// assert!(error.is_invalid_start());
/// assert!(error.to_string().contains("collision"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PlanningError {
    /// The start configuration is outside the planning bounds or blocked.
    #[error("invalid start: {0}")]
    InvalidStart(String),

    /// The goal configuration is outside the planning bounds or blocked.
    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    /// A configuration parameter is out of range.
    ///
    /// Check the configuration with `validate()` before planning.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Walking parent links from a node did not reach the root.
    ///
    /// Raised for unknown node ids, dangling parent ids and cycles. The
    /// search tree is never repaired silently.
    #[error("disconnected path: {0}")]
    DisconnectedPath(String),

    /// The discrete search explored every reachable configuration without
    /// reaching the goal region.
    #[error("no path found")]
    NoPathFound,

    /// The sample budget ran out before the goal region was reached.
    #[error("sample budget exhausted after {samples} samples")]
    Exhausted {
        /// Number of samples drawn.
        samples: usize,
    },

    /// A path was requested from a session that has not solved.
    #[error("planner has not reached the goal")]
    NotSolved,

    /// The obstacle map contradicted itself, for example by reporting a
    /// segment free while reporting its endpoint blocked.
    #[error("obstacle map inconsistency: {0}")]
    MapInconsistency(String),

    /// A spatial index or geometry operation failed.
    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

impl PlanningError {
    /// Creates an invalid start error with the given reason.
    #[must_use]
    pub fn invalid_start(reason: impl Into<String>) -> Self {
        Self::InvalidStart(reason.into())
    }

    /// Creates an invalid goal error with the given reason.
    #[must_use]
    pub fn invalid_goal(reason: impl Into<String>) -> Self {
        Self::InvalidGoal(reason.into())
    }

    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use plan_types::PlanningError;
    ///
    /// let error = PlanningError::invalid_config("max_extension must be positive");
    /// assert!(error.to_string().contains("max_extension"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates a disconnected path error with the given message.
    #[must_use]
    pub fn disconnected_path(message: impl Into<String>) -> Self {
        Self::DisconnectedPath(message.into())
    }

    /// Creates a map inconsistency error with the given message.
    #[must_use]
    pub fn map_inconsistency(message: impl Into<String>) -> Self {
        Self::MapInconsistency(message.into())
    }

    /// Returns `true` if this is an invalid start error.
    #[must_use]
    pub const fn is_invalid_start(&self) -> bool {
        matches!(self, Self::InvalidStart(_))
    }

    /// Returns `true` if this is an invalid goal error.
    #[must_use]
    pub const fn is_invalid_goal(&self) -> bool {
        matches!(self, Self::InvalidGoal(_))
    }

    /// Returns `true` if this is an invalid configuration error.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }

    /// Returns `true` if this is a disconnected path error.
    #[must_use]
    pub const fn is_disconnected_path(&self) -> bool {
        matches!(self, Self::DisconnectedPath(_))
    }

    /// Returns `true` if this is a "no path found" error.
    #[must_use]
    pub const fn is_no_path_found(&self) -> bool {
        matches!(self, Self::NoPathFound)
    }

    /// Returns `true` if the sample budget ran out.
    ///
    /// # Example
    ///
    /// ```
    /// use plan_types::PlanningError;
    ///
    /// let error = PlanningError::Exhausted { samples: 500 };
    /// assert!(error.is_exhausted());
    /// assert!(error.to_string().contains("500"));
    /// ```
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Returns `true` if a path was requested before solving.
    #[must_use]
    pub const fn is_not_solved(&self) -> bool {
        matches!(self, Self::NotSolved)
    }

    /// Returns `true` if the obstacle map contradicted itself.
    #[must_use]
    pub const fn is_map_inconsistency(&self) -> bool {
        matches!(self, Self::MapInconsistency(_))
    }

    /// Returns `true` if a spatial error was wrapped.
    #[must_use]
    pub const fn is_spatial(&self) -> bool {
        matches!(self, Self::Spatial(_))
    }
}
