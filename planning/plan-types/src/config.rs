//! Configuration types for the planners.
//!
//! This module provides the settings of the continuous sampling planner
//! ([`RrtConfig`]) and of the discrete lattice planner ([`LatticeConfig`]),
//! plus the axis-aligned [`Bounds`] both of them search within.
//!
//! Configurations are plain builders: any value can be set, and problems are
//! reported by `validate()` (a list of human-readable issues) or
//! `try_validate()` (the same issues folded into
//! [`PlanningError::InvalidConfig`]). Planners run `try_validate()` before
//! they start.
//!
//! # Example
//!
//! ```
//! use plan_types::{Bounds, RrtConfig};
//!
//! let config = RrtConfig::new(Bounds::rectangle(400.0, 400.0))
//!     .with_max_extension(28.0)
//!     .with_goal_tolerance(10.0)
//!     .with_goal_bias(0.1)
//!     .with_seed(42);
//!
//! assert!(config.validate().is_empty());
//! assert_eq!(config.dim(), 2);
//! ```

use plan_spatial::Point;

use crate::error::PlanningError;

fn fold_issues(issues: Vec<String>) -> Result<(), PlanningError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(PlanningError::invalid_config(issues.join("; ")))
    }
}

/// An axis-aligned box of configurations.
///
/// Both corners are inclusive. The dimensionality of the bounds is the
/// dimensionality of the planning problem.
///
/// # Example
///
/// ```
/// use plan_spatial::Point;
/// use plan_types::Bounds;
///
/// let bounds = Bounds::new(Point::from([-1.0, 0.0]), Point::from([1.0, 2.0]));
/// assert!(bounds.contains(&Point::from([0.0, 2.0])));
/// assert!(!bounds.contains(&Point::from([0.0, 2.1])));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Creates bounds from their minimum and maximum corners.
    ///
    /// The corners are not reordered; use [`Bounds::validate`] to check them.
    #[must_use]
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The 2-D rectangle `[0, width] × [0, height]`.
    #[must_use]
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(Point::from([0.0, 0.0]), Point::from([width, height]))
    }

    /// The `dim`-dimensional cube `[lo, hi]^dim`.
    #[must_use]
    pub fn cube(dim: usize, lo: f64, hi: f64) -> Self {
        Self::new(Point::new(vec![lo; dim]), Point::new(vec![hi; dim]))
    }

    /// Returns the minimum corner.
    #[must_use]
    pub const fn min(&self) -> &Point {
        &self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub const fn max(&self) -> &Point {
        &self.max
    }

    /// Returns the dimensionality of the bounds.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.min.dim()
    }

    /// Returns the side length on `axis`, or `None` if out of range.
    #[must_use]
    pub fn extent(&self, axis: usize) -> Option<f64> {
        Some(self.max.get(axis)? - self.min.get(axis)?)
    }

    /// Checks if a point lies inside the bounds, boundary included.
    ///
    /// Points of a different dimensionality are never inside.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.dim() == self.dim()
            && point
                .as_slice()
                .iter()
                .zip(self.min.as_slice().iter().zip(self.max.as_slice()))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Validates the bounds and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.min.dim() == 0 {
            issues.push("Bounds must have at least one dimension".to_string());
        }
        if self.min.dim() != self.max.dim() {
            issues.push(format!(
                "Bounds corners differ in dimensionality: min has {}, max has {}",
                self.min.dim(),
                self.max.dim()
            ));
            return issues;
        }
        if !(self.min.is_finite() && self.max.is_finite()) {
            issues.push("Bounds must be finite".to_string());
        }
        for (axis, (lo, hi)) in self
            .min
            .as_slice()
            .iter()
            .zip(self.max.as_slice())
            .enumerate()
        {
            if lo > hi {
                issues.push(format!("Bounds axis {axis}: min {lo} exceeds max {hi}"));
            } else if lo.is_finite() && hi.is_finite() && !(hi - lo).is_finite() {
                issues.push(format!(
                    "Bounds axis {axis}: extent from {lo} to {hi} overflows"
                ));
            }
        }

        issues
    }
}

/// Configuration for the continuous sampling planner (RRT).
///
/// # Example
///
/// ```
/// use plan_types::{Bounds, RrtConfig};
///
/// let config = RrtConfig::new(Bounds::cube(3, -5.0, 5.0))
///     .with_max_samples(2_000)
///     .with_max_extension(0.5);
///
/// assert_eq!(config.max_samples(), 2_000);
/// assert!(config.try_validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RrtConfig {
    /// Region samples are drawn from; defines the dimensionality.
    bounds: Bounds,
    /// Maximum length of a single tree extension (in world units).
    max_extension: f64,
    /// Probability of sampling the goal directly (0-1).
    goal_bias: f64,
    /// Distance to the goal at which the problem counts as solved.
    goal_tolerance: f64,
    /// Sample budget; each iteration consumes one sample.
    max_samples: usize,
    /// Random seed for reproducibility (None = random).
    seed: Option<u64>,
}

impl RrtConfig {
    /// Creates a configuration for the given bounds with default settings.
    ///
    /// Defaults: extension 1.0, goal bias 0.05, goal tolerance 1.0,
    /// 10 000 samples, no seed.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            max_extension: 1.0,
            goal_bias: 0.05,
            goal_tolerance: 1.0,
            max_samples: 10_000,
            seed: None,
        }
    }

    /// Replaces the sampling bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the maximum length of a tree extension.
    #[must_use]
    pub const fn with_max_extension(mut self, length: f64) -> Self {
        self.max_extension = length;
        self
    }

    /// Sets the goal bias probability (0-1).
    ///
    /// Higher values make the tree grow toward the goal faster but make it
    /// more likely to get stuck behind obstacles.
    #[must_use]
    pub const fn with_goal_bias(mut self, bias: f64) -> Self {
        self.goal_bias = bias;
        self
    }

    /// Sets the goal tolerance.
    #[must_use]
    pub const fn with_goal_tolerance(mut self, tolerance: f64) -> Self {
        self.goal_tolerance = tolerance;
        self
    }

    /// Sets the sample budget.
    #[must_use]
    pub const fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Removes the seed (use random initialization).
    #[must_use]
    pub const fn without_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    /// Returns the sampling bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the dimensionality of the problem.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.bounds.dim()
    }

    /// Returns the maximum extension length.
    #[must_use]
    pub const fn max_extension(&self) -> f64 {
        self.max_extension
    }

    /// Returns the goal bias.
    #[must_use]
    pub const fn goal_bias(&self) -> f64 {
        self.goal_bias
    }

    /// Returns the goal tolerance.
    #[must_use]
    pub const fn goal_tolerance(&self) -> f64 {
        self.goal_tolerance
    }

    /// Returns the sample budget.
    #[must_use]
    pub const fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Returns the seed, if set.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.bounds.validate();

        if !(self.max_extension.is_finite() && self.max_extension > 0.0) {
            issues.push(format!(
                "max_extension must be positive and finite, got {}",
                self.max_extension
            ));
        }
        if !(0.0..=1.0).contains(&self.goal_bias) {
            issues.push(format!(
                "goal_bias must be within [0, 1], got {}",
                self.goal_bias
            ));
        }
        if !(self.goal_tolerance.is_finite() && self.goal_tolerance >= 0.0) {
            issues.push(format!(
                "goal_tolerance must be non-negative and finite, got {}",
                self.goal_tolerance
            ));
        }

        issues
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] listing every issue found by
    /// [`RrtConfig::validate`].
    pub fn try_validate(&self) -> Result<(), PlanningError> {
        fold_issues(self.validate())
    }
}

/// Configuration for the discrete lattice planner (breadth-first search).
///
/// The lattice consists of the configurations `min + i * step_size` inside
/// the bounds; moves go to the 2k face neighbours.
///
/// # Example
///
/// ```
/// use plan_types::{Bounds, LatticeConfig};
///
/// let config = LatticeConfig::new(Bounds::rectangle(10.0, 10.0))
///     .with_step_size(0.5)
///     .with_goal_radius(0.75)
///     .with_max_expansions(100_000);
///
/// assert_eq!(config.cells_per_axis(), vec![21, 21]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeConfig {
    /// Region covered by the lattice.
    bounds: Bounds,
    /// Spacing between neighbouring lattice configurations.
    step_size: f64,
    /// Distance to the goal at which a lattice configuration counts as
    /// reaching it.
    goal_radius: f64,
    /// Maximum number of configurations to expand (None = unlimited).
    max_expansions: Option<usize>,
}

impl LatticeConfig {
    /// Creates a configuration for the given bounds with default settings.
    ///
    /// Defaults: step 1.0, goal radius 1.0, unlimited expansions.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            step_size: 1.0,
            goal_radius: 1.0,
            max_expansions: None,
        }
    }

    /// Sets the lattice spacing.
    #[must_use]
    pub const fn with_step_size(mut self, step: f64) -> Self {
        self.step_size = step;
        self
    }

    /// Sets the goal radius.
    #[must_use]
    pub const fn with_goal_radius(mut self, radius: f64) -> Self {
        self.goal_radius = radius;
        self
    }

    /// Sets the maximum number of expansions.
    #[must_use]
    pub const fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// Removes the expansion limit.
    #[must_use]
    pub const fn without_max_expansions(mut self) -> Self {
        self.max_expansions = None;
        self
    }

    /// Returns the lattice bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the lattice spacing.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the goal radius.
    #[must_use]
    pub const fn goal_radius(&self) -> f64 {
        self.goal_radius
    }

    /// Returns the expansion limit, if set.
    #[must_use]
    pub const fn max_expansions(&self) -> Option<usize> {
        self.max_expansions
    }

    /// Returns the number of lattice configurations along each axis.
    ///
    /// Only meaningful for a configuration that passes validation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cells_per_axis(&self) -> Vec<usize> {
        (0..self.bounds.dim())
            .map(|axis| {
                let extent = self.bounds.extent(axis).unwrap_or(0.0).max(0.0);
                // Tolerate rounding when the extent is a multiple of the step
                ((extent / self.step_size + 1e-9).floor() as usize).saturating_add(1)
            })
            .collect()
    }

    /// Returns the total number of lattice configurations, or `None` if it
    /// does not fit in a `usize`.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        self.cells_per_axis()
            .into_iter()
            .try_fold(1usize, |total, count| {
                (count < usize::MAX).then_some(count).and_then(|c| total.checked_mul(c))
            })
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.bounds.validate();

        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            issues.push(format!(
                "step_size must be positive and finite, got {}",
                self.step_size
            ));
        }
        if !(self.goal_radius.is_finite() && self.goal_radius >= 0.0) {
            issues.push(format!(
                "goal_radius must be non-negative and finite, got {}",
                self.goal_radius
            ));
        }
        if issues.is_empty() && self.cell_count().is_none() {
            issues.push(format!(
                "step_size {} yields more lattice configurations than can be addressed",
                self.step_size
            ));
        }

        issues
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] listing every issue found by
    /// [`LatticeConfig::validate`].
    pub fn try_validate(&self) -> Result<(), PlanningError> {
        fold_issues(self.validate())
    }
}
