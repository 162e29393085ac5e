//! Planning statistics.

use std::time::Duration;

/// Statistics about a planning run.
///
/// # Example
///
/// ```
/// use plan_types::PlanStats;
/// use std::time::Duration;
///
/// let stats = PlanStats::new("RRT")
///     .with_samples(1500)
///     .with_nodes(420)
///     .with_elapsed(Duration::from_millis(12));
///
/// assert_eq!(stats.algorithm(), "RRT");
/// assert_eq!(stats.samples(), 1500);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStats {
    /// Name of the algorithm used.
    algorithm: String,
    /// Number of samples drawn (iterations run).
    samples: usize,
    /// Number of nodes in the search tree, root included.
    nodes: usize,
    /// Number of extensions rejected because the motion was blocked.
    rejected: usize,
    /// Time spent stepping the planner.
    elapsed: Duration,
}

impl PlanStats {
    /// Creates empty statistics for the given algorithm name.
    #[must_use]
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            ..Self::default()
        }
    }

    /// Sets the number of samples drawn.
    #[must_use]
    pub const fn with_samples(mut self, count: usize) -> Self {
        self.samples = count;
        self
    }

    /// Sets the number of tree nodes.
    #[must_use]
    pub const fn with_nodes(mut self, count: usize) -> Self {
        self.nodes = count;
        self
    }

    /// Sets the number of rejected extensions.
    #[must_use]
    pub const fn with_rejected(mut self, count: usize) -> Self {
        self.rejected = count;
        self
    }

    /// Sets the elapsed time.
    #[must_use]
    pub const fn with_elapsed(mut self, duration: Duration) -> Self {
        self.elapsed = duration;
        self
    }

    /// Returns the name of the algorithm used.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the number of samples drawn.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the number of tree nodes.
    #[must_use]
    pub const fn nodes(&self) -> usize {
        self.nodes
    }

    /// Returns the number of rejected extensions.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    /// Returns the elapsed time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fraction of samples that produced a new node.
    ///
    /// Returns 0 when no samples were drawn.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn acceptance_rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.nodes.saturating_sub(1) as f64 / self.samples as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stats_builder() {
        let stats = PlanStats::new("RRT")
            .with_samples(10)
            .with_nodes(5)
            .with_rejected(3)
            .with_elapsed(Duration::from_millis(2));

        assert_eq!(stats.algorithm(), "RRT");
        assert_eq!(stats.samples(), 10);
        assert_eq!(stats.nodes(), 5);
        assert_eq!(stats.rejected(), 3);
        assert_eq!(stats.elapsed(), Duration::from_millis(2));
        assert_relative_eq!(stats.acceptance_rate(), 0.4);
    }

    #[test]
    fn test_acceptance_rate_without_samples() {
        let stats = PlanStats::new("RRT").with_nodes(1);
        assert_relative_eq!(stats.acceptance_rate(), 0.0);
    }
}
