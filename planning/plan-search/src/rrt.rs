//! Rapidly-exploring random tree (RRT) planning.
//!
//! A session grows a tree of collision-free configurations from the start.
//! Each iteration draws one sample (the goal itself with probability
//! `goal_bias`, otherwise a uniform configuration within the bounds), finds
//! the closest tree node through the KD-tree index, moves from that node
//! towards the sample by at most `max_extension`, and keeps the new
//! configuration if the motion is collision-free. The session is solved as
//! soon as a node lies within `goal_tolerance` of the goal.
//!
//! Sessions are explicit state machines:
//!
//! ```text
//! Initialized ──step──▶ Growing ──step──▶ Solved | Exhausted | Failed
//! ```
//!
//! Terminal states are sticky. Running out of samples is a normal outcome,
//! reported as [`SessionStatus::Exhausted`] rather than an error.
//!
//! # Example
//!
//! ```
//! use plan_search::rrt::{RrtSession, SessionStatus};
//! use plan_spatial::{Point, Shape, ShapeMap};
//! use plan_types::{Bounds, RrtConfig};
//!
//! let mut map = ShapeMap::new(2).with_margin(0.5);
//! map.push(Shape::rectangle(20.0, 10.0, 40.0, 20.0))?;
//!
//! let config = RrtConfig::new(Bounds::rectangle(100.0, 100.0))
//!     .with_max_extension(5.0)
//!     .with_goal_tolerance(2.0)
//!     .with_goal_bias(0.1)
//!     .with_max_samples(20_000)
//!     .with_seed(1);
//!
//! let mut session = RrtSession::new(config, Point::from([0.0, 0.0]), Point::from([60.0, 15.0]), &map)?;
//! assert_eq!(session.run(), SessionStatus::Solved);
//!
//! let path = session.path()?;
//! assert_eq!(path.first(), Some(&Point::from([0.0, 0.0])));
//! assert!(path.last().unwrap().distance(&Point::from([60.0, 15.0])) <= 2.0);
//! # Ok::<(), plan_types::PlanningError>(())
//! ```

use std::time::{Duration, Instant};

use plan_spatial::{KdTree, ObstacleMap, Point, SpatialError};
use plan_types::{Path, PlanStats, Planner, PlanningError, RrtConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::tree::{NodeId, PathExtractor, SearchTree, SnapshotEntry};

const ALGORITHM: &str = "RRT";

/// Lifecycle state of an [`RrtSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionStatus {
    /// Created and validated; no iteration has run yet.
    Initialized,
    /// At least one iteration has run and the goal is not reached yet.
    Growing,
    /// A node within the goal tolerance was added.
    Solved,
    /// The sample budget ran out before the goal was reached.
    Exhausted,
    /// An internal error stopped the session; see [`RrtSession::failure`].
    Failed,
}

impl SessionStatus {
    /// Returns `true` for states that further steps cannot change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Exhausted | Self::Failed)
    }
}

/// A single RRT planning problem being solved incrementally.
///
/// The session owns its spatial index and search tree and borrows the
/// obstacle map for its whole lifetime.
pub struct RrtSession<'m, M: ObstacleMap + ?Sized> {
    config: RrtConfig,
    goal: Point,
    map: &'m M,
    index: KdTree,
    tree: SearchTree,
    /// Tree node for each index entry, by entry position.
    nodes_by_entry: Vec<NodeId>,
    rng: StdRng,
    status: SessionStatus,
    goal_node: Option<NodeId>,
    failure: Option<PlanningError>,
    samples: usize,
    rejected: usize,
    elapsed: Duration,
}

impl<'m, M: ObstacleMap + ?Sized> RrtSession<'m, M> {
    /// Validates the problem and plants the root of the tree at `start`.
    ///
    /// # Errors
    ///
    /// - [`PlanningError::InvalidConfig`] if the configuration is invalid or
    ///   the map declares a different dimensionality than the bounds
    /// - [`PlanningError::Spatial`] if start or goal has the wrong
    ///   dimensionality
    /// - [`PlanningError::InvalidStart`] if the start is outside the bounds
    ///   or in collision
    /// - [`PlanningError::InvalidGoal`] if the goal is outside the bounds or
    ///   in collision
    pub fn new(config: RrtConfig, start: Point, goal: Point, map: &'m M) -> Result<Self, PlanningError> {
        config.try_validate()?;
        let dim = config.dim();

        for point in [&start, &goal] {
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
                "obstacle map is {map_dim}-dimensional but the bounds are {dim}-dimensional"
            )));
        }

        if !config.bounds().contains(&start) {
            return Err(PlanningError::invalid_start(format!(
                "start {start} is outside the planning bounds"
            )));
        }
        if !map.is_point_free(&start) {
            return Err(PlanningError::invalid_start(format!(
                "start {start} is in collision"
            )));
        }
        if !config.bounds().contains(&goal) {
            return Err(PlanningError::invalid_goal(format!(
                "goal {goal} is outside the planning bounds"
            )));
        }
        if !map.is_point_free(&goal) {
            return Err(PlanningError::invalid_goal(format!(
                "goal {goal} is in collision"
            )));
        }

        let mut index = KdTree::new(dim)?;
        let mut tree = SearchTree::new();
        let entry = index.insert(start.clone())?;
        let root = tree.add_root(start, entry)?;

        let rng = config
            .seed()
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        debug!(
            dim,
            max_samples = config.max_samples(),
            max_extension = config.max_extension(),
            goal_bias = config.goal_bias(),
            seed = ?config.seed(),
            "Starting RRT session"
        );

        Ok(Self {
            config,
            goal,
            map,
            index,
            tree,
            nodes_by_entry: vec![root],
            rng,
            status: SessionStatus::Initialized,
            goal_node: None,
            failure: None,
            samples: 0,
            rejected: 0,
            elapsed: Duration::ZERO,
        })
    }

    /// Runs one iteration and returns the resulting status.
    ///
    /// Calling `step` on a terminal session does nothing.
    pub fn step(&mut self) -> SessionStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        let started = Instant::now();
        let outcome = self.advance();
        self.elapsed += started.elapsed();

        self.status = match outcome {
            Ok(status) => status,
            Err(error) => {
                warn!(%error, samples = self.samples, nodes = self.tree.len(), "RRT session failed");
                self.failure = Some(error);
                SessionStatus::Failed
            }
        };

        match self.status {
            SessionStatus::Solved => info!(
                samples = self.samples,
                nodes = self.tree.len(),
                rejected = self.rejected,
                "RRT reached the goal region"
            ),
            SessionStatus::Exhausted => info!(
                samples = self.samples,
                nodes = self.tree.len(),
                rejected = self.rejected,
                "RRT sample budget exhausted"
            ),
            _ => {}
        }

        self.status
    }

    /// Steps until the session reaches a terminal state.
    pub fn run(&mut self) -> SessionStatus {
        while !self.status.is_terminal() {
            self.step();
        }
        self.status
    }

    fn advance(&mut self) -> Result<SessionStatus, PlanningError> {
        if self.status == SessionStatus::Initialized {
            let root = self
                .tree
                .root()
                .ok_or_else(|| PlanningError::disconnected_path("search tree has no root"))?;
            if self.reaches_goal(root.point()) {
                self.goal_node = Some(root.id());
                return Ok(SessionStatus::Solved);
            }
        }

        if self.samples >= self.config.max_samples() {
            return Ok(SessionStatus::Exhausted);
        }
        self.samples += 1;
        let sample = self.sample();

        let nearest = self.index.nearest(&sample)?;
        if nearest.distance == 0.0 {
            trace!(sample = %sample, "Sample coincides with a tree node");
            return Ok(self.continuing());
        }
        let from = nearest.point.clone();
        let parent = self.node_for_entry(nearest.id.index())?;

        let candidate = from.steer_towards(&sample, self.config.max_extension());
        if !self.map.is_segment_free(&from, &candidate) {
            self.rejected += 1;
            trace!(from = %from, to = %candidate, "Extension blocked");
            return Ok(self.continuing());
        }
        if !self.map.is_point_free(&candidate) {
            return Err(PlanningError::map_inconsistency(format!(
                "segment {from} -> {candidate} is reported free but its endpoint is blocked"
            )));
        }

        let entry = self.index.insert(candidate.clone())?;
        let reached = self.reaches_goal(&candidate);
        let node = self.tree.add_child(parent, candidate, entry)?;
        self.nodes_by_entry.push(node);

        if reached {
            self.goal_node = Some(node);
            return Ok(SessionStatus::Solved);
        }
        Ok(self.continuing())
    }

    /// Status after an iteration that did not reach the goal.
    fn continuing(&self) -> SessionStatus {
        if self.samples >= self.config.max_samples() {
            SessionStatus::Exhausted
        } else {
            SessionStatus::Growing
        }
    }

    fn reaches_goal(&self, point: &Point) -> bool {
        point.distance(&self.goal) <= self.config.goal_tolerance()
    }

    fn node_for_entry(&self, entry: usize) -> Result<NodeId, PlanningError> {
        self.nodes_by_entry.get(entry).copied().ok_or_else(|| {
            PlanningError::disconnected_path(format!("index entry #{entry} has no tree node"))
        })
    }

    fn sample(&mut self) -> Point {
        if self.rng.gen_bool(self.config.goal_bias()) {
            return self.goal.clone();
        }
        let bounds = self.config.bounds();
        let coords = bounds
            .min()
            .as_slice()
            .iter()
            .zip(bounds.max().as_slice())
            .map(|(&lo, &hi)| self.rng.gen_range(lo..=hi))
            .collect();
        Point::new(coords)
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the configuration the session was created with.
    #[must_use]
    pub const fn config(&self) -> &RrtConfig {
        &self.config
    }

    /// Returns the goal configuration.
    #[must_use]
    pub const fn goal(&self) -> &Point {
        &self.goal
    }

    /// Returns the search tree grown so far.
    #[must_use]
    pub const fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Returns the spatial index over the tree's configurations.
    #[must_use]
    pub const fn index(&self) -> &KdTree {
        &self.index
    }

    /// Returns the node that reached the goal region, once solved.
    #[must_use]
    pub const fn goal_node(&self) -> Option<NodeId> {
        self.goal_node
    }

    /// Returns the error that stopped the session, if it failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&PlanningError> {
        self.failure.as_ref()
    }

    /// Returns the number of samples drawn so far.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the path from the start to the node that reached the goal.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::NotSolved`] unless the session is solved, or
    /// [`PlanningError::DisconnectedPath`] if the tree is corrupt.
    pub fn path(&self) -> Result<Path, PlanningError> {
        match (self.status, self.goal_node) {
            (SessionStatus::Solved, Some(node)) => PathExtractor::new(&self.tree).extract(node),
            _ => Err(PlanningError::NotSolved),
        }
    }

    /// Flattens the tree into `(point, parent_index)` entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.tree.snapshot()
    }

    /// Returns statistics about the session so far.
    #[must_use]
    pub fn stats(&self) -> PlanStats {
        PlanStats::new(ALGORITHM)
            .with_samples(self.samples)
            .with_nodes(self.tree.len())
            .with_rejected(self.rejected)
            .with_elapsed(self.elapsed)
    }
}

/// Reusable RRT configuration implementing the [`Planner`] contract.
///
/// Every call runs a fresh [`RrtSession`] to completion.
///
/// # Example
///
/// ```
/// use plan_search::rrt::RrtPlanner;
/// use plan_spatial::{FreeSpace, Point};
/// use plan_types::{Bounds, Planner, RrtConfig};
///
/// let planner = RrtPlanner::new(
///     RrtConfig::new(Bounds::rectangle(10.0, 10.0))
///         .with_goal_bias(1.0)
///         .with_goal_tolerance(0.0)
///         .with_seed(3),
/// );
///
/// let path = planner.plan(&Point::from([1.0, 1.0]), &Point::from([4.0, 5.0]), &FreeSpace)?;
/// assert!((path.length() - 5.0).abs() < 1e-9);
/// # Ok::<(), plan_types::PlanningError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RrtPlanner {
    config: RrtConfig,
}

impl RrtPlanner {
    /// Creates a planner with the given configuration.
    #[must_use]
    pub const fn new(config: RrtConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RrtConfig {
        &self.config
    }

    /// Plans a path and reports the session statistics alongside it.
    ///
    /// # Errors
    ///
    /// Returns the session construction error, [`PlanningError::Exhausted`]
    /// if the budget ran out, or the error that made the session fail.
    pub fn solve<M: ObstacleMap + ?Sized>(
        &self,
        start: &Point,
        goal: &Point,
        map: &M,
    ) -> Result<(Path, PlanStats), PlanningError> {
        let mut session = RrtSession::new(self.config.clone(), start.clone(), goal.clone(), map)?;
        match session.run() {
            SessionStatus::Solved => Ok((session.path()?, session.stats())),
            SessionStatus::Exhausted => Err(PlanningError::Exhausted {
                samples: session.samples(),
            }),
            _ => Err(session
                .failure()
                .cloned()
                .unwrap_or(PlanningError::NotSolved)),
        }
    }
}

impl<M: ObstacleMap + ?Sized> Planner<M> for RrtPlanner {
    fn name(&self) -> &str {
        ALGORITHM
    }

    fn plan(&self, start: &Point, goal: &Point, map: &M) -> Result<Path, PlanningError> {
        self.solve(start, goal, map).map(|(path, _)| path)
    }
}
