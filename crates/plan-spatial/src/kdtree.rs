//! KD-tree spatial index for nearest-neighbour and range queries.
//!
//! The tree partitions k-dimensional space by cycling through the coordinate
//! axes with depth: a node at depth `d` splits on axis `d mod k`. Points whose
//! coordinate on that axis is strictly smaller than the node's go left, all
//! others (including ties) go right. Both [`KdTree::build`] and
//! [`KdTree::insert`] apply the same rule, so a tree grown either way answers
//! queries identically.
//!
//! Nodes live in an arena indexed by [`EntryId`]; every traversal uses an
//! explicit stack, so deep, unbalanced trees produced by adversarial insertion
//! orders cannot exhaust the call stack.
//!
//! # Complexity
//!
//! | Operation | Expected | Worst case |
//! |-----------|----------|------------|
//! | `build` | O(n log n) | O(n log n) |
//! | `insert` | O(log n) | O(n) (no rebalancing) |
//! | `nearest` | O(log n) | O(n) |
//! | `k_nearest` | O(k log k + log n) | O(n log k) |
//! | `within_radius` | O(log n + m) | O(n) |
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
//! assert!((nearest.distance - 0.141_421).abs() < 1e-5);
//!
//! let close = tree.within_radius(&Point::from([0.0, 0.0]), 3.0)?;
//! assert_eq!(close.len(), 3);
//! # Ok::<(), plan_spatial::SpatialError>(())
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::SpatialError;
use crate::point::Point;

/// Identifier of a point stored in a [`KdTree`].
///
/// Ids are assigned sequentially in insertion order (batch order for
/// [`KdTree::build`]) and double as the tie-breaker for equidistant results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryId(usize);

impl EntryId {
    /// Returns the raw insertion index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A query result: the stored point, its id and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    /// Id of the stored point.
    pub id: EntryId,
    /// The stored point.
    pub point: &'a Point,
    /// Euclidean distance from the query point.
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct IndexNode {
    point: Point,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Pending subrange during iterative construction.
struct BuildTask {
    lo: usize,
    hi: usize,
    depth: usize,
    parent: Option<(usize, Side)>,
}

/// Candidate ordered by `(squared distance, id)` for the k-nearest heap.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist_sq: f64,
    slot: usize,
}

impl Candidate {
    fn precedes(self, dist_sq: f64, slot: usize) -> bool {
        match self.dist_sq.total_cmp(&dist_sq) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.slot < slot,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then_with(|| self.slot.cmp(&other.slot))
    }
}

/// A KD-tree over k-dimensional points.
///
/// See the [module documentation](self) for the partitioning rule and
/// complexity guarantees.
#[derive(Debug, Clone)]
pub struct KdTree {
    dim: usize,
    /// Arena of nodes; the slot of a node equals its [`EntryId`].
    nodes: Vec<IndexNode>,
    root: Option<usize>,
    /// Number of levels (0 for an empty tree).
    height: usize,
}

impl KdTree {
    /// Creates an empty index for `dim`-dimensional points.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self, SpatialError> {
        if dim == 0 {
            return Err(SpatialError::invalid_input(
                "index dimensionality must be at least 1",
            ));
        }
        Ok(Self {
            dim,
            nodes: Vec::new(),
            root: None,
            height: 0,
        })
    }

    /// Builds a balanced index from a batch of points.
    ///
    /// The dimensionality is taken from the first point.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if the batch is empty, the
    /// points have inconsistent dimensionality, or any coordinate is not
    /// finite.
    pub fn build(points: Vec<Point>) -> Result<Self, SpatialError> {
        let dim = points.first().map(Point::dim).ok_or_else(|| {
            SpatialError::invalid_input("cannot infer dimensionality from an empty batch")
        })?;
        Self::build_with_dim(dim, points)
    }

    /// Builds a balanced index of known dimensionality.
    ///
    /// Unlike [`KdTree::build`], an empty batch is accepted and yields an
    /// empty index.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if `dim` is zero, a point does
    /// not have `dim` coordinates, or any coordinate is not finite.
    pub fn build_with_dim(dim: usize, points: Vec<Point>) -> Result<Self, SpatialError> {
        let mut tree = Self::new(dim)?;
        for (i, point) in points.iter().enumerate() {
            if point.dim() != dim {
                return Err(SpatialError::invalid_input(format!(
                    "point {i} has {} coordinates, batch dimensionality is {dim}",
                    point.dim()
                )));
            }
            if !point.is_finite() {
                return Err(SpatialError::invalid_input(format!(
                    "point {i} has a non-finite coordinate"
                )));
            }
        }

        tree.nodes = points
            .into_iter()
            .map(|point| IndexNode {
                point,
                axis: 0,
                left: None,
                right: None,
            })
            .collect();

        let n = tree.nodes.len();
        let mut order: Vec<usize> = (0..n).collect();
        let mut stack = vec![BuildTask {
            lo: 0,
            hi: n,
            depth: 0,
            parent: None,
        }];

        while let Some(task) = stack.pop() {
            if task.lo >= task.hi {
                continue;
            }
            let axis = task.depth % dim;
            let nodes = &tree.nodes;
            let range = &mut order[task.lo..task.hi];

            let median = range.len() / 2;
            range.select_nth_unstable_by(median, |&a, &b| {
                nodes[a].point[axis].total_cmp(&nodes[b].point[axis])
            });
            let split_value = nodes[range[median]].point[axis];

            // Ties go right: move everything equal to the split value out of
            // the left part so the left subtree is strictly smaller.
            let mut store = 0;
            for i in 0..median {
                if nodes[range[i]].point[axis] < split_value {
                    range.swap(i, store);
                    store += 1;
                }
            }
            range.swap(store, median);

            let slot = range[store];
            let mid = task.lo + store;
            tree.nodes[slot].axis = axis;
            tree.link(task.parent, slot);
            tree.height = tree.height.max(task.depth + 1);

            stack.push(BuildTask {
                lo: mid + 1,
                hi: task.hi,
                depth: task.depth + 1,
                parent: Some((slot, Side::Right)),
            });
            stack.push(BuildTask {
                lo: task.lo,
                hi: mid,
                depth: task.depth + 1,
                parent: Some((slot, Side::Left)),
            });
        }

        debug!(points = n, dim, height = tree.height, "Built KD-tree");
        Ok(tree)
    }

    fn link(&mut self, parent: Option<(usize, Side)>, slot: usize) {
        match parent {
            None => self.root = Some(slot),
            Some((p, Side::Left)) => self.nodes[p].left = Some(slot),
            Some((p, Side::Right)) => self.nodes[p].right = Some(slot),
        }
    }

    /// Inserts a point as a new leaf and returns its id.
    ///
    /// No rebalancing is performed: inserting points in sorted order
    /// degrades the tree towards a linked list.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if the point has the wrong
    /// dimensionality, or [`SpatialError::InvalidInput`] if a coordinate is
    /// not finite.
    pub fn insert(&mut self, point: Point) -> Result<EntryId, SpatialError> {
        self.check_dim(&point)?;
        if !point.is_finite() {
            return Err(SpatialError::invalid_input(
                "cannot insert a point with a non-finite coordinate",
            ));
        }

        let slot = self.nodes.len();
        let mut depth = 0;

        if let Some(root) = self.root {
            let mut current = root;
            loop {
                let node = &self.nodes[current];
                let go_left = point[node.axis] < node.point[node.axis];
                let next = if go_left { node.left } else { node.right };
                depth += 1;
                match next {
                    Some(child) => current = child,
                    None => {
                        let side = if go_left { Side::Left } else { Side::Right };
                        self.link(Some((current, side)), slot);
                        break;
                    }
                }
            }
        } else {
            self.root = Some(slot);
        }

        self.nodes.push(IndexNode {
            point,
            axis: depth % self.dim,
            left: None,
            right: None,
        });
        self.height = self.height.max(depth + 1);
        trace!(id = slot, depth, "Inserted point into KD-tree");

        Ok(EntryId(slot))
    }

    /// Returns the closest stored point to `query`.
    ///
    /// Equidistant points are resolved in favour of the earliest inserted.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] on a wrong-sized query,
    /// [`SpatialError::InvalidInput`] if the query has a non-finite
    /// coordinate, or [`SpatialError::EmptyIndex`] if no points are stored.
    pub fn nearest(&self, query: &Point) -> Result<Neighbor<'_>, SpatialError> {
        self.check_query(query)?;
        let root = self.root.ok_or(SpatialError::EmptyIndex)?;

        let mut best = Candidate {
            dist_sq: f64::INFINITY,
            slot: usize::MAX,
        };
        let mut stack = vec![(root, 0.0_f64)];

        while let Some((slot, bound)) = stack.pop() {
            if bound > best.dist_sq {
                continue;
            }
            let node = &self.nodes[slot];
            let dist_sq = query.distance_squared(&node.point);
            if !best.precedes(dist_sq, slot) {
                best = Candidate { dist_sq, slot };
            }
            self.push_children(&mut stack, node, query, bound);
        }

        Ok(self.neighbor(best))
    }

    /// Returns the `k` closest stored points, nearest first.
    ///
    /// Ties are ordered by insertion. If fewer than `k` points are stored,
    /// all of them are returned.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] on a wrong-sized query,
    /// [`SpatialError::InvalidInput`] if the query has a non-finite
    /// coordinate, or [`SpatialError::EmptyIndex`] if no points are stored.
    pub fn k_nearest(&self, query: &Point, k: usize) -> Result<Vec<Neighbor<'_>>, SpatialError> {
        self.check_query(query)?;
        let root = self.root.ok_or(SpatialError::EmptyIndex)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        let mut stack = vec![(root, 0.0_f64)];

        while let Some((slot, bound)) = stack.pop() {
            if heap.len() == k && heap.peek().is_some_and(|worst| bound > worst.dist_sq) {
                continue;
            }
            let node = &self.nodes[slot];
            let candidate = Candidate {
                dist_sq: query.distance_squared(&node.point),
                slot,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
            self.push_children(&mut stack, node, query, bound);
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| self.neighbor(c))
            .collect())
    }

    /// Returns every stored point within distance `radius` of `query`
    /// (inclusive), ordered by distance then insertion.
    ///
    /// An empty index yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] on a wrong-sized query or
    /// [`SpatialError::InvalidInput`] if `radius` is negative or NaN or the
    /// query has a non-finite coordinate.
    pub fn within_radius(
        &self,
        query: &Point,
        radius: f64,
    ) -> Result<Vec<Neighbor<'_>>, SpatialError> {
        self.check_query(query)?;
        if radius.is_nan() || radius < 0.0 {
            return Err(SpatialError::invalid_input(format!(
                "radius must be non-negative, got {radius}"
            )));
        }
        let Some(root) = self.root else {
            return Ok(Vec::new());
        };

        let radius_sq = radius * radius;
        let mut found = Vec::new();
        let mut stack = vec![(root, 0.0_f64)];

        while let Some((slot, bound)) = stack.pop() {
            if bound > radius_sq {
                continue;
            }
            let node = &self.nodes[slot];
            let dist_sq = query.distance_squared(&node.point);
            if dist_sq <= radius_sq {
                found.push(Candidate { dist_sq, slot });
            }
            self.push_children(&mut stack, node, query, bound);
        }

        found.sort_unstable();
        Ok(found.into_iter().map(|c| self.neighbor(c)).collect())
    }

    /// Pushes the far child then the near child, so the near side is
    /// explored first. Each child carries a lower bound on the squared
    /// distance from the query to anything in its subtree.
    fn push_children(
        &self,
        stack: &mut Vec<(usize, f64)>,
        node: &IndexNode,
        query: &Point,
        bound: f64,
    ) {
        let diff = query[node.axis] - node.point[node.axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(far) = far {
            stack.push((far, bound.max(diff * diff)));
        }
        if let Some(near) = near {
            stack.push((near, bound));
        }
    }

    fn neighbor(&self, candidate: Candidate) -> Neighbor<'_> {
        Neighbor {
            id: EntryId(candidate.slot),
            point: &self.nodes[candidate.slot].point,
            distance: candidate.dist_sq.sqrt(),
        }
    }

    /// Validates a query point: right dimensionality, finite coordinates.
    fn check_query(&self, query: &Point) -> Result<(), SpatialError> {
        self.check_dim(query)?;
        if query.is_finite() {
            Ok(())
        } else {
            Err(SpatialError::invalid_input(format!(
                "query {query} has a non-finite coordinate"
            )))
        }
    }

    fn check_dim(&self, point: &Point) -> Result<(), SpatialError> {
        if point.dim() == self.dim {
            Ok(())
        } else {
            Err(SpatialError::DimensionMismatch {
                expected: self.dim,
                actual: point.dim(),
            })
        }
    }

    /// Returns the dimensionality of the indexed space.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no points are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of levels in the tree.
    ///
    /// A balanced build of `n` points has height `⌊log2 n⌋ + 1`; sorted
    /// sequential insertion produces height `n`.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the point stored under `id`.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Point> {
        self.nodes.get(id.0).map(|node| &node.point)
    }

    /// Iterates over stored points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Point)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (EntryId(slot), &node.point))
    }
}
