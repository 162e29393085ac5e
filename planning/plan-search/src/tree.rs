//! The search tree grown by the sampling planner, and path extraction.
//!
//! Nodes are stored in an arena ([`SearchTree`]) and refer to their parent
//! by [`NodeId`]. Children never own their parents: the parent id is a
//! lookup key into the arena. Nodes are never modified after insertion.
//!
//! # Example
//!
//! ```
//! use plan_search::tree::{PathExtractor, SearchTree};
//! use plan_spatial::{KdTree, Point};
//!
//! let mut index = KdTree::new(2)?;
//! let mut tree = SearchTree::new();
//!
//! let a = Point::from([0.0, 0.0]);
//! let root = tree.add_root(a.clone(), index.insert(a)?)?;
//!
//! let b = Point::from([1.0, 0.0]);
//! let child = tree.add_child(root, b.clone(), index.insert(b)?)?;
//!
//! let path = PathExtractor::new(&tree).extract(child)?;
//! assert_eq!(path.len(), 2);
//! assert_eq!(path.first(), Some(&Point::from([0.0, 0.0])));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use plan_spatial::{EntryId, Point};
use plan_types::{Path, PlanningError};

/// Identifier of a node in a [`SearchTree`], in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A configuration reached by the planner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    id: NodeId,
    point: Point,
    parent: Option<NodeId>,
    entry: EntryId,
    depth: usize,
    cost: f64,
}

impl TreeNode {
    /// Returns the node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Returns the parent id, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the id of the same configuration in the spatial index.
    #[must_use]
    pub const fn entry(&self) -> EntryId {
        self.entry
    }

    /// Returns the number of edges between this node and the root.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the length of the tree path from the root to this node.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }
}

/// A flattened tree node: its configuration and the position of its parent
/// in the same listing (`None` for the root).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotEntry {
    /// The configuration.
    pub point: Point,
    /// Index of the parent entry in the snapshot.
    pub parent_index: Option<usize>,
}

/// Arena of [`TreeNode`]s rooted at the start configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
}

impl SearchTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds the root node.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] if the tree already has a
    /// root.
    pub fn add_root(&mut self, point: Point, entry: EntryId) -> Result<NodeId, PlanningError> {
        if !self.nodes.is_empty() {
            return Err(PlanningError::invalid_config("search tree already has a root"));
        }
        let id = NodeId(0);
        self.nodes.push(TreeNode {
            id,
            point,
            parent: None,
            entry,
            depth: 0,
            cost: 0.0,
        });
        Ok(id)
    }

    /// Adds a node below `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DisconnectedPath`] if `parent` is not in the
    /// tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        point: Point,
        entry: EntryId,
    ) -> Result<NodeId, PlanningError> {
        let (depth, cost) = {
            let parent_node = self.get(parent).ok_or_else(|| {
                PlanningError::disconnected_path(format!("parent {parent} is not in the tree"))
            })?;
            (
                parent_node.depth + 1,
                parent_node.cost + parent_node.point.distance(&point),
            )
        };

        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            id,
            point,
            parent: Some(parent),
            entry,
            depth,
            cost,
        });
        Ok(id)
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Returns the root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Returns the deepest level reached.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Flattens the tree into `(point, parent_index)` entries in insertion
    /// order, suitable for drawing the tree.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.nodes
            .iter()
            .map(|node| SnapshotEntry {
                point: node.point.clone(),
                parent_index: node.parent.map(NodeId::index),
            })
            .collect()
    }
}

/// Reconstructs start-to-node paths by following parent links.
///
/// # Example
///
/// ```
/// use plan_search::tree::{PathExtractor, SearchTree};
///
/// let tree = SearchTree::new();
/// let error = PathExtractor::new(&tree).extract_root_path().unwrap_err();
/// assert!(error.is_disconnected_path());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathExtractor<'a> {
    tree: &'a SearchTree,
}

impl<'a> PathExtractor<'a> {
    /// Creates an extractor over the given tree.
    #[must_use]
    pub const fn new(tree: &'a SearchTree) -> Self {
        Self { tree }
    }

    /// Returns the path from the root to `node`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DisconnectedPath`] if `node` is unknown, a
    /// parent link points outside the tree, a parentless node other than the
    /// root is reached, or the walk takes more steps than there are nodes.
    pub fn extract(&self, node: NodeId) -> Result<Path, PlanningError> {
        let mut current = self.tree.get(node).ok_or_else(|| {
            PlanningError::disconnected_path(format!("node {node} is not in the tree"))
        })?;
        let mut points = vec![current.point.clone()];

        while let Some(parent) = current.parent {
            if points.len() > self.tree.len() {
                return Err(PlanningError::disconnected_path(format!(
                    "parent links from {node} form a cycle"
                )));
            }
            current = self.tree.get(parent).ok_or_else(|| {
                PlanningError::disconnected_path(format!(
                    "{} references missing parent {parent}",
                    current.id
                ))
            })?;
            points.push(current.point.clone());
        }

        if current.id != NodeId(0) {
            return Err(PlanningError::disconnected_path(format!(
                "walk from {node} stopped at {} instead of the root",
                current.id
            )));
        }

        points.reverse();
        Ok(Path::new(points))
    }

    /// Returns the single-point path of the root.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DisconnectedPath`] if the tree is empty.
    pub fn extract_root_path(&self) -> Result<Path, PlanningError> {
        self.extract(NodeId(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_spatial::KdTree;

    fn p(x: f64, y: f64) -> Point {
        Point::from([x, y])
    }

    /// Builds a chain root -> ... along the given points.
    fn chain(points: &[Point]) -> (SearchTree, Vec<NodeId>) {
        let mut index = KdTree::new(2).unwrap();
        let mut tree = SearchTree::new();
        let mut ids = Vec::new();
        for (i, point) in points.iter().enumerate() {
            let entry = index.insert(point.clone()).unwrap();
            let id = if i == 0 {
                tree.add_root(point.clone(), entry).unwrap()
            } else {
                tree.add_child(ids[i - 1], point.clone(), entry).unwrap()
            };
            ids.push(id);
        }
        (tree, ids)
    }

    /// A tree whose nodes' parent links are set by hand.
    fn raw_tree(parents: &[Option<usize>]) -> SearchTree {
        let mut index = KdTree::new(2).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let nodes = parents
            .iter()
            .enumerate()
            .map(|(i, parent)| {
                let point = p(i as f64, 0.0);
                TreeNode {
                    id: NodeId(i),
                    entry: index.insert(point.clone()).unwrap(),
                    point,
                    parent: parent.map(NodeId),
                    depth: 0,
                    cost: 0.0,
                }
            })
            .collect();
        SearchTree { nodes }
    }

    // ==================== SearchTree Tests ====================

    #[test]
    fn test_root_and_children() {
        let (tree, ids) = chain(&[p(0.0, 0.0), p(3.0, 4.0), p(3.0, 10.0)]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().unwrap().id(), ids[0]);
        assert!(tree.root().unwrap().parent().is_none());

        let leaf = tree.get(ids[2]).unwrap();
        assert_eq!(leaf.parent(), Some(ids[1]));
        assert_eq!(leaf.depth(), 2);
        assert_relative_eq!(leaf.cost(), 11.0, epsilon = 1e-12);
        assert_eq!(leaf.entry().index(), 2);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_second_root_rejected() {
        let (mut tree, _) = chain(&[p(0.0, 0.0)]);
        let mut index = KdTree::new(2).unwrap();
        let entry = index.insert(p(1.0, 1.0)).unwrap();
        assert!(tree.add_root(p(1.0, 1.0), entry).is_err());
    }

    #[test]
    fn test_child_of_unknown_parent_rejected() {
        let (mut tree, _) = chain(&[p(0.0, 0.0)]);
        let mut index = KdTree::new(2).unwrap();
        let entry = index.insert(p(1.0, 1.0)).unwrap();
        let error = tree.add_child(NodeId(5), p(1.0, 1.0), entry).unwrap_err();
        assert!(error.is_disconnected_path());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let (tree, _) = chain(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        let snapshot = tree.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].parent_index, None);
        assert_eq!(snapshot[1].parent_index, Some(0));
        assert_eq!(snapshot[2].parent_index, Some(1));
        assert_eq!(snapshot[2].point, p(2.0, 0.0));
    }

    // ==================== PathExtractor Tests ====================

    #[test]
    fn test_extract_chain() {
        let (tree, ids) = chain(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        let path = PathExtractor::new(&tree).extract(ids[2]).unwrap();
        assert_eq!(path.points(), &[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        assert_relative_eq!(path.length(), 2.0);
    }

    #[test]
    fn test_extract_root() {
        let (tree, ids) = chain(&[p(4.0, 2.0)]);
        let extractor = PathExtractor::new(&tree);
        assert_eq!(extractor.extract(ids[0]).unwrap().len(), 1);
        assert_eq!(extractor.extract_root_path().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_unknown_node() {
        let (tree, _) = chain(&[p(0.0, 0.0)]);
        let error = PathExtractor::new(&tree).extract(NodeId(3)).unwrap_err();
        assert!(error.is_disconnected_path());
        assert!(error.to_string().contains("n3"));
    }

    #[test]
    fn test_extract_dangling_parent() {
        let tree = raw_tree(&[None, Some(0), Some(7)]);
        let error = PathExtractor::new(&tree).extract(NodeId(2)).unwrap_err();
        assert!(error.to_string().contains("missing parent n7"));
    }

    #[test]
    fn test_extract_cycle() {
        let tree = raw_tree(&[None, Some(2), Some(1)]);
        let error = PathExtractor::new(&tree).extract(NodeId(2)).unwrap_err();
        assert!(error.to_string().contains("cycle"));
    }

    #[test]
    fn test_extract_orphan() {
        let tree = raw_tree(&[None, None, Some(1)]);
        let error = PathExtractor::new(&tree).extract(NodeId(2)).unwrap_err();
        assert!(error.is_disconnected_path());
        assert!(error.to_string().contains("instead of the root"));
    }
}
