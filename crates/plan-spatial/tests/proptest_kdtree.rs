//! Property-based tests for the KD-tree.
//!
//! Every query is checked against a brute-force linear scan over the same
//! points.
//!
//! Run with: cargo test -p plan-spatial -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use plan_spatial::{KdTree, Point};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A point with `dim` coordinates on a coarse grid, so that exact ties occur.
fn arb_grid_point(dim: usize) -> impl Strategy<Value = Point> {
    prop::collection::vec((-20i32..20).prop_map(|v| f64::from(v) * 0.5), dim).prop_map(Point::new)
}

/// A point with `dim` continuous coordinates.
fn arb_point(dim: usize) -> impl Strategy<Value = Point> {
    prop::collection::vec(-100.0..100.0f64, dim).prop_map(Point::new)
}

/// A dimension, a non-empty batch of points and a query point.
fn arb_case() -> impl Strategy<Value = (Vec<Point>, Point)> {
    (1usize..=4).prop_flat_map(|dim| {
        (
            prop::collection::vec(
                prop_oneof![arb_grid_point(dim), arb_point(dim)],
                1..120,
            ),
            prop_oneof![arb_grid_point(dim), arb_point(dim)],
        )
    })
}

// =============================================================================
// Linear Scan Reference
// =============================================================================

/// `(distance², index)` pairs sorted the way the index orders its results.
fn scan(points: &[Point], query: &Point) -> Vec<(f64, usize)> {
    let mut all: Vec<_> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (p.distance_squared(query), i))
        .collect();
    all.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    all
}

fn insert_all(points: &[Point]) -> KdTree {
    let mut tree = KdTree::new(points[0].dim()).unwrap();
    for p in points {
        tree.insert(p.clone()).unwrap();
    }
    tree
}

// =============================================================================
// Property Tests: Queries vs Linear Scan
// =============================================================================

proptest! {
    /// The nearest neighbour is the linear-scan minimum, lowest id on ties.
    #[test]
    fn proptest_nearest_matches_scan((points, query) in arb_case()) {
        let tree = KdTree::build(points.clone()).unwrap();
        let expected = scan(&points, &query)[0];

        let nearest = tree.nearest(&query).unwrap();
        prop_assert_eq!(nearest.id.index(), expected.1);
        prop_assert_eq!(nearest.distance, expected.0.sqrt());
    }

    /// A stored point is its own nearest neighbour at distance zero.
    #[test]
    fn proptest_nearest_of_member_is_zero((points, _query) in arb_case(), pick in any::<prop::sample::Index>()) {
        let tree = KdTree::build(points.clone()).unwrap();
        let member = &points[pick.index(points.len())];

        let nearest = tree.nearest(member).unwrap();
        prop_assert_eq!(nearest.distance, 0.0);
        prop_assert_eq!(nearest.point, member);
    }

    /// k-nearest returns the first k of the sorted linear scan.
    #[test]
    fn proptest_k_nearest_matches_scan((points, query) in arb_case(), k in 0usize..30) {
        let tree = KdTree::build(points.clone()).unwrap();
        let expected: Vec<usize> = scan(&points, &query).iter().take(k).map(|&(_, i)| i).collect();

        let found: Vec<usize> = tree
            .k_nearest(&query, k)
            .unwrap()
            .iter()
            .map(|n| n.id.index())
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Radius queries return exactly the linear-scan subset.
    #[test]
    fn proptest_within_radius_matches_scan((points, query) in arb_case(), radius in 0.0..60.0f64) {
        let tree = KdTree::build(points.clone()).unwrap();
        let expected: Vec<usize> = scan(&points, &query)
            .iter()
            .filter(|&&(d, _)| d <= radius * radius)
            .map(|&(_, i)| i)
            .collect();

        let found: Vec<usize> = tree
            .within_radius(&query, radius)
            .unwrap()
            .iter()
            .map(|n| n.id.index())
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Growing the radius never loses a result.
    #[test]
    fn proptest_within_radius_monotonic(
        (points, query) in arb_case(),
        r1 in 0.0..60.0f64,
        extra in 0.0..60.0f64,
    ) {
        let tree = KdTree::build(points).unwrap();
        let small: Vec<_> = tree.within_radius(&query, r1).unwrap().iter().map(|n| n.id).collect();
        let large: Vec<_> = tree.within_radius(&query, r1 + extra).unwrap().iter().map(|n| n.id).collect();

        prop_assert!(small.len() <= large.len());
        for id in small {
            prop_assert!(large.contains(&id));
        }
    }
}

// =============================================================================
// Property Tests: Build vs Insert
// =============================================================================

proptest! {
    /// A batch-built tree and an incrementally grown tree answer identically.
    #[test]
    fn proptest_build_and_insert_agree((points, query) in arb_case(), k in 1usize..10, radius in 0.0..40.0f64) {
        let built = KdTree::build(points.clone()).unwrap();
        let grown = insert_all(&points);

        prop_assert_eq!(built.len(), grown.len());

        let a = built.nearest(&query).unwrap();
        let b = grown.nearest(&query).unwrap();
        prop_assert_eq!(a.id, b.id);
        prop_assert_eq!(a.distance, b.distance);

        let a: Vec<_> = built.k_nearest(&query, k).unwrap().iter().map(|n| n.id).collect();
        let b: Vec<_> = grown.k_nearest(&query, k).unwrap().iter().map(|n| n.id).collect();
        prop_assert_eq!(a, b);

        let a: Vec<_> = built.within_radius(&query, radius).unwrap().iter().map(|n| n.id).collect();
        let b: Vec<_> = grown.within_radius(&query, radius).unwrap().iter().map(|n| n.id).collect();
        prop_assert_eq!(a, b);
    }

    /// Ids follow batch order and every stored point is retrievable.
    #[test]
    fn proptest_ids_follow_insertion_order((points, _query) in arb_case()) {
        let tree = KdTree::build(points.clone()).unwrap();
        for (id, point) in tree.iter() {
            prop_assert_eq!(point, &points[id.index()]);
            prop_assert_eq!(tree.get(id), Some(point));
        }
        prop_assert_eq!(tree.iter().count(), points.len());
    }
}
