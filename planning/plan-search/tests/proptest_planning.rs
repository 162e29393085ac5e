//! Property-based tests for the planners.
//!
//! Run with: cargo test -p plan-search -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use plan_search::{LatticeBfs, PathSmoother, RrtSession, SessionStatus};
use plan_spatial::{ObstacleMap, Point, Shape, ShapeMap};
use plan_types::{Bounds, LatticeConfig, RrtConfig};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A configuration inside the 50 x 50 field.
fn arb_point() -> impl Strategy<Value = Point> {
    (0.0..50.0f64, 0.0..50.0f64).prop_map(|(x, y)| Point::from([x, y]))
}

/// A map of up to five discs.
fn arb_map() -> impl Strategy<Value = ShapeMap> {
    prop::collection::vec((5.0..45.0f64, 5.0..45.0f64, 1.0..5.0f64), 0..5).prop_map(|discs| {
        let mut map = ShapeMap::new(2);
        for (x, y, r) in discs {
            map.push(Shape::circle(x, y, r)).unwrap();
        }
        map
    })
}

/// A map with free start and goal configurations.
fn arb_problem() -> impl Strategy<Value = (ShapeMap, Point, Point)> {
    (arb_map(), arb_point(), arb_point())
        .prop_filter("start and goal must be free", |(map, start, goal)| {
            map.is_point_free(start) && map.is_point_free(goal)
        })
}

// =============================================================================
// RRT Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every tree edge is collision-free and no longer than the extension.
    #[test]
    fn proptest_rrt_tree_edges_are_valid(
        (map, start, goal) in arb_problem(),
        seed in any::<u64>(),
    ) {
        let config = RrtConfig::new(Bounds::rectangle(50.0, 50.0))
            .with_max_extension(3.0)
            .with_max_samples(300)
            .with_seed(seed);
        let mut session = RrtSession::new(config, start, goal, &map).unwrap();
        let status = session.run();
        prop_assert!(status == SessionStatus::Solved || status == SessionStatus::Exhausted);
        prop_assert!(session.samples() <= 300);

        let tree = session.tree();
        for node in tree.iter().skip(1) {
            let parent = tree.get(node.parent().unwrap()).unwrap();
            prop_assert!(node.point().distance(parent.point()) <= 3.0 + 1e-9);
            prop_assert!(map.is_segment_free(parent.point(), node.point()));
        }
        prop_assert_eq!(session.index().len(), tree.len());
    }

    /// A solved session's path starts at the start and ends in the goal region.
    #[test]
    fn proptest_rrt_path_endpoints(
        (map, start, goal) in arb_problem(),
        seed in any::<u64>(),
    ) {
        let config = RrtConfig::new(Bounds::rectangle(50.0, 50.0))
            .with_max_extension(3.0)
            .with_goal_tolerance(1.5)
            .with_goal_bias(0.2)
            .with_max_samples(2_000)
            .with_seed(seed);
        let mut session = RrtSession::new(config, start.clone(), goal.clone(), &map).unwrap();
        if session.run() == SessionStatus::Solved {
            let path = session.path().unwrap();
            prop_assert_eq!(path.first(), Some(&start));
            prop_assert!(path.last().unwrap().distance(&goal) <= 1.5);
        } else {
            prop_assert!(session.path().unwrap_err().is_not_solved());
        }
    }
}

// =============================================================================
// Lattice and Smoothing Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Lattice paths use unit moves and free segments only.
    #[test]
    fn proptest_lattice_moves_are_valid((map, start, goal) in arb_problem()) {
        let planner = LatticeBfs::new(LatticeConfig::new(Bounds::rectangle(50.0, 50.0)));
        if let Ok((path, _)) = planner.solve(&start, &goal, &map) {
            prop_assert!(path.last().unwrap().distance(&goal) <= 1.0);
            for (a, b) in path.segments() {
                prop_assert!((a.distance(b) - 1.0).abs() < 1e-9);
                prop_assert!(map.is_segment_free(a, b));
            }
        }
    }

    /// Smoothing keeps endpoints and never lengthens a path.
    #[test]
    fn proptest_smoothing_never_lengthens((map, start, goal) in arb_problem()) {
        let planner = LatticeBfs::new(LatticeConfig::new(Bounds::rectangle(50.0, 50.0)));
        if let Ok((path, _)) = planner.solve(&start, &goal, &map) {
            let smoother = PathSmoother::new(&map);
            let smoothed = smoother.smooth(&path);
            prop_assert_eq!(smoothed.first(), path.first());
            prop_assert_eq!(smoothed.last(), path.last());
            prop_assert!(smoothed.length() <= path.length() + 1e-9);
            prop_assert!(smoother.is_path_free(&smoothed));
        }
    }
}
