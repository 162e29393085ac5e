//! Neighbor generation for lattice search.
//!
//! # Example
//!
//! ```
//! use plan_search::lattice::{Lattice, LatticeCell};
//! use plan_search::neighbors::NeighborGenerator;
//! use plan_spatial::{Shape, ShapeMap};
//! use plan_types::{Bounds, LatticeConfig};
//!
//! let lattice = Lattice::new(&LatticeConfig::new(Bounds::rectangle(10.0, 10.0)))?;
//! let mut map = ShapeMap::new(2);
//! map.push(Shape::rectangle(5.5, 0.0, 7.0, 10.0))?;
//!
//! let generator = NeighborGenerator::new(&lattice, &map);
//! let (successors, blocked) = generator.successors(&LatticeCell::from([5, 5]));
//! assert_eq!(successors.len(), 3);
//! assert_eq!(blocked, 1); // the move to x = 6
//! # Ok::<(), plan_types::PlanningError>(())
//! ```

use plan_spatial::ObstacleMap;

use crate::lattice::{Lattice, LatticeCell};

/// Generator for collision-free lattice moves.
///
/// A move is accepted when the target lies inside the lattice and the map
/// reports the straight motion between the two configurations free.
pub struct NeighborGenerator<'a, M: ObstacleMap + ?Sized> {
    /// The lattice being searched.
    lattice: &'a Lattice,
    /// Obstacle source.
    map: &'a M,
}

impl<'a, M: ObstacleMap + ?Sized> NeighborGenerator<'a, M> {
    /// Creates a generator over the given lattice and obstacles.
    #[must_use]
    pub const fn new(lattice: &'a Lattice, map: &'a M) -> Self {
        Self { lattice, map }
    }

    /// Returns the number of potential neighbours of an interior cell.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        2 * self.lattice.dim()
    }

    /// Checks if the configuration at a cell is free.
    #[must_use]
    pub fn is_free(&self, cell: &LatticeCell) -> bool {
        self.lattice.contains(cell) && self.map.is_point_free(&self.lattice.point(cell))
    }

    /// Checks if the motion between two cells is free.
    #[must_use]
    pub fn is_move_free(&self, from: &LatticeCell, to: &LatticeCell) -> bool {
        self.lattice.contains(to)
            && self
                .map
                .is_segment_free(&self.lattice.point(from), &self.lattice.point(to))
    }

    /// Returns the neighbours reachable from `cell` by a free move, together
    /// with the number of neighbours whose move is blocked.
    #[must_use]
    pub fn successors(&self, cell: &LatticeCell) -> (Vec<LatticeCell>, usize) {
        let (free, blocked): (Vec<_>, Vec<_>) = self
            .lattice
            .neighbors(cell)
            .into_iter()
            .partition(|n| self.is_move_free(cell, n));
        (free, blocked.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use plan_spatial::{FreeSpace, OccupancyGrid, Point, Shape, ShapeMap};
    use plan_types::{Bounds, LatticeConfig};

    fn lattice() -> Lattice {
        Lattice::new(&LatticeConfig::new(Bounds::rectangle(10.0, 10.0))).unwrap()
    }

    #[test]
    fn test_free_space_successors() {
        let lattice = lattice();
        let generator = NeighborGenerator::new(&lattice, &FreeSpace);
        assert_eq!(generator.neighbor_count(), 4);
        assert_eq!(generator.successors(&LatticeCell::from([5, 5])), (
            vec![
                LatticeCell::from([4, 5]),
                LatticeCell::from([6, 5]),
                LatticeCell::from([5, 4]),
                LatticeCell::from([5, 6]),
            ],
            0
        ));
        // Off-lattice neighbours are not counted as blocked
        assert_eq!(generator.successors(&LatticeCell::from([0, 0])).0.len(), 2);
        assert_eq!(generator.successors(&LatticeCell::from([0, 0])).1, 0);
    }

    #[test]
    fn test_blocked_configuration() {
        let lattice = lattice();
        let mut map = ShapeMap::new(2);
        map.push(Shape::circle(6.0, 5.0, 0.25)).unwrap();
        let generator = NeighborGenerator::new(&lattice, &map);

        assert!(!generator.is_free(&LatticeCell::from([6, 5])));
        assert!(generator.is_free(&LatticeCell::from([5, 5])));

        let (successors, blocked) = generator.successors(&LatticeCell::from([5, 5]));
        assert_eq!(successors.len(), 3);
        assert_eq!(blocked, 1);
        assert!(!successors.contains(&LatticeCell::from([6, 5])));
    }

    #[test]
    fn test_move_through_thin_obstacle_is_blocked() {
        // Both endpoints are free, the motion between them is not
        let lattice = lattice();
        let mut map = ShapeMap::new(2);
        map.push(Shape::rectangle(5.4, 0.0, 5.6, 10.0)).unwrap();
        let generator = NeighborGenerator::new(&lattice, &map);

        assert!(generator.is_free(&LatticeCell::from([6, 5])));
        assert!(!generator.is_move_free(&LatticeCell::from([5, 5]), &LatticeCell::from([6, 5])));
    }

    #[test]
    fn test_occupancy_grid_obstacles() {
        let lattice = lattice();
        let mut grid = OccupancyGrid::new(10, 10, 1.0).unwrap();
        grid.mark_point(&Point::from([5.5, 6.5])).unwrap();
        let generator = NeighborGenerator::new(&lattice, &grid);

        // Lattice point (5, 6) lies on the corner of the occupied cell
        assert!(!generator.is_free(&LatticeCell::from([5, 6])));
        assert!(!generator.is_free(&LatticeCell::from([12, 0])));
    }
}
