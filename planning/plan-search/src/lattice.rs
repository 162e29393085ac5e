//! Regular lattices of configurations.
//!
//! A lattice places one configuration every `step_size` units along each
//! axis, starting at the minimum corner of the bounds. Cells are addressed
//! by their integer index along each axis.

use std::fmt;

use plan_spatial::Point;
use plan_types::{Bounds, LatticeConfig, PlanningError};

/// Integer address of a lattice configuration.
///
/// # Example
///
/// ```
/// use plan_search::lattice::LatticeCell;
///
/// let cell = LatticeCell::from([2, 3]);
/// assert_eq!(cell.indices(), &[2, 3]);
/// assert_eq!(cell.to_string(), "[2, 3]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeCell(Vec<usize>);

impl LatticeCell {
    /// Creates a cell from per-axis indices.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns the per-axis indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }
}

impl<const N: usize> From<[usize; N]> for LatticeCell {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for LatticeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// The set of configurations `min + i * step` inside some bounds.
///
/// # Example
///
/// ```
/// use plan_search::lattice::{Lattice, LatticeCell};
/// use plan_spatial::Point;
/// use plan_types::{Bounds, LatticeConfig};
///
/// let lattice = Lattice::new(&LatticeConfig::new(Bounds::rectangle(10.0, 4.0)).with_step_size(2.0))?;
/// assert_eq!(lattice.counts(), &[6, 3]);
///
/// let cell = lattice.nearest_cell(&Point::from([4.9, 1.2])).unwrap();
/// assert_eq!(cell, LatticeCell::from([2, 1]));
/// assert_eq!(lattice.point(&cell), Point::from([4.0, 2.0]));
/// # Ok::<(), plan_types::PlanningError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    bounds: Bounds,
    step: f64,
    counts: Vec<usize>,
}

impl Lattice {
    /// Creates the lattice described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] if the configuration is
    /// invalid.
    pub fn new(config: &LatticeConfig) -> Result<Self, PlanningError> {
        config.try_validate()?;
        Ok(Self {
            bounds: config.bounds().clone(),
            step: config.step_size(),
            counts: config.cells_per_axis(),
        })
    }

    /// Returns the region the lattice covers.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the spacing between neighbouring configurations.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Returns the number of configurations along each axis.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.iter().product()
    }

    /// Returns `true` if the lattice has no configurations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the cell addresses a configuration of this lattice.
    #[must_use]
    pub fn contains(&self, cell: &LatticeCell) -> bool {
        cell.dim() == self.dim()
            && cell
                .indices()
                .iter()
                .zip(&self.counts)
                .all(|(&i, &count)| i < count)
    }

    /// Returns the configuration at a cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn point(&self, cell: &LatticeCell) -> Point {
        self.bounds
            .min()
            .as_slice()
            .iter()
            .zip(cell.indices())
            .map(|(&origin, &i)| origin + i as f64 * self.step)
            .collect::<Vec<_>>()
            .into()
    }

    /// Returns the cell whose configuration is closest to `point`.
    ///
    /// Returns `None` if the point has the wrong dimensionality, is not
    /// finite or lies outside the bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn nearest_cell(&self, point: &Point) -> Option<LatticeCell> {
        if point.dim() != self.dim() || !point.is_finite() || !self.bounds.contains(point) {
            return None;
        }
        let indices = point
            .as_slice()
            .iter()
            .zip(self.bounds.min().as_slice())
            .zip(&self.counts)
            .map(|((&c, &origin), &count)| {
                let i = ((c - origin) / self.step).round().max(0.0) as usize;
                i.min(count.saturating_sub(1))
            })
            .collect();
        Some(LatticeCell(indices))
    }

    /// Returns the face neighbours of a cell that lie inside the lattice.
    ///
    /// For each axis the lower neighbour comes before the upper one.
    #[must_use]
    pub fn neighbors(&self, cell: &LatticeCell) -> Vec<LatticeCell> {
        let mut result = Vec::with_capacity(2 * self.dim());
        for (axis, (&i, &count)) in cell.indices().iter().zip(&self.counts).enumerate() {
            if i > 0 {
                let mut lower = cell.clone();
                lower.0[axis] = i - 1;
                result.push(lower);
            }
            if i + 1 < count {
                let mut upper = cell.clone();
                upper.0[axis] = i + 1;
                result.push(upper);
            }
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn lattice(width: f64, height: f64, step: f64) -> Lattice {
        Lattice::new(&LatticeConfig::new(Bounds::rectangle(width, height)).with_step_size(step))
            .unwrap()
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_counts_include_both_edges() {
        let lattice = lattice(10.0, 10.0, 1.0);
        assert_eq!(lattice.counts(), &[11, 11]);
        assert_eq!(lattice.len(), 121);
        assert!(!lattice.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LatticeConfig::new(Bounds::rectangle(10.0, 10.0)).with_step_size(-1.0);
        assert!(Lattice::new(&config).unwrap_err().is_invalid_config());
    }

    #[test]
    fn test_offset_origin() {
        let bounds = Bounds::new(Point::from([-2.0, 1.0]), Point::from([2.0, 3.0]));
        let lattice = Lattice::new(&LatticeConfig::new(bounds).with_step_size(0.5)).unwrap();
        assert_eq!(lattice.point(&LatticeCell::from([0, 0])), Point::from([-2.0, 1.0]));
        assert_eq!(lattice.point(&LatticeCell::from([8, 4])), Point::from([2.0, 3.0]));
    }

    // ==================== Snapping Tests ====================

    #[test]
    fn test_nearest_cell_rounds() {
        let lattice = lattice(10.0, 10.0, 2.0);
        assert_eq!(
            lattice.nearest_cell(&Point::from([2.9, 3.1])),
            Some(LatticeCell::from([1, 2]))
        );
        assert_eq!(
            lattice.nearest_cell(&Point::from([0.0, 10.0])),
            Some(LatticeCell::from([0, 5]))
        );
    }

    #[test]
    fn test_nearest_cell_clamps_to_last_configuration() {
        // Configurations at 0, 4 and 8; 10 is closest to 8
        let lattice = lattice(10.0, 10.0, 4.0);
        assert_eq!(
            lattice.nearest_cell(&Point::from([10.0, 10.0])),
            Some(LatticeCell::from([2, 2]))
        );
    }

    #[test]
    fn test_nearest_cell_rejects_outside_points() {
        let lattice = lattice(10.0, 10.0, 1.0);
        assert!(lattice.nearest_cell(&Point::from([-0.1, 5.0])).is_none());
        assert!(lattice.nearest_cell(&Point::from([5.0, f64::NAN])).is_none());
        assert!(lattice.nearest_cell(&Point::from([5.0])).is_none());
    }

    // ==================== Neighbor Tests ====================

    #[test]
    fn test_interior_cell_has_face_neighbors() {
        let lattice = lattice(10.0, 10.0, 1.0);
        let neighbors = lattice.neighbors(&LatticeCell::from([5, 5]));
        assert_eq!(
            neighbors,
            vec![
                LatticeCell::from([4, 5]),
                LatticeCell::from([6, 5]),
                LatticeCell::from([5, 4]),
                LatticeCell::from([5, 6]),
            ]
        );
    }

    #[test]
    fn test_corner_cell_neighbors_stay_inside() {
        let lattice = lattice(10.0, 10.0, 1.0);
        assert_eq!(lattice.neighbors(&LatticeCell::from([0, 0])).len(), 2);
        assert_eq!(lattice.neighbors(&LatticeCell::from([10, 10])).len(), 2);
        assert_eq!(lattice.neighbors(&LatticeCell::from([0, 4])).len(), 3);
        for cell in lattice.neighbors(&LatticeCell::from([10, 0])) {
            assert!(lattice.contains(&cell));
        }
    }

    #[test]
    fn test_three_dimensional_neighbors() {
        let config = LatticeConfig::new(Bounds::cube(3, 0.0, 4.0));
        let lattice = Lattice::new(&config).unwrap();
        assert_eq!(lattice.neighbors(&LatticeCell::from([2, 2, 2])).len(), 6);
        assert!(!lattice.contains(&LatticeCell::from([2, 2])));
        assert!(!lattice.contains(&LatticeCell::from([2, 5, 2])));
    }
}
