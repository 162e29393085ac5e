//! Points in k-dimensional configuration space.
//!
//! A [`Point`] is an immutable, ordered tuple of `f64` coordinates. The
//! dimensionality is a runtime property so that a single index or planner
//! can be configured for 2-D, 3-D or higher-dimensional spaces.
//!
//! # Example
//!
//! ```
//! use plan_spatial::Point;
//!
//! let a = Point::from([0.0, 0.0]);
//! let b = Point::from([3.0, 4.0]);
//!
//! assert_eq!(a.dim(), 2);
//! assert!((a.distance(&b) - 5.0).abs() < 1e-12);
//!
//! // Step at most 1.0 towards b
//! let step = a.steer_towards(&b, 1.0);
//! assert!((a.distance(&step) - 1.0).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::Index;

use nalgebra::DVector;

/// A point in k-dimensional Euclidean space.
///
/// Equality is coordinate-wise. Points are never mutated after creation;
/// operations that move a point return a new one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    coords: DVector<f64>,
}

impl Point {
    /// Creates a point from a vector of coordinates.
    #[must_use]
    pub fn new(coords: Vec<f64>) -> Self {
        Self {
            coords: DVector::from_vec(coords),
        }
    }

    /// Creates a point by copying a coordinate slice.
    #[must_use]
    pub fn from_slice(coords: &[f64]) -> Self {
        Self {
            coords: DVector::from_column_slice(coords),
        }
    }

    /// Creates the origin of a `dim`-dimensional space.
    #[must_use]
    pub fn origin(dim: usize) -> Self {
        Self {
            coords: DVector::zeros(dim),
        }
    }

    /// Returns the number of coordinates.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Returns the coordinate on `axis`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, axis: usize) -> Option<f64> {
        self.coords.get(axis).copied()
    }

    /// Returns the coordinates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        self.coords.as_slice()
    }

    /// Returns the underlying nalgebra vector.
    #[must_use]
    pub const fn as_vector(&self) -> &DVector<f64> {
        &self.coords
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Both points must have the same dimensionality.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.dim(), other.dim());
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation: `self + t * (other - self)`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            coords: &self.coords + (&other.coords - &self.coords) * t,
        }
    }

    /// Moves from `self` towards `target` by at most `max_step`.
    ///
    /// Returns `target` itself when it is already within `max_step`.
    #[must_use]
    pub fn steer_towards(&self, target: &Self, max_step: f64) -> Self {
        let delta = &target.coords - &self.coords;
        let distance = delta.norm();
        if distance <= max_step {
            return target.clone();
        }
        Self {
            coords: &self.coords + delta * (max_step / distance),
        }
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(coords: [f64; N]) -> Self {
        Self::from_slice(&coords)
    }
}

impl From<DVector<f64>> for Point {
    fn from(coords: DVector<f64>) -> Self {
        Self { coords }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
