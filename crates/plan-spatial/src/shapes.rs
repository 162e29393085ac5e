//! Continuous obstacle maps built from geometric primitives.
//!
//! A [`ShapeMap`] holds axis-aligned boxes ([`Aabb`]) and spheres
//! ([`Sphere`]) of any dimensionality, optionally inflated by a safety margin
//! at query time. Obstacles are closed sets: touching a boundary counts as a
//! collision.
//!
//! # Example
//!
//! ```
//! use plan_spatial::{ObstacleMap, Point, Shape, ShapeMap};
//!
//! let mut map = ShapeMap::new(2).with_margin(0.5);
//! map.push(Shape::rectangle(20.0, 10.0, 40.0, 20.0))?;
//! map.push(Shape::circle(10.0, 10.0, 3.0))?;
//!
//! assert!(map.is_point_free(&Point::from([0.0, 0.0])));
//! assert!(!map.is_point_free(&Point::from([19.8, 15.0]))); // inside the margin
//! assert!(!map.is_segment_free(&Point::from([0.0, 15.0]), &Point::from([50.0, 15.0])));
//! # Ok::<(), plan_spatial::SpatialError>(())
//! ```

use crate::error::SpatialError;
use crate::obstacle::ObstacleMap;
use crate::point::Point;

fn ensure_same_dim(a: &Point, b: &Point) -> Result<(), SpatialError> {
    if a.dim() == b.dim() {
        Ok(())
    } else {
        Err(SpatialError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        })
    }
}

/// An axis-aligned box in k-dimensional space.
///
/// # Example
///
/// ```
/// use plan_spatial::{Aabb, Point};
///
/// // Corners can be given in any order
/// let aabb = Aabb::new(Point::from([10.0, 0.0]), Point::from([0.0, 10.0]))?;
/// assert_eq!(aabb.min(), &Point::from([0.0, 0.0]));
/// assert!(aabb.contains(&Point::from([5.0, 5.0])));
/// # Ok::<(), plan_spatial::SpatialError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Creates a box from two opposite corners, reordering per axis.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if the corners differ in
    /// dimensionality.
    pub fn new(a: Point, b: Point) -> Result<Self, SpatialError> {
        ensure_same_dim(&a, &b)?;
        let (min, max): (Vec<f64>, Vec<f64>) = a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(&x, &y)| (x.min(y), x.max(y)))
            .unzip();
        Ok(Self {
            min: Point::new(min),
            max: Point::new(max),
        })
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

    /// Returns the dimensionality of the box.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.min.dim()
    }

    /// Returns the centre of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        self.min.lerp(&self.max, 0.5)
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.as_slice().iter().map(|v| v - margin).collect()),
            max: Point::new(self.max.as_slice().iter().map(|v| v + margin).collect()),
        }
    }

    /// Checks if a point is inside the box, boundary included.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.dim() == self.dim()
            && point
                .as_slice()
                .iter()
                .zip(self.min.as_slice().iter().zip(self.max.as_slice()))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Checks if the segment `a`–`b` touches the box.
    ///
    /// Uses slab clipping of the segment parameter `t ∈ [0, 1]`.
    #[must_use]
    pub fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        if a.dim() != self.dim() || b.dim() != self.dim() {
            return false;
        }
        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;

        for axis in 0..self.dim() {
            let start = a[axis];
            let delta = b[axis] - start;
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if delta == 0.0 {
                if start < lo || start > hi {
                    return false;
                }
                continue;
            }

            let t1 = (lo - start) / delta;
            let t2 = (hi - start) / delta;
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }
}

/// A sphere (ball) in k-dimensional space.
///
/// # Example
///
/// ```
/// use plan_spatial::{Point, Sphere};
///
/// let sphere = Sphere::new(Point::from([5.0, 5.0]), 2.0);
/// assert!(sphere.contains(&Point::from([6.0, 5.0])));
/// assert!(!sphere.contains(&Point::from([8.0, 5.0])));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    center: Point,
    radius: f64,
}

impl Sphere {
    /// Creates a sphere. The radius is made non-negative.
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Returns the centre.
    #[must_use]
    pub const fn center(&self) -> &Point {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the dimensionality of the sphere.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.center.dim()
    }

    /// Returns a copy with the radius grown by `margin`.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self::new(self.center.clone(), self.radius + margin)
    }

    /// Checks if a point is inside or on the sphere.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.dim() == self.dim()
            && point.distance_squared(&self.center) <= self.radius * self.radius
    }

    /// Checks if the segment `a`–`b` touches the sphere.
    ///
    /// Projects the centre onto the segment and compares the distance of the
    /// closest point with the radius.
    #[must_use]
    pub fn intersects_segment(&self, a: &Point, b: &Point) -> bool {
        if a.dim() != self.dim() || b.dim() != self.dim() {
            return false;
        }
        let ab = b.as_vector() - a.as_vector();
        let ac = self.center.as_vector() - a.as_vector();
        let len_sq = ab.norm_squared();
        let t = if len_sq == 0.0 {
            0.0
        } else {
            (ac.dot(&ab) / len_sq).clamp(0.0, 1.0)
        };
        let closest = a.lerp(b, t);
        self.contains(&closest)
    }
}

/// An obstacle primitive stored in a [`ShapeMap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// An axis-aligned box.
    Aabb(Aabb),
    /// A sphere.
    Sphere(Sphere),
}

impl Shape {
    /// A 2-D rectangle from its lower-left and upper-right corners.
    #[must_use]
    pub fn rectangle(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::Aabb(Aabb {
            min: Point::from([x_min.min(x_max), y_min.min(y_max)]),
            max: Point::from([x_min.max(x_max), y_min.max(y_max)]),
        })
    }

    /// A 2-D circle.
    #[must_use]
    pub fn circle(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self::Sphere(Sphere::new(Point::from([center_x, center_y]), radius))
    }

    /// Returns the dimensionality of the shape.
    #[must_use]
    pub fn dim(&self) -> usize {
        match self {
            Self::Aabb(aabb) => aabb.dim(),
            Self::Sphere(sphere) => sphere.dim(),
        }
    }

    /// Checks containment after inflating the shape by `margin`.
    #[must_use]
    pub fn contains(&self, point: &Point, margin: f64) -> bool {
        match self {
            Self::Aabb(aabb) if margin == 0.0 => aabb.contains(point),
            Self::Aabb(aabb) => aabb.inflated(margin).contains(point),
            Self::Sphere(sphere) => sphere.inflated(margin).contains(point),
        }
    }

    /// Checks segment intersection after inflating the shape by `margin`.
    #[must_use]
    pub fn intersects_segment(&self, a: &Point, b: &Point, margin: f64) -> bool {
        match self {
            Self::Aabb(aabb) if margin == 0.0 => aabb.intersects_segment(a, b),
            Self::Aabb(aabb) => aabb.inflated(margin).intersects_segment(a, b),
            Self::Sphere(sphere) => sphere.inflated(margin).intersects_segment(a, b),
        }
    }
}

impl From<Aabb> for Shape {
    fn from(aabb: Aabb) -> Self {
        Self::Aabb(aabb)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

/// A continuous obstacle map made of boxes and spheres.
///
/// Queries with a point of the wrong dimensionality are answered as blocked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeMap {
    dim: usize,
    shapes: Vec<Shape>,
    margin: f64,
}

impl ShapeMap {
    /// Creates an empty map for `dim`-dimensional configurations.
    #[must_use]
    pub const fn new(dim: usize) -> Self {
        Self {
            dim,
            shapes: Vec::new(),
            margin: 0.0,
        }
    }

    /// Creates a map holding `shapes`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if any shape has a
    /// different dimensionality.
    pub fn from_shapes(
        dim: usize,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Result<Self, SpatialError> {
        let mut map = Self::new(dim);
        for shape in shapes {
            map.push(shape)?;
        }
        Ok(map)
    }

    /// Sets the safety margin added around every obstacle.
    ///
    /// Negative and NaN margins are treated as zero.
    #[must_use]
    pub const fn with_margin(mut self, margin: f64) -> Self {
        self.margin = if margin.is_nan() || margin < 0.0 { 0.0 } else { margin };
        self
    }

    /// Adds an obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if the shape does not
    /// match the map's dimensionality.
    pub fn push(&mut self, shape: Shape) -> Result<(), SpatialError> {
        if shape.dim() != self.dim {
            return Err(SpatialError::DimensionMismatch {
                expected: self.dim,
                actual: shape.dim(),
            });
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Returns the obstacles.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Returns the safety margin.
    #[must_use]
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Returns the number of obstacles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the map has no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl ObstacleMap for ShapeMap {
    fn is_point_free(&self, point: &Point) -> bool {
        point.dim() == self.dim && !self.shapes.iter().any(|s| s.contains(point, self.margin))
    }

    fn is_segment_free(&self, a: &Point, b: &Point) -> bool {
        a.dim() == self.dim
            && b.dim() == self.dim
            && !self
                .shapes
                .iter()
                .any(|s| s.intersects_segment(a, b, self.margin))
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dim)
    }
}
