//! Planned paths.
//!
//! A [`Path`] is the ordered sequence of configurations a planner returns,
//! from the start to the configuration that reached the goal region. The
//! Euclidean length is computed once at construction.

use plan_spatial::Point;

/// An ordered sequence of configurations with cached length.
///
/// # Example
///
/// ```
/// use plan_spatial::Point;
/// use plan_types::Path;
///
/// let path = Path::new(vec![
///     Point::from([0.0, 0.0]),
///     Point::from([3.0, 4.0]),
///     Point::from([3.0, 10.0]),
/// ]);
///
/// assert_eq!(path.len(), 3);
/// assert!((path.length() - 11.0).abs() < 1e-10);
/// assert_eq!(path.first(), Some(&Point::from([0.0, 0.0])));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Ordered configurations, start first.
    points: Vec<Point>,
    /// Cached path length.
    length: f64,
}

impl Path {
    /// Creates a path from its configurations.
    ///
    /// The path length is automatically computed.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        let length = Self::compute_length(&points);
        Self { points, length }
    }

    /// Creates an empty path.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            length: 0.0,
        }
    }

    /// Returns the number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the path has no configurations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the total Euclidean length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Returns the configurations as a slice.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the first configuration, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Returns the last configuration, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Returns the configuration at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Returns an iterator over the configurations.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Returns an iterator over consecutive pairs of configurations.
    ///
    /// # Example
    ///
    /// ```
    /// use plan_spatial::Point;
    /// use plan_types::Path;
    ///
    /// let path = Path::new(vec![
    ///     Point::from([0.0]),
    ///     Point::from([1.0]),
    ///     Point::from([3.0]),
    /// ]);
    /// assert_eq!(path.segments().count(), 2);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Returns a copy running from the last configuration to the first.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            length: self.length,
        }
    }

    /// Consumes the path and returns its configurations.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    fn compute_length(points: &[Point]) -> f64 {
        points
            .windows(2)
            .fold(0.0, |acc, w| acc + w[0].distance(&w[1]))
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Point> for Path {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::from([x, y])
    }

    #[test]
    fn test_empty_path() {
        let path = Path::empty();
        assert!(path.is_empty());
        assert_eq!(path.length(), 0.0);
        assert!(path.first().is_none());
        assert_eq!(path, Path::default());
    }

    #[test]
    fn test_single_point_path() {
        let path = Path::new(vec![p(1.0, 1.0)]);
        assert_eq!(path.len(), 1);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.first(), path.last());
        assert_eq!(path.segments().count(), 0);
    }

    #[test]
    fn test_path_length() {
        let path: Path = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(4.0, 5.0)]
            .into_iter()
            .collect();
        assert_relative_eq!(path.length(), 7.0, epsilon = 1e-12);
        assert_eq!(path.get(2), Some(&p(1.0, 1.0)));
    }

    #[test]
    fn test_reversed() {
        let path = Path::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
        let reversed = path.reversed();
        assert_eq!(reversed.first(), path.last());
        assert_eq!(reversed.last(), path.first());
        assert_relative_eq!(reversed.length(), path.length());
    }

    #[test]
    fn test_into_iterators() {
        let path = Path::new(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        assert_eq!((&path).into_iter().count(), 2);
        let points: Vec<Point> = path.clone().into_iter().collect();
        assert_eq!(points, path.into_points());
    }
}
