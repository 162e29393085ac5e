//! Discrete 2-D occupancy grid.
//!
//! An [`OccupancyGrid`] divides a rectangle of the plane into square cells of
//! side `cell_size`, starting at `origin`. Each cell is either free or
//! occupied. Cells are half-open: a point on the shared edge of two cells
//! belongs to the cell with the larger index, so the far edge of the grid is
//! already outside it. Everything outside the grid is blocked.
//!
//! Segment queries walk every cell the segment crosses with a 2-D
//! digital differential analyser (Amanatides & Woo, 1987).
//!
//! # Example
//!
//! ```
//! use plan_spatial::{ObstacleMap, OccupancyGrid, Point};
//!
//! let mut grid = OccupancyGrid::new(10, 10, 1.0)?;
//!
//! // A wall at x ∈ [5, 6) with a gap in the top row
//! grid.mark_rectangle(5.0, 0.0, 5.5, 8.5)?;
//!
//! let left = Point::from([0.5, 0.5]);
//! assert!(!grid.is_segment_free(&left, &Point::from([9.5, 0.5])));
//! assert!(grid.is_segment_free(&Point::from([0.5, 9.5]), &Point::from([9.5, 9.5])));
//! # Ok::<(), plan_spatial::SpatialError>(())
//! ```

use crate::error::SpatialError;
use crate::obstacle::ObstacleMap;
use crate::point::Point;

/// A fixed-size 2-D grid of free/occupied cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    origin: [f64; 2],
    cell_size: f64,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an all-free grid of `width × height` cells at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if either extent is zero or
    /// `cell_size` is not a positive finite number.
    pub fn new(width: usize, height: usize, cell_size: f64) -> Result<Self, SpatialError> {
        if width == 0 || height == 0 {
            return Err(SpatialError::invalid_input(format!(
                "grid extent must be non-zero, got {width}x{height}"
            )));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::invalid_input(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        let cells = width.checked_mul(height).ok_or_else(|| {
            SpatialError::invalid_input(format!("grid of {width}x{height} cells is too large"))
        })?;

        Ok(Self {
            origin: [0.0, 0.0],
            cell_size,
            width,
            height,
            cells: vec![false; cells],
        })
    }

    /// Moves the lower-left corner of the grid to `(x, y)`.
    #[must_use]
    pub const fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = [x, y];
        self
    }

    /// Returns the lower-left corner of the grid.
    #[must_use]
    pub const fn origin(&self) -> (f64, f64) {
        (self.origin[0], self.origin[1])
    }

    /// Returns the side length of a cell.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Returns the `(column, row)` of the cell containing `point`, or `None`
    /// if the point is not 2-D, not finite, or outside the grid.
    #[must_use]
    pub fn cell_of(&self, point: &Point) -> Option<(usize, usize)> {
        if point.dim() != 2 || !point.is_finite() {
            return None;
        }
        self.cell_in_grid([self.locate(point[0], 0), self.locate(point[1], 1)])
    }

    /// Returns the world-space centre of a cell.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, col: usize, row: usize) -> Point {
        Point::from([
            (col as f64 + 0.5).mul_add(self.cell_size, self.origin[0]),
            (row as f64 + 0.5).mul_add(self.cell_size, self.origin[1]),
        ])
    }

    /// Returns `true` if the cell is occupied. Cells outside the grid count
    /// as occupied.
    #[must_use]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.index(col, row).is_none_or(|i| self.cells[i])
    }

    /// Sets the state of a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if the cell is outside the grid.
    pub fn set(&mut self, col: usize, row: usize, occupied: bool) -> Result<(), SpatialError> {
        let index = self.index(col, row).ok_or_else(|| {
            SpatialError::invalid_input(format!(
                "cell ({col}, {row}) is outside a {}x{} grid",
                self.width, self.height
            ))
        })?;
        self.cells[index] = occupied;
        Ok(())
    }

    /// Marks the cell containing `point` as occupied.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] for non-2-D points and
    /// [`SpatialError::InvalidInput`] if the point lies outside the grid.
    pub fn mark_point(&mut self, point: &Point) -> Result<(), SpatialError> {
        if point.dim() != 2 {
            return Err(SpatialError::DimensionMismatch {
                expected: 2,
                actual: point.dim(),
            });
        }
        let (col, row) = self.cell_of(point).ok_or_else(|| {
            SpatialError::invalid_input(format!("point {point} is outside the grid"))
        })?;
        self.set(col, row, true)
    }

    /// Marks every cell containing a point of the closed rectangle
    /// `[x_min, x_max] × [y_min, y_max]`. Corners may be given in any order;
    /// the part outside the grid is ignored.
    ///
    /// Returns the number of cells newly marked.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if a bound is not finite.
    pub fn mark_rectangle(
        &mut self,
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    ) -> Result<usize, SpatialError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(SpatialError::invalid_input(
                "rectangle bounds must be finite",
            ));
        }
        let (Some(cols), Some(rows)) = (
            self.axis_range(x_min.min(x_max), x_min.max(x_max), 0),
            self.axis_range(y_min.min(y_max), y_min.max(y_max), 1),
        ) else {
            return Ok(0);
        };

        let mut marked = 0;
        for row in rows.0..=rows.1 {
            for col in cols.0..=cols.1 {
                marked += usize::from(self.occupy(col, row));
            }
        }
        Ok(marked)
    }

    /// Marks every cell that touches the closed disc of `radius` around
    /// `(cx, cy)`. The part outside the grid is ignored.
    ///
    /// Returns the number of cells newly marked.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidInput`] if the centre is not finite or
    /// the radius is negative or not finite.
    pub fn mark_disc(&mut self, cx: f64, cy: f64, radius: f64) -> Result<usize, SpatialError> {
        if !(cx.is_finite() && cy.is_finite()) {
            return Err(SpatialError::invalid_input("disc centre must be finite"));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SpatialError::invalid_input(format!(
                "disc radius must be non-negative and finite, got {radius}"
            )));
        }
        let (Some(cols), Some(rows)) = (
            self.axis_range(cx - radius, cx + radius, 0),
            self.axis_range(cy - radius, cy + radius, 1),
        ) else {
            return Ok(0);
        };

        let r_sq = radius * radius;
        let mut marked = 0;
        for row in rows.0..=rows.1 {
            let dy = self.closest_on_axis(row, cy, 1) - cy;
            for col in cols.0..=cols.1 {
                let dx = self.closest_on_axis(col, cx, 0) - cx;
                if dx.mul_add(dx, dy * dy) <= r_sq {
                    marked += usize::from(self.occupy(col, row));
                }
            }
        }
        Ok(marked)
    }

    /// Clears every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    /// Marks a cell known to be in range; returns `true` if it was free.
    fn occupy(&mut self, col: usize, row: usize) -> bool {
        self.index(col, row)
            .is_some_and(|i| !std::mem::replace(&mut self.cells[i], true))
    }

    /// Signed cell index of a world coordinate on `axis`.
    #[allow(clippy::cast_possible_truncation)]
    fn locate(&self, value: f64, axis: usize) -> i64 {
        ((value - self.origin[axis]) / self.cell_size).floor() as i64
    }

    fn extent(&self, axis: usize) -> i64 {
        let cells = if axis == 0 { self.width } else { self.height };
        i64::try_from(cells).unwrap_or(i64::MAX)
    }

    fn cell_in_grid(&self, cell: [i64; 2]) -> Option<(usize, usize)> {
        let col = usize::try_from(cell[0]).ok()?;
        let row = usize::try_from(cell[1]).ok()?;
        self.index(col, row).map(|_| (col, row))
    }

    /// Inclusive range of in-grid cells covering `[lo, hi]` on `axis`.
    fn axis_range(&self, lo: f64, hi: f64, axis: usize) -> Option<(usize, usize)> {
        let first = self.locate(lo, axis).max(0);
        let last = self.locate(hi, axis).min(self.extent(axis) - 1);
        if first > last {
            return None;
        }
        Some((
            usize::try_from(first).ok()?,
            usize::try_from(last).ok()?,
        ))
    }

    /// Coordinate inside cell `cell` on `axis` closest to `value`.
    #[allow(clippy::cast_precision_loss)]
    fn closest_on_axis(&self, cell: usize, value: f64, axis: usize) -> f64 {
        let lo = (cell as f64).mul_add(self.cell_size, self.origin[axis]);
        value.clamp(lo, lo + self.cell_size)
    }

    /// Walks the cells crossed by the segment `a`–`b`, in order.
    fn traverse(&self, a: &Point, b: &Point) -> CellTraversal {
        let start = [self.locate(a[0], 0), self.locate(a[1], 1)];
        let end = [self.locate(b[0], 0), self.locate(b[1], 1)];

        let mut step = [0_i64; 2];
        let mut t_max = [f64::INFINITY; 2];
        let mut t_delta = [f64::INFINITY; 2];

        #[allow(clippy::cast_precision_loss)]
        for axis in 0..2 {
            let delta = b[axis] - a[axis];
            if delta == 0.0 {
                continue;
            }
            step[axis] = if delta > 0.0 { 1 } else { -1 };
            t_delta[axis] = (self.cell_size / delta).abs();

            // Distance to the first cell boundary crossed on this axis
            let next_cell = if delta > 0.0 { start[axis] + 1 } else { start[axis] };
            let boundary = (next_cell as f64).mul_add(self.cell_size, self.origin[axis]);
            t_max[axis] = (boundary - a[axis]) / delta;
        }

        let remaining = start[0].abs_diff(end[0]) + start[1].abs_diff(end[1]) + 1;
        CellTraversal {
            current: start,
            end,
            step,
            t_max,
            t_delta,
            remaining,
        }
    }
}

impl ObstacleMap for OccupancyGrid {
    fn is_point_free(&self, point: &Point) -> bool {
        self.cell_of(point)
            .is_some_and(|(col, row)| !self.is_occupied(col, row))
    }

    fn is_segment_free(&self, a: &Point, b: &Point) -> bool {
        if !(self.is_point_free(a) && self.is_point_free(b)) {
            return false;
        }
        self.traverse(a, b).all(|cell| {
            self.cell_in_grid(cell)
                .is_some_and(|(col, row)| !self.is_occupied(col, row))
        })
    }

    fn dimension(&self) -> Option<usize> {
        Some(2)
    }
}

/// Iterator over the cells crossed by a segment.
///
/// Visits exactly one cell per unit of Manhattan distance between the end
/// cells, plus the start cell, and always finishes on the end cell.
#[derive(Debug, Clone)]
struct CellTraversal {
    current: [i64; 2],
    end: [i64; 2],
    step: [i64; 2],
    /// Segment parameter at which the next boundary on each axis is crossed.
    t_max: [f64; 2],
    /// Segment parameter between consecutive boundaries on each axis.
    t_delta: [f64; 2],
    remaining: u64,
}

impl Iterator for CellTraversal {
    type Item = [i64; 2];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let cell = self.current;

        if self.remaining > 0 {
            // Never overshoot the end cell on an axis, whatever rounding says
            let axis = if self.current[0] == self.end[0] {
                1
            } else if self.current[1] == self.end[1] || self.t_max[0] < self.t_max[1] {
                0
            } else {
                1
            };
            self.current[axis] += self.step[axis];
            self.t_max[axis] += self.t_delta[axis];
        }

        Some(cell)
    }
}
