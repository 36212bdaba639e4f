//! Regular rectangular grids and their padded sub-grids.

use crate::{
    error::InvalidDimension,
    extent::{Extent, RingBox},
};
use geo::{coord, Rect};

/// A regular cell layout over an extent.
///
/// Row 0 lies at the top of the extent (largest `y`); columns increase with
/// `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    extent: Extent,
    dx: f64,
    dy: f64,
    ncols: usize,
    nrows: usize,
}

impl Grid {
    /// Initializes a new grid by dividing an extent into
    /// `ncols` × `nrows` cells.
    ///
    /// # Errors
    ///
    /// [`InvalidDimension`] if a dimension is zero.
    pub fn new(
        extent: Extent,
        ncols: usize,
        nrows: usize,
    ) -> Result<Self, InvalidDimension> {
        if ncols == 0 || nrows == 0 {
            return Err(InvalidDimension::new("zero rows or columns"));
        }

        let dx = extent.width() / ncols as f64;
        let dy = extent.height() / nrows as f64;

        Ok(Self::from_parts(extent, dx, dy, ncols, nrows))
    }

    /// Builds a grid from an already consistent set of parts.
    ///
    /// Sub-grids are derived this way so that they inherit the parent cell
    /// size exactly instead of recomputing it from a narrower extent.
    pub(crate) const fn from_parts(
        extent: Extent,
        dx: f64,
        dy: f64,
        ncols: usize,
        nrows: usize,
    ) -> Self {
        Self {
            extent,
            dx,
            dy,
            ncols,
            nrows,
        }
    }

    /// Returns the grid extent.
    #[must_use]
    pub const fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Returns the cell size as `(dx, dy)`.
    #[must_use]
    pub const fn cell_size(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the index of the row containing `y`, clamped to be
    /// non-negative.
    ///
    /// `y` values below the extent map past the last row.
    #[must_use]
    pub fn get_row(&self, y: f64) -> i64 {
        (((self.extent.ymax() - y) / self.dy).floor() as i64).max(0)
    }

    /// Returns the index of the column containing `x`.
    #[must_use]
    pub fn get_column(&self, x: f64) -> i64 {
        ((x - self.extent.xmin()) / self.dx).floor() as i64
    }

    /// Returns the rectangle of the cell at `(row, col)`.
    #[must_use]
    pub fn grid_cell(&self, row: usize, col: usize) -> Rect {
        debug_assert!(row < self.nrows && col < self.ncols);

        let xmin = self.extent.xmin() + col as f64 * self.dx;
        let ymax = self.extent.ymax() - row as f64 * self.dy;

        Rect::new(
            coord! { x: xmin, y: ymax - self.dy },
            coord! { x: xmin + self.dx, y: ymax },
        )
    }

    /// Returns the grid clipped to `region`, snapped outward to cell
    /// boundaries, never crossing the parent grid.
    pub(crate) fn shrink_to_fit(&self, region: &RingBox) -> SubGrid {
        let ncols = self.ncols as i64;
        let nrows = self.nrows as i64;

        let col0 = (((region.xmin - self.extent.xmin()) / self.dx).floor()
            as i64)
            .clamp(0, ncols - 1);
        let col1 = (((region.xmax - self.extent.xmin()) / self.dx).ceil()
            as i64)
            .clamp(col0 + 1, ncols);
        let row0 = (((self.extent.ymax() - region.ymax) / self.dy).floor()
            as i64)
            .clamp(0, nrows - 1);
        let row1 = (((self.extent.ymax() - region.ymin) / self.dy).ceil()
            as i64)
            .clamp(row0 + 1, nrows);

        let extent = Extent::new_unchecked(
            self.extent.xmin() + col0 as f64 * self.dx,
            self.extent.ymax() - row1 as f64 * self.dy,
            self.extent.xmin() + col1 as f64 * self.dx,
            self.extent.ymax() - row0 as f64 * self.dy,
        );

        SubGrid {
            grid: Self::from_parts(
                extent,
                self.dx,
                self.dy,
                (col1 - col0) as usize,
                (row1 - row0) as usize,
            ),
            row_off: row0 as usize,
            col_off: col0 as usize,
        }
    }
}

// -----------------------------------------------------------------------------

/// A bounded sub-grid plus its position within the parent grid.
#[derive(Clone, Debug)]
pub(crate) struct SubGrid {
    pub grid: Grid,
    /// Full-grid rows above the sub-grid.
    pub row_off: usize,
    /// Full-grid columns left of the sub-grid.
    pub col_off: usize,
}

// -----------------------------------------------------------------------------

/// Infinite-extent view of a grid.
///
/// Adds one virtual padding row and column on each side, indexed `-1` and
/// `nrows`/`ncols`. Padding cells extend outward without bound so that
/// geometry arbitrarily far outside the real grid still classifies into an
/// addressable cell. Their boxes are only ever used for point classification
/// and crossings, never for coverage.
#[derive(Debug)]
pub(crate) struct PaddedGrid<'a> {
    grid: &'a Grid,
}

impl<'a> PaddedGrid<'a> {
    pub const fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    pub const fn ncols(&self) -> i64 {
        self.grid.ncols() as i64
    }

    pub const fn nrows(&self) -> i64 {
        self.grid.nrows() as i64
    }

    /// Returns the padded cell coordinates containing the given point.
    pub fn locate(&self, x: f64, y: f64) -> (i64, i64) {
        let extent = self.grid.extent();
        let (dx, dy) = self.grid.cell_size();

        let row = (((extent.ymax() - y) / dy).floor() as i64)
            .clamp(-1, self.nrows());
        let col = (((x - extent.xmin()) / dx).floor() as i64)
            .clamp(-1, self.ncols());

        (row, col)
    }

    /// Returns the rectangle of the padded cell at `(row, col)`.
    ///
    /// Padding rows and columns yield half-open boxes reaching to infinity.
    pub fn cell_box(&self, row: i64, col: i64) -> Rect {
        debug_assert!((-1..=self.nrows()).contains(&row));
        debug_assert!((-1..=self.ncols()).contains(&col));

        let extent = self.grid.extent();
        let (dx, dy) = self.grid.cell_size();

        let xmin = if col < 0 {
            f64::NEG_INFINITY
        } else {
            extent.xmin() + col as f64 * dx
        };
        let xmax = if col >= self.ncols() {
            f64::INFINITY
        } else {
            extent.xmin() + (col + 1) as f64 * dx
        };
        let ymax = if row < 0 {
            f64::INFINITY
        } else {
            extent.ymax() - row as f64 * dy
        };
        let ymin = if row >= self.nrows() {
            f64::NEG_INFINITY
        } else {
            extent.ymax() - (row + 1) as f64 * dy
        };

        Rect::new(coord! { x: xmin, y: ymin }, coord! { x: xmax, y: ymax })
    }

    pub const fn is_real_row(&self, row: i64) -> bool {
        row >= 0 && row < self.nrows()
    }

    pub const fn is_real_col(&self, col: i64) -> bool {
        col >= 0 && col < self.ncols()
    }
}

#[cfg(test)]
#[path = "./grid_tests.rs"]
mod tests;
