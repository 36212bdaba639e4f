//! Axis-aligned rectangular extents in the grid's planar coordinate space.

use crate::error::{InvalidExtent, InvalidGeometry};
use geo::LineString;

/// An axis-aligned rectangle, `xmax > xmin` and `ymax > ymin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl Extent {
    /// Initializes a new extent from its corner coordinates.
    ///
    /// # Errors
    ///
    /// [`InvalidExtent`] if a bound is not finite or the rectangle is empty
    /// or inverted.
    pub fn new(
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    ) -> Result<Self, InvalidExtent> {
        if !(xmin.is_finite()
            && ymin.is_finite()
            && xmax.is_finite()
            && ymax.is_finite())
        {
            return Err(InvalidExtent::new("non-finite bound"));
        }
        if xmax <= xmin || ymax <= ymin {
            return Err(InvalidExtent::new("empty or inverted rectangle"));
        }

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    pub(crate) const fn new_unchecked(
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    ) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns the smallest `x` covered by the extent.
    #[must_use]
    pub const fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Returns the smallest `y` covered by the extent.
    #[must_use]
    pub const fn ymin(&self) -> f64 {
        self.ymin
    }

    /// Returns the largest `x` covered by the extent.
    #[must_use]
    pub const fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Returns the largest `y` covered by the extent.
    #[must_use]
    pub const fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Returns the extent width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the extent height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

// -----------------------------------------------------------------------------

/// Bounding box of a ring, possibly degenerate (zero width or height).
///
/// Kept separate from `Extent` because ring boxes are allowed to collapse to
/// a segment or a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl RingBox {
    /// Computes the bounding box of a closed ring.
    ///
    /// # Errors
    ///
    /// [`InvalidGeometry`] when the ring is too short, not closed or carries
    /// a non-finite coordinate.
    pub fn compute_from_ring(
        ring: &LineString,
    ) -> Result<Self, InvalidGeometry> {
        // Closed ring have at least 4 coordinate (e.g. triangle).
        if ring.0.len() < 4 {
            return Err(InvalidGeometry::new(
                "invalid ring (not enough coordinate)",
            ));
        }
        if !ring.is_closed() {
            return Err(InvalidGeometry::new("invalid ring (not closed)"));
        }

        let mut x_range = (f64::MAX, f64::MIN);
        let mut y_range = (f64::MAX, f64::MIN);

        for curr in ring {
            if !(curr.x.is_finite() && curr.y.is_finite()) {
                return Err(InvalidGeometry::new(
                    "invalid coordinate (e.g. infinite)",
                ));
            }

            x_range = get_min_max(curr.x, x_range.0, x_range.1);
            y_range = get_min_max(curr.y, y_range.0, y_range.1);
        }

        Ok(Self {
            xmin: x_range.0,
            ymin: y_range.0,
            xmax: x_range.1,
            ymax: y_range.1,
        })
    }

    /// Intersects the box with an extent, `None` when disjoint.
    pub fn clip(&self, extent: &Extent) -> Option<Self> {
        let xmin = self.xmin.max(extent.xmin());
        let ymin = self.ymin.max(extent.ymin());
        let xmax = self.xmax.min(extent.xmax());
        let ymax = self.ymax.min(extent.ymax());

        (xmin <= xmax && ymin <= ymax).then_some(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Grows the box to cover `other` as well.
    pub fn expand(&mut self, other: &Self) {
        self.xmin = self.xmin.min(other.xmin);
        self.ymin = self.ymin.min(other.ymin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymax = self.ymax.max(other.ymax);
    }
}

fn get_min_max(value: f64, min: f64, max: f64) -> (f64, f64) {
    if value > max {
        (min, value)
    } else if value < min {
        (value, max)
    } else {
        (min, max)
    }
}

#[cfg(test)]
#[path = "./extent_tests.rs"]
mod tests;
