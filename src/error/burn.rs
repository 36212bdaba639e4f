use super::{InvalidDimension, InvalidExtent, NumericOverflow};
use std::fmt;

/// Fatal errors from the sweep driver.
///
/// Per-polygon geometry failures are not represented here: those are
/// reported through the skip count of
/// [`BurnOutput`](crate::burn::BurnOutput) and the sweep continues with the
/// remaining polygons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BurnError {
    /// The grid extent is empty or inverted.
    Extent(InvalidExtent),
    /// The grid has a zero dimension.
    Dimension(InvalidDimension),
    /// The grid is too large to index.
    Overflow(NumericOverflow),
}

impl fmt::Display for BurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Extent(err) => write!(f, "{err}"),
            Self::Dimension(err) => write!(f, "{err}"),
            Self::Overflow(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Self::Extent(ref err) => Some(err),
            Self::Dimension(ref err) => Some(err),
            Self::Overflow(ref err) => Some(err),
        }
    }
}

impl From<InvalidExtent> for BurnError {
    fn from(value: InvalidExtent) -> Self {
        Self::Extent(value)
    }
}

impl From<InvalidDimension> for BurnError {
    fn from(value: InvalidDimension) -> Self {
        Self::Dimension(value)
    }
}

impl From<NumericOverflow> for BurnError {
    fn from(value: NumericOverflow) -> Self {
        Self::Overflow(value)
    }
}
