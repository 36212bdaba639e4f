//! Scanburn error types.

mod burn;
mod geometry;
mod grid;


pub use burn::BurnError;
pub use geometry::InvalidGeometry;
pub use grid::{InvalidDimension, InvalidExtent, NumericOverflow};
