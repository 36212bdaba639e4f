//! Scanline burn: geometry decomposition, the per-polygon sweep driver and
//! the public builder API.

mod cell;
mod coverage;
mod sweep;
mod walker;

pub use sweep::{Edge, Run};

use crate::{
    error::{BurnError, InvalidGeometry, NumericOverflow},
    extent::{Extent, RingBox},
    grid::{Grid, PaddedGrid},
};
use ahash::HashMapExt as _;
use geo::{
    algorithm::winding_order::{Winding as _, WindingOrder},
    Coord, Geometry, LineString, Polygon,
};
use sweep::BoundaryCellRecord;
use walker::CellRecords;

/// Output of a sweep.
///
/// Within one polygon, runs and edges are emitted row-major (rows
/// ascending, columns ascending within a row). Across polygons the order
/// follows insertion; sort by `(poly_id, row, col)` when a global order is
/// needed.
#[derive(Clone, Debug, Default)]
pub struct BurnOutput {
    /// Fully-covered interior spans.
    pub runs: Vec<Run>,
    /// Partially-covered boundary cells.
    pub edges: Vec<Edge>,
    /// Number of polygons skipped because of invalid geometry.
    pub skipped: usize,
}

// -----------------------------------------------------------------------------

/// Computes the sparse intersection of a set of polygons with a grid.
///
/// Memory use scales with each polygon's perimeter in cells, not with the
/// grid area: no dense raster is ever materialised.
#[derive(Debug, Clone)]
pub struct Burner {
    grid: Grid,
    items: Vec<Vec<Polygon>>,
}

impl Burner {
    /// Adds a polygon to burn; it is assigned the next 1-based `poly_id`.
    ///
    /// # Errors
    ///
    /// [`InvalidGeometry`] if a ring is malformed. The `poly_id` slot is
    /// still consumed so that subsequent identifiers are unaffected.
    pub fn add(&mut self, polygon: Polygon) -> Result<(), InvalidGeometry> {
        match validate_polygon(&polygon) {
            Ok(()) => {
                self.items.push(vec![polygon]);
                Ok(())
            }
            Err(err) => {
                self.items.push(Vec::new());
                Err(err)
            }
        }
    }

    /// Adds any areal geometry under a single `poly_id`, recursing into
    /// collections and multi-polygons.
    ///
    /// # Errors
    ///
    /// [`InvalidGeometry`] for non-areal geometry kinds or malformed rings.
    /// The `poly_id` slot is still consumed.
    pub fn add_geometry(
        &mut self,
        geometry: &Geometry,
    ) -> Result<(), InvalidGeometry> {
        let mut components = Vec::new();
        let collected = collect_polygons(geometry, &mut components).and_then(
            |()| components.iter().try_for_each(validate_polygon),
        );

        match collected {
            Ok(()) => {
                self.items.push(components);
                Ok(())
            }
            Err(err) => {
                self.items.push(Vec::new());
                Err(err)
            }
        }
    }

    /// Adds a batch of polygons, one `poly_id` each.
    ///
    /// # Errors
    ///
    /// [`InvalidGeometry`] on the first malformed polygon.
    pub fn add_batch(
        &mut self,
        polygons: impl IntoIterator<Item = Polygon>,
    ) -> Result<(), InvalidGeometry> {
        for polygon in polygons {
            self.add(polygon)?;
        }
        Ok(())
    }

    /// Returns an upper-bound estimate of the number of emitted records.
    ///
    /// Based on each ring's bounding box measured in cells plus its vertex
    /// count; useful to pre-size downstream buffers.
    #[must_use]
    pub fn output_size_hint(&self) -> usize {
        const PER_POLYGON_BUFFER: usize = 8;

        let (dx, dy) = self.grid.cell_size();
        self.items
            .iter()
            .flatten()
            .map(|polygon| {
                polygon
                    .interiors()
                    .iter()
                    .chain(std::iter::once(polygon.exterior()))
                    .map(|ring| {
                        let cells = RingBox::compute_from_ring(ring).map_or(
                            0,
                            |bbox| {
                                let width =
                                    ((bbox.xmax - bbox.xmin) / dx).ceil();
                                let height =
                                    ((bbox.ymax - bbox.ymin) / dy).ceil();
                                2.0f64.mul_add(width + height, 4.0) as usize
                            },
                        );
                        // -1 because the last coord closes the ring.
                        cells + (ring.0.len() - 1)
                    })
                    .sum::<usize>()
                    + PER_POLYGON_BUFFER
            })
            .sum()
    }

    /// Runs the sweep over every added polygon.
    ///
    /// # Errors
    ///
    /// [`BurnError::Overflow`] when the padded grid cannot be indexed with
    /// signed cell coordinates.
    pub fn burn(self) -> Result<BurnOutput, BurnError> {
        if self.grid.ncols() as u128 + 1 > i64::MAX as u128
            || self.grid.nrows() as u128 + 1 > i64::MAX as u128
        {
            return Err(NumericOverflow.into());
        }

        let mut output = BurnOutput::default();
        for (index, components) in self.items.iter().enumerate() {
            for polygon in components {
                burn_polygon(&self.grid, polygon, index + 1, &mut output);
            }
        }

        Ok(output)
    }
}

// -----------------------------------------------------------------------------

/// A builder to configure a burner.
#[derive(Debug, Clone)]
pub struct BurnerBuilder {
    grid: Grid,
}

impl BurnerBuilder {
    /// Initializes a new builder over the given grid.
    #[must_use]
    pub const fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Builds the burner.
    #[must_use]
    pub fn build(self) -> Burner {
        Burner {
            grid: self.grid,
            items: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------

/// Computes the sparse intersection of `polygons` with a regular grid.
///
/// The grid extent is `(xmin, ymin, xmax, ymax)` and `grid_cells` is
/// `(ncols, nrows)`, with row 1 at the top. Each input geometry's 1-based
/// position becomes its `poly_id`. Invalid geometries are skipped with a
/// warning and counted in [`BurnOutput::skipped`]; the records of every
/// other polygon remain valid.
///
/// # Errors
///
/// [`BurnError`] when the extent or the dimensions are invalid; individual
/// geometry failures are not fatal.
pub fn scan_burn<I>(
    polygons: I,
    grid_extent: (f64, f64, f64, f64),
    grid_cells: (usize, usize),
) -> Result<BurnOutput, BurnError>
where
    I: IntoIterator<Item = Geometry>,
{
    let (xmin, ymin, xmax, ymax) = grid_extent;
    let (ncols, nrows) = grid_cells;

    let extent = Extent::new(xmin, ymin, xmax, ymax)?;
    let grid = Grid::new(extent, ncols, nrows)?;

    let mut burner = BurnerBuilder::new(grid).build();
    let mut skipped = 0;
    for (index, geometry) in polygons.into_iter().enumerate() {
        if let Err(err) = burner.add_geometry(&geometry) {
            log::warn!("skipping polygon {}: {err}", index + 1);
            skipped += 1;
        }
    }

    let mut output = burner.burn()?;
    output.skipped = skipped;
    Ok(output)
}

// -----------------------------------------------------------------------------

fn validate_polygon(polygon: &Polygon) -> Result<(), InvalidGeometry> {
    RingBox::compute_from_ring(polygon.exterior())?;
    for interior in polygon.interiors() {
        RingBox::compute_from_ring(interior)?;
    }
    Ok(())
}

// Recursively flattens a geometry into its polygon components.
fn collect_polygons(
    geometry: &Geometry,
    out: &mut Vec<Polygon>,
) -> Result<(), InvalidGeometry> {
    match geometry {
        Geometry::Polygon(polygon) => {
            out.push(polygon.clone());
            Ok(())
        }
        Geometry::MultiPolygon(multi) => {
            out.extend(multi.0.iter().cloned());
            Ok(())
        }
        Geometry::GeometryCollection(collection) => collection
            .0
            .iter()
            .try_for_each(|child| collect_polygons(child, out)),
        Geometry::Rect(rect) => {
            out.push(rect.to_polygon());
            Ok(())
        }
        Geometry::Triangle(triangle) => {
            out.push(triangle.to_polygon());
            Ok(())
        }
        _ => Err(InvalidGeometry::new("unsupported geometry kind")),
    }
}

// Exterior rings are walked counter-clockwise and holes clockwise, so that
// the covered side always lies left of the walk.
fn oriented_coords(ring: &LineString, hole: bool) -> Option<Vec<Coord>> {
    let order = ring.winding_order()?;

    let mut coords = ring.0.clone();
    let reverse = match order {
        WindingOrder::CounterClockwise => hole,
        WindingOrder::Clockwise => !hole,
    };
    if reverse {
        coords.reverse();
    }

    Some(coords)
}

// One polygon component: its own sub-grid, row records and sweep, so that
// winding never leaks between disjoint components sharing a row.
fn burn_polygon(
    grid: &Grid,
    polygon: &Polygon,
    poly_id: usize,
    output: &mut BurnOutput,
) {
    // Clipped sub-extent: union of the per-ring bounding boxes intersected
    // with the grid.
    let mut region: Option<RingBox> = None;
    for ring in
        std::iter::once(polygon.exterior()).chain(polygon.interiors().iter())
    {
        let Ok(bbox) = RingBox::compute_from_ring(ring) else {
            continue;
        };
        if let Some(clipped) = bbox.clip(grid.extent()) {
            match region.as_mut() {
                Some(region) => region.expand(&clipped),
                None => region = Some(clipped),
            }
        }
    }
    // Entirely off-grid polygons contribute nothing.
    let Some(region) = region else {
        return;
    };

    let sub = grid.shrink_to_fit(&region);
    let padded = PaddedGrid::new(&sub.grid);

    let mut records = CellRecords::new();
    let rings = std::iter::once((polygon.exterior(), false))
        .chain(polygon.interiors().iter().map(|ring| (ring, true)));
    for (ring, hole) in rings {
        // Zero-area rings burn nothing.
        let Some(coords) = oriented_coords(ring, hole) else {
            continue;
        };
        walker::walk_ring(&padded, &coords, &mut records);
    }

    // Flush the cell records into per-row boundary records. Padding rows
    // are never swept; padding columns carry winding but no coverage.
    let mut rows: Vec<Vec<BoundaryCellRecord>> =
        vec![Vec::new(); sub.grid.nrows()];
    for ((row, col), traversals) in records {
        if !padded.is_real_row(row) {
            continue;
        }

        let cellbox = padded.cell_box(row, col);
        let y_mid = (cellbox.min().y + cellbox.max().y) / 2.0;
        let winding: i32 = traversals
            .iter()
            .map(|traversal| traversal.winding_delta(y_mid))
            .sum();
        let coverage = if padded.is_real_col(col) {
            coverage::cell_fraction(&cellbox, &traversals)
        } else {
            0.0
        };

        if winding == 0 && coverage.abs() <= crate::COVERAGE_EPSILON {
            continue;
        }
        rows[row as usize].push(BoundaryCellRecord {
            col: sub.col_off as i64 + col,
            coverage,
            winding,
        });
    }

    for (sub_row, mut row_records) in rows.into_iter().enumerate() {
        sweep::sweep_row(
            &mut row_records,
            sub.row_off + sub_row + 1,
            grid.ncols() as i64,
            poly_id,
            &mut output.runs,
            &mut output.edges,
        );
    }
}
