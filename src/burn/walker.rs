//! Ring walker: traces a ring through the cells of a padded sub-grid,
//! recording one traversal per cell visit.

use super::cell::{self, Position, Side};
use crate::grid::PaddedGrid;
use ahash::HashMap;
use geo::Coord;

/// One visit of a ring to a cell: the ordered coordinates within the cell,
/// bracketed by interpolated entry and exit points on its boundary.
#[derive(Clone, Debug)]
pub(crate) struct Traversal {
    pub coords: Vec<Coord>,
    /// `None` when the ring begins strictly inside the cell.
    pub entry: Option<Side>,
    pub exit: Option<Side>,
}

impl Traversal {
    fn start(first: Coord, entry: Option<Side>) -> Self {
        Self {
            coords: vec![first],
            entry,
            exit: None,
        }
    }

    /// A ring closed entirely inside one cell.
    pub fn is_closed_ring(&self) -> bool {
        self.entry.is_none()
            && self.coords.len() >= 4
            && self.coords.first() == self.coords.last()
    }

    /// Boundary-to-boundary chain spanning more than one distinct
    /// coordinate; returns its entry and exit sides.
    pub fn open_chain(&self) -> Option<(Side, Side)> {
        let (entry, exit) = (self.entry?, self.exit?);
        let first = self.coords[0];

        self.coords
            .iter()
            .any(|coord| *coord != first)
            .then_some((entry, exit))
    }

    /// Contribution to the running inside count of the cell's row: +1 when
    /// the traversal crosses the row mid-line upward, -1 downward.
    pub fn winding_delta(&self, y_mid: f64) -> i32 {
        if self.entry.is_none() || self.exit.is_none() {
            return 0;
        }

        let entry_y = self.coords[0].y;
        let exit_y = self.coords[self.coords.len() - 1].y;

        if entry_y < y_mid && exit_y > y_mid {
            1
        } else if entry_y > y_mid && exit_y < y_mid {
            -1
        } else {
            0
        }
    }
}

/// Traversals recorded per padded sub-grid cell.
pub(crate) type CellRecords = HashMap<(i64, i64), Vec<Traversal>>;

/// Walks a closed ring through the padded sub-grid.
///
/// `coords` must already be oriented (counter-clockwise exterior, clockwise
/// hole) and closed, so that the covered side lies left of the walk.
pub(crate) fn walk_ring(
    grid: &PaddedGrid<'_>,
    coords: &[Coord],
    records: &mut CellRecords,
) {
    if coords.len() < 4 {
        return;
    }

    // The working queue grows when a ring starts strictly inside a cell:
    // the cell's coordinates are replayed after the closure so the revisit
    // knows its entry side.
    let mut queue: Vec<Coord> = coords.to_vec();

    let (mut row, mut col) = grid.locate(queue[0].x, queue[0].y);
    let mut cellbox = grid.cell_box(row, col);
    let mut traversal =
        Traversal::start(queue[0], cell::side_of(queue[0], &cellbox));
    let mut prev_vertex = queue[0];
    let mut i = 1;

    while i < queue.len() {
        let next = queue[i];

        match cell::position(next, &cellbox) {
            Position::Inside | Position::Boundary => {
                traversal.coords.push(next);
                prev_vertex = next;
                i += 1;
            }
            Position::Outside => {
                // Interpolate from the last original vertex, not from the
                // stored entry point: re-interpolating an already
                // interpolated point cancels catastrophically on tiny
                // geometry.
                let Some(hit) = cell::crossing(prev_vertex, next, &cellbox)
                else {
                    debug_assert!(false, "no crossing for outside point");
                    traversal.coords.push(next);
                    prev_vertex = next;
                    i += 1;
                    continue;
                };

                traversal.coords.push(hit.point);
                traversal.exit = Some(hit.side);

                if traversal.entry.is_none() {
                    // The ring began strictly inside this cell; replay its
                    // coordinates at the tail so the closing visit enters
                    // through a known side.
                    let revisit = traversal.coords.clone();
                    queue.extend(revisit);
                } else {
                    records.entry((row, col)).or_default().push(traversal);
                }

                let (dr, dc) = hit.side.step();
                row += dr;
                col += dc;
                cellbox = grid.cell_box(row, col);
                traversal = Traversal::start(
                    hit.point,
                    cell::side_of(hit.point, &cellbox),
                );
                // `prev_vertex` unchanged: the crossing is interpolated.
            }
        }
    }

    // The ring ends here. A traversal that entered through a side and ends
    // on the cell boundary exits through the side holding its last point.
    if traversal.exit.is_none() && traversal.entry.is_some() {
        let last = traversal.coords[traversal.coords.len() - 1];
        traversal.exit = cell::side_of(last, &cellbox);
    }
    records.entry((row, col)).or_default().push(traversal);
}

#[cfg(test)]
#[path = "./walker_tests.rs"]
mod tests;
