//! Coverage kernel: exact covered fraction of a cell from its traversals.
//!
//! The covered region lies left of each traversal; it is closed by walking
//! the cell boundary from exit to entry in the direction of decreasing
//! perimeter distance, inserting the corners passed on the way.

use super::{cell, walker::Traversal};
use crate::ARC_EPSILON;
use float_eq::float_eq;
use geo::{Coord, Rect};

/// One open boundary-to-boundary chain through the cell.
struct Chain<'a> {
    coords: &'a [Coord],
    /// Entry point perimeter distance.
    entry: f64,
    /// Exit point perimeter distance.
    exit: f64,
}

/// Computes the covered fraction of a cell from its recorded traversals.
///
/// The result is signed: a clockwise chain that removes area from an
/// otherwise interior cell yields a negative fraction, which the emitter
/// resolves against the winding state.
pub(crate) fn cell_fraction(cell: &Rect, traversals: &[Traversal]) -> f64 {
    let area = cell.width() * cell.height();
    let perimeter = 2.0 * (cell.width() + cell.height());

    let mut covered = 0.0;
    let mut closed = 0;
    let mut chains = Vec::new();

    for traversal in traversals {
        if traversal.is_closed_ring() {
            covered += cell::shoelace(&traversal.coords);
            closed += 1;
        } else if let Some((entry_side, exit_side)) = traversal.open_chain() {
            let first = traversal.coords[0];
            let last = traversal.coords[traversal.coords.len() - 1];

            chains.push(Chain {
                coords: &traversal.coords,
                entry: cell::perimeter_distance(cell, first, entry_side)
                    .rem_euclid(perimeter),
                exit: cell::perimeter_distance(cell, last, exit_side)
                    .rem_euclid(perimeter),
            });
        }
    }

    covered += match chains.len() {
        0 => 0.0,
        1 => single_chain_area(cell, perimeter, &chains[0]),
        _ => chained_area(cell, perimeter, &chains),
    };

    let fraction = covered / area;
    if closed == 0 && chains.len() == 1 {
        // Numerical noise only: a single chain cannot cover more than the
        // cell or less than nothing.
        fraction.clamp(0.0, 1.0)
    } else {
        fraction
    }
}

/// Area left of a single chain, closed along the cell boundary.
fn single_chain_area(cell: &Rect, perimeter: f64, chain: &Chain<'_>) -> f64 {
    let gap = (chain.exit - chain.entry).rem_euclid(perimeter);
    if float_eq!(gap, 0.0, abs <= ARC_EPSILON) {
        // Entered and exited through the same point: the chain itself is
        // the covered polygon.
        return cell::shoelace(chain.coords);
    }

    let mut polygon = chain.coords.to_vec();
    push_arc_corners(&mut polygon, cell, perimeter, chain.exit, gap);

    cell::shoelace(&polygon)
}

/// Area left of two or more chains: chase chains around the cell boundary
/// into closed polygons and accumulate their signed areas.
fn chained_area(cell: &Rect, perimeter: f64, chains: &[Chain<'_>]) -> f64 {
    let mut used = vec![false; chains.len()];
    let mut total = 0.0;

    loop {
        // Each polygon starts at the pending chain with the smallest entry
        // distance.
        let Some(start) = (0..chains.len())
            .filter(|&index| !used[index])
            .min_by(|&a, &b| chains[a].entry.total_cmp(&chains[b].entry))
        else {
            break;
        };
        used[start] = true;

        let mut polygon: Vec<Coord> = Vec::new();
        let mut current = start;

        loop {
            polygon.extend_from_slice(chains[current].coords);

            // Walk the boundary from the exit, in decreasing perimeter
            // distance, to the nearest pending entry; the start chain's
            // entry closes the polygon.
            let from = chains[current].exit;
            let close_gap = (from - chains[start].entry).rem_euclid(perimeter);

            let mut next: Option<(usize, f64)> = None;
            for (index, chain) in chains.iter().enumerate() {
                if used[index] {
                    continue;
                }
                let gap = (from - chain.entry).rem_euclid(perimeter);
                if gap < close_gap
                    && next.map_or(true, |(_, nearest)| gap < nearest)
                {
                    next = Some((index, gap));
                }
            }

            match next {
                Some((index, gap)) => {
                    push_arc_corners(&mut polygon, cell, perimeter, from, gap);
                    used[index] = true;
                    current = index;
                }
                None => {
                    push_arc_corners(
                        &mut polygon,
                        cell,
                        perimeter,
                        from,
                        close_gap,
                    );
                    total += cell::shoelace(&polygon);
                    break;
                }
            }
        }
    }

    total
}

/// Appends the cell corners lying strictly inside the closure arc, in walk
/// order.
fn push_arc_corners(
    polygon: &mut Vec<Coord>,
    cell: &Rect,
    perimeter: f64,
    from: f64,
    gap: f64,
) {
    let mut arc: Vec<(f64, Coord)> = cell::corners(cell)
        .into_iter()
        .filter_map(|(distance, corner)| {
            let offset = (from - distance).rem_euclid(perimeter);
            (offset > ARC_EPSILON && offset < gap - ARC_EPSILON)
                .then_some((offset, corner))
        })
        .collect();

    arc.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
    polygon.extend(arc.into_iter().map(|(_, corner)| corner));
}

#[cfg(test)]
#[path = "./coverage_tests.rs"]
mod tests;
