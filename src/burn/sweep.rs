//! Row sweep: winding accumulation and run/edge emission.

use crate::COVERAGE_EPSILON;

/// A contiguous horizontal span of fully-covered interior cells.
///
/// Row and column indices are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// 1-based index of the source polygon.
    pub poly_id: usize,
    /// 1-based grid row.
    pub row: usize,
    /// 1-based first covered column.
    pub col_start: usize,
    /// 1-based last covered column.
    pub col_end: usize,
}

/// A single grid cell with fractional coverage.
///
/// Row and column indices are 1-based.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// 1-based index of the source polygon.
    pub poly_id: usize,
    /// 1-based grid row.
    pub row: usize,
    /// 1-based grid column.
    pub col: usize,
    /// Covered fraction of the cell, strictly within (0, 1).
    pub weight: f64,
}

/// Coverage and winding accrued for one cell of a sweep row.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoundaryCellRecord {
    /// Full-grid 0-based column; -1 and `ncols` are padding.
    pub col: i64,
    pub coverage: f64,
    pub winding: i32,
}

/// Sorts, merges and walks one row of records left to right, emitting
/// interior runs while the winding count is nonzero and boundary edges for
/// fractional cells.
pub(crate) fn sweep_row(
    records: &mut [BoundaryCellRecord],
    row: usize,
    ncols: i64,
    poly_id: usize,
    runs: &mut Vec<Run>,
    edges: &mut Vec<Edge>,
) {
    if records.is_empty() {
        return;
    }
    records.sort_unstable_by_key(|record| record.col);

    let mut winding = 0_i32;
    // -2 means "no cell seen yet"; -1 is a legitimate padding column.
    let mut prev_col = -2_i64;

    let mut index = 0;
    while index < records.len() {
        let col = records[index].col;
        let mut coverage = 0.0;
        let mut delta = 0;
        while index < records.len() && records[index].col == col {
            coverage += records[index].coverage;
            delta += records[index].winding;
            index += 1;
        }

        // Interior cells between the previous boundary cell and this one.
        // A run entered from a padding column opens at the first real
        // column.
        if winding != 0 && prev_col > -2 && col > prev_col + 1 {
            runs.push(Run {
                poly_id,
                row,
                col_start: (prev_col + 2) as usize,
                col_end: col as usize,
            });
        }

        if col >= 0 && col < ncols {
            let col = (col + 1) as usize;
            if coverage > COVERAGE_EPSILON
                && coverage < 1.0 - COVERAGE_EPSILON
            {
                edges.push(Edge {
                    poly_id,
                    row,
                    col,
                    weight: coverage,
                });
            } else if coverage >= 1.0 - COVERAGE_EPSILON {
                // Saturated boundary cell, e.g. walls riding cell edges.
                runs.push(Run {
                    poly_id,
                    row,
                    col_start: col,
                    col_end: col,
                });
            } else if coverage < -COVERAGE_EPSILON && winding != 0 {
                // Negative coverage subtracts from an interior cell (a
                // hole smaller than its cell).
                let weight = 1.0 + coverage;
                if weight > COVERAGE_EPSILON {
                    edges.push(Edge {
                        poly_id,
                        row,
                        col,
                        weight,
                    });
                }
            }
            // Otherwise the cell is only an invisible winding anchor.
        }

        winding += delta;
        prev_col = col;
    }
}

#[cfg(test)]
#[path = "./sweep_tests.rs"]
mod tests;
