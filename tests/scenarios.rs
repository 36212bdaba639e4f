//! End-to-end sweeps over small grids with known expected coverage.

use approx::assert_relative_eq;
use geo::{polygon, Geometry, LineString, Polygon};
use scanburn::{scan_burn, BurnOutput};
use std::collections::HashMap;

/// Accumulated coverage per (1-based row, col) cell, runs counting as 1.
fn coverage_map(outputs: &[&BurnOutput]) -> HashMap<(usize, usize), f64> {
    let mut cells = HashMap::new();

    for output in outputs {
        for run in &output.runs {
            for col in run.col_start..=run.col_end {
                *cells.entry((run.row, col)).or_insert(0.0) += 1.0;
            }
        }
        for edge in &output.edges {
            *cells.entry((edge.row, edge.col)).or_insert(0.0) += edge.weight;
        }
    }

    cells
}

fn covered_area(output: &BurnOutput, cell_area: f64) -> f64 {
    let interior: usize = output
        .runs
        .iter()
        .map(|run| run.col_end - run.col_start + 1)
        .sum();
    let boundary: f64 = output.edges.iter().map(|edge| edge.weight).sum();

    (interior as f64 + boundary) * cell_area
}

#[test]
fn unit_square_on_integer_grid() {
    let square: Geometry = polygon![
        (x: 1., y: 1.),
        (x: 9., y: 1.),
        (x: 9., y: 9.),
        (x: 1., y: 9.),
    ]
    .into();

    let output = scan_burn([square], (0., 0., 10., 10.), (20, 20))
        .expect("valid grid");

    // Aligned to the cell grid: no fractional cell anywhere.
    assert!(output.edges.is_empty());
    assert_eq!(output.skipped, 0);

    let cells = coverage_map(&[&output]);
    assert_eq!(cells.len(), 16 * 16);
    for row in 3..=18 {
        for col in 3..=18 {
            assert_eq!(cells[&(row, col)], 1.0, "cell ({row}, {col})");
        }
    }
}

#[test]
fn diagonal_triangles_are_complementary() {
    let lower: Geometry = polygon![
        (x: 0., y: 0.),
        (x: 10., y: 0.),
        (x: 10., y: 10.),
    ]
    .into();
    let upper: Geometry = polygon![
        (x: 0., y: 0.),
        (x: 10., y: 10.),
        (x: 0., y: 10.),
    ]
    .into();

    let lower = scan_burn([lower], (0., 0., 10., 10.), (20, 20))
        .expect("valid grid");
    let upper = scan_burn([upper], (0., 0., 10., 10.), (20, 20))
        .expect("valid grid");

    let cells = coverage_map(&[&lower, &upper]);
    assert_eq!(cells.len(), 20 * 20);
    for total in cells.values() {
        assert_relative_eq!(*total, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn donut_filled_by_plug() {
    let donut: Geometry = polygon![
        exterior: [
            (x: 1., y: 1.),
            (x: 9., y: 1.),
            (x: 9., y: 9.),
            (x: 1., y: 9.),
        ],
        interiors: [[
            (x: 3., y: 3.),
            (x: 7., y: 3.),
            (x: 7., y: 7.),
            (x: 3., y: 7.),
        ]],
    ]
    .into();
    let plug: Geometry = polygon![
        (x: 3., y: 3.),
        (x: 7., y: 3.),
        (x: 7., y: 7.),
        (x: 3., y: 7.),
    ]
    .into();

    let output = scan_burn([donut, plug], (0., 0., 10., 10.), (20, 20))
        .expect("valid grid");

    let cells = coverage_map(&[&output]);
    // The union tiles [1,9]x[1,9]: 16x16 cells of size 0.5.
    assert_eq!(cells.len(), 16 * 16);
    for total in cells.values() {
        assert_relative_eq!(*total, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn polygon_extending_beyond_grid() {
    let big: Geometry = polygon![
        (x: -1., y: -1.),
        (x: 11., y: -1.),
        (x: 11., y: 11.),
        (x: -1., y: 11.),
    ]
    .into();

    let output =
        scan_burn([big], (0., 0., 10., 10.), (10, 10)).expect("valid grid");

    assert!(output.edges.is_empty());
    let cells = coverage_map(&[&output]);
    assert_eq!(cells.len(), 100);
    for total in cells.values() {
        assert_eq!(*total, 1.0);
    }
}

#[test]
fn sub_cell_sliver() {
    let sliver: Geometry = polygon![
        (x: 2., y: 4.95),
        (x: 8., y: 4.95),
        (x: 8., y: 5.05),
        (x: 2., y: 5.05),
    ]
    .into();

    let output = scan_burn([sliver], (0., 0., 10., 10.), (10, 10))
        .expect("valid grid");

    // Too thin for any interior cell; the sliver straddles the row line at
    // y=5, leaving half its height in each neighboring row.
    assert!(output.runs.is_empty());
    assert_eq!(output.edges.len(), 12);
    for edge in &output.edges {
        assert!(edge.row == 5 || edge.row == 6, "row {}", edge.row);
        assert!((3..=8).contains(&edge.col), "col {}", edge.col);
        assert_relative_eq!(edge.weight, 0.05, epsilon = 1e-9);
    }

    let total: f64 = output.edges.iter().map(|edge| edge.weight).sum();
    assert_relative_eq!(total, 0.6, epsilon = 1e-9);
}

#[test]
fn adjacent_rectangles_split_mid_cell() {
    let left: Geometry = polygon![
        (x: 0., y: 0.),
        (x: 5., y: 0.),
        (x: 5., y: 10.),
        (x: 0., y: 10.),
    ]
    .into();
    let right: Geometry = polygon![
        (x: 5., y: 0.),
        (x: 10., y: 0.),
        (x: 10., y: 10.),
        (x: 5., y: 10.),
    ]
    .into();

    let output = scan_burn([left, right], (0., 0., 10., 10.), (12, 12))
        .expect("valid grid");

    // The two halves tile the grid: wherever the shared boundary falls
    // within a cell, the two weights complement each other.
    let cells = coverage_map(&[&output]);
    assert_eq!(cells.len(), 12 * 12);
    for total in cells.values() {
        assert_relative_eq!(*total, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn disjoint_components_do_not_leak_winding() {
    // One multi-polygon: two squares sharing rows but not columns. The gap
    // between them must stay uncovered even though both touch its rows.
    let pair: Geometry = geo::MultiPolygon(vec![
        polygon![
            (x: 1., y: 1.),
            (x: 3., y: 1.),
            (x: 3., y: 3.),
            (x: 1., y: 3.),
        ],
        polygon![
            (x: 5., y: 1.),
            (x: 7., y: 1.),
            (x: 7., y: 3.),
            (x: 5., y: 3.),
        ],
    ])
    .into();

    let output =
        scan_burn([pair], (0., 0., 10., 10.), (10, 10)).expect("valid grid");

    assert!(output.edges.is_empty());
    let cells = coverage_map(&[&output]);
    let mut covered: Vec<_> = cells.keys().copied().collect();
    covered.sort_unstable();

    let mut expected = Vec::new();
    for row in 8..=9 {
        for col in [2, 3, 6, 7] {
            expected.push((row, col));
        }
    }
    expected.sort_unstable();

    assert_eq!(covered, expected);
    // Both squares burn under the same polygon id.
    assert!(output.runs.iter().all(|run| run.poly_id == 1));
}

#[test]
fn invalid_geometry_is_skipped_with_id_preserved() {
    let point: Geometry = geo::Point::new(1.0, 1.0).into();
    let square: Geometry = polygon![
        (x: 1., y: 1.),
        (x: 9., y: 1.),
        (x: 9., y: 9.),
        (x: 1., y: 9.),
    ]
    .into();

    let output = scan_burn([point, square], (0., 0., 10., 10.), (10, 10))
        .expect("valid grid");

    assert_eq!(output.skipped, 1);
    assert!(!output.runs.is_empty());
    // The valid polygon keeps its 1-based position.
    assert!(output.runs.iter().all(|run| run.poly_id == 2));
}

#[test]
fn empty_and_off_grid_inputs_are_silent() {
    let empty: Geometry = geo::MultiPolygon::<f64>(Vec::new()).into();
    let off_grid: Geometry = polygon![
        (x: 20., y: 20.),
        (x: 30., y: 20.),
        (x: 30., y: 30.),
        (x: 20., y: 30.),
    ]
    .into();

    let output = scan_burn([empty, off_grid], (0., 0., 10., 10.), (10, 10))
        .expect("valid grid");

    assert_eq!(output.skipped, 0);
    assert!(output.runs.is_empty());
    assert!(output.edges.is_empty());
}

#[test]
fn invalid_grid_is_fatal() {
    let square: Geometry = polygon![
        (x: 1., y: 1.),
        (x: 2., y: 1.),
        (x: 2., y: 2.),
        (x: 1., y: 2.),
    ]
    .into();

    assert!(scan_burn([square.clone()], (10., 0., 0., 10.), (10, 10))
        .is_err());
    assert!(scan_burn([square.clone()], (0., 0., 10., 10.), (0, 10))
        .is_err());
    assert!(scan_burn([square], (0., 0., 10., 10.), (10, 0)).is_err());
}

#[test]
fn hole_subtraction_matches_shoelace_areas() {
    let holed: Geometry = polygon![
        exterior: [
            (x: 1., y: 1.),
            (x: 9., y: 1.),
            (x: 9., y: 9.),
            (x: 1., y: 9.),
        ],
        interiors: [[
            (x: 2.5, y: 2.5),
            (x: 6.5, y: 2.5),
            (x: 6.5, y: 6.5),
            (x: 2.5, y: 6.5),
        ]],
    ]
    .into();

    let output = scan_burn([holed], (0., 0., 10., 10.), (20, 20))
        .expect("valid grid");

    // 8x8 exterior minus 4x4 hole.
    assert_relative_eq!(
        covered_area(&output, 0.25),
        64.0 - 16.0,
        epsilon = 1e-6
    );
}

#[test]
fn run_rows_and_columns_are_emitted_in_order() {
    let square: Geometry = polygon![
        (x: 1.2, y: 1.2),
        (x: 8.8, y: 1.2),
        (x: 8.8, y: 8.8),
        (x: 1.2, y: 8.8),
    ]
    .into();

    let output =
        scan_burn([square], (0., 0., 10., 10.), (10, 10)).expect("valid");

    let rows: Vec<_> = output.runs.iter().map(|run| run.row).collect();
    let mut sorted = rows.clone();
    sorted.sort_unstable();
    assert_eq!(rows, sorted);

    let edge_keys: Vec<_> =
        output.edges.iter().map(|edge| (edge.row, edge.col)).collect();
    let mut sorted = edge_keys.clone();
    sorted.sort_unstable();
    assert_eq!(edge_keys, sorted);
}

#[test]
fn rectangle_with_fractional_border() {
    // A rectangle offset by 0.25 into its border cells on every side.
    let rect: Geometry = polygon![
        (x: 1.25, y: 1.25),
        (x: 8.75, y: 1.25),
        (x: 8.75, y: 8.75),
        (x: 1.25, y: 8.75),
    ]
    .into();

    let output =
        scan_burn([rect], (0., 0., 10., 10.), (10, 10)).expect("valid");

    let cells = coverage_map(&[&output]);

    // Interior cells.
    for row in 3..=8 {
        for col in 3..=8 {
            assert_eq!(cells[&(row, col)], 1.0, "cell ({row}, {col})");
        }
    }
    // Side cells carry 0.75 coverage, corner cells 0.75^2.
    assert_relative_eq!(cells[&(2, 5)], 0.75, epsilon = 1e-9);
    assert_relative_eq!(cells[&(9, 5)], 0.75, epsilon = 1e-9);
    assert_relative_eq!(cells[&(5, 2)], 0.75, epsilon = 1e-9);
    assert_relative_eq!(cells[&(5, 9)], 0.75, epsilon = 1e-9);
    assert_relative_eq!(cells[&(2, 2)], 0.5625, epsilon = 1e-9);
    assert_relative_eq!(cells[&(9, 9)], 0.5625, epsilon = 1e-9);

    // Total area check: 7.5 x 7.5.
    assert_relative_eq!(covered_area(&output, 1.0), 56.25, epsilon = 1e-9);
}

#[test]
fn ring_orientation_is_normalised() {
    let mut reversed_ring: Vec<(f64, f64)> =
        vec![(1., 1.), (9., 1.), (9., 9.), (1., 9.), (1., 1.)];
    reversed_ring.reverse();

    let ccw: Geometry = polygon![
        (x: 1., y: 1.),
        (x: 9., y: 1.),
        (x: 9., y: 9.),
        (x: 1., y: 9.),
    ]
    .into();
    let cw: Geometry = Polygon::new(
        LineString::from(reversed_ring),
        Vec::new(),
    )
    .into();

    let from_ccw =
        scan_burn([ccw], (0., 0., 10., 10.), (20, 20)).expect("valid");
    let from_cw =
        scan_burn([cw], (0., 0., 10., 10.), (20, 20)).expect("valid");

    assert_eq!(from_ccw.runs, from_cw.runs);
    assert_eq!(from_ccw.edges, from_cw.edges);
}
