use criterion::{criterion_group, criterion_main, Criterion};
use geo::{Coord, Geometry, LineString, Polygon};
use scanburn::scan_burn;
use std::{f64::consts::TAU, hint::black_box};

// A many-vertex ring covering a good share of the grid.
fn circle(vertices: usize) -> Geometry {
    let coords: Vec<Coord> = (0..=vertices)
        .map(|i| {
            let angle = TAU * i as f64 / vertices as f64;
            Coord {
                x: 5.0 + 4.0 * angle.cos(),
                y: 5.0 + 4.0 * angle.sin(),
            }
        })
        .collect();

    Polygon::new(LineString(coords), Vec::new()).into()
}

fn bench_scan_burn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_burn");

    for cells in [256_usize, 1024, 4096] {
        let geometry = circle(512);
        group.bench_function(format!("circle-512/{cells}x{cells}"), |b| {
            b.iter(|| {
                scan_burn(
                    [black_box(geometry.clone())],
                    (0., 0., 10., 10.),
                    (cells, cells),
                )
                .expect("valid grid")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan_burn);
criterion_main!(benches);
