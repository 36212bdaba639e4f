//! Cell-level geometry primitives for the ring walker and coverage kernel.

use geo::{coord, Coord, Rect};

/// Tie tolerance on segment parameters when a crossing hits a corner.
const PARAM_EPSILON: f64 = 1e-12;

/// Which side of a cell box a boundary point lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Row/column step out of a cell through this side.
    pub(crate) const fn step(self) -> (i64, i64) {
        match self {
            Self::Top => (-1, 0),
            Self::Bottom => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    // Corner ties resolve horizontal walls first.
    const fn rank(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Position of a point relative to a cell box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    Inside,
    Boundary,
    Outside,
}

pub(crate) fn position(p: Coord, cell: &Rect) -> Position {
    let (min, max) = (cell.min(), cell.max());

    if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
        Position::Outside
    } else if p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y {
        Position::Inside
    } else {
        Position::Boundary
    }
}

/// Returns the side containing `p`, `None` when `p` is not on the boundary.
///
/// Corner points report the vertical side; the perimeter distance of a
/// corner is the same modulo the perimeter whichever of its two sides is
/// picked.
pub(crate) fn side_of(p: Coord, cell: &Rect) -> Option<Side> {
    let (min, max) = (cell.min(), cell.max());

    if p.x == min.x {
        Some(Side::Left)
    } else if p.x == max.x {
        Some(Side::Right)
    } else if p.y == min.y {
        Some(Side::Bottom)
    } else if p.y == max.y {
        Some(Side::Top)
    } else {
        None
    }
}

// -----------------------------------------------------------------------------

/// Where a segment leaves a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Crossing {
    /// Interpolated point, snapped exactly onto the wall it crosses.
    pub point: Coord,
    pub side: Side,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    side: Side,
    t: f64,
    align: f64,
    point: Coord,
}

/// Computes where the segment `(a, b)` leaves the cell.
///
/// `b` lies outside the cell; `a` is the last original ring vertex, which
/// may itself be outside when the segment spans several cells. Candidate
/// walls need a positive outward component along the segment direction; the
/// smallest parameter wins, and corner ties resolve by strongest alignment,
/// then horizontal walls before vertical ones.
pub(crate) fn crossing(a: Coord, b: Coord, cell: &Rect) -> Option<Crossing> {
    let (min, max) = (cell.min(), cell.max());
    let d = coord! { x: b.x - a.x, y: b.y - a.y };

    let mut candidates = [None; 4];

    if d.y != 0.0 {
        let t = (max.y - a.y) / d.y;
        candidates[0] = Some(Candidate {
            side: Side::Top,
            t,
            align: d.y,
            point: coord! { x: (a.x + t * d.x).clamp(min.x, max.x), y: max.y },
        });
        let t = (min.y - a.y) / d.y;
        candidates[1] = Some(Candidate {
            side: Side::Bottom,
            t,
            align: -d.y,
            point: coord! { x: (a.x + t * d.x).clamp(min.x, max.x), y: min.y },
        });
    }
    if d.x != 0.0 {
        let t = (min.x - a.x) / d.x;
        candidates[2] = Some(Candidate {
            side: Side::Left,
            t,
            align: -d.x,
            point: coord! { x: min.x, y: (a.y + t * d.y).clamp(min.y, max.y) },
        });
        let t = (max.x - a.x) / d.x;
        candidates[3] = Some(Candidate {
            side: Side::Right,
            t,
            align: d.x,
            point: coord! { x: max.x, y: (a.y + t * d.y).clamp(min.y, max.y) },
        });
    }

    let mut best: Option<Candidate> = None;
    for candidate in candidates.into_iter().flatten() {
        if !(0.0..=1.0).contains(&candidate.t) || candidate.align <= 0.0 {
            continue;
        }
        best = Some(match best {
            None => candidate,
            Some(current) => {
                if (candidate.t - current.t).abs() <= PARAM_EPSILON {
                    // Corner hit: exit through the most outward-aligned wall.
                    if candidate.align > current.align
                        || (candidate.align == current.align
                            && candidate.side.rank() < current.side.rank())
                    {
                        candidate
                    } else {
                        current
                    }
                } else if candidate.t < current.t {
                    candidate
                } else {
                    current
                }
            }
        });
    }

    best.map(|candidate| Crossing {
        point: candidate.point,
        side: candidate.side,
    })
}

// -----------------------------------------------------------------------------

/// Arc length from the bottom-left corner to a boundary point, measured in
/// the direction bottom-left → top-left → top-right → bottom-right.
pub(crate) fn perimeter_distance(cell: &Rect, p: Coord, side: Side) -> f64 {
    let (min, max) = (cell.min(), cell.max());
    let w = cell.width();
    let h = cell.height();

    match side {
        Side::Left => p.y - min.y,
        Side::Top => h + (p.x - min.x),
        Side::Right => h + w + (max.y - p.y),
        Side::Bottom => 2.0 * h + w + (max.x - p.x),
    }
}

/// Cell corners and their perimeter distances, in arc order.
pub(crate) fn corners(cell: &Rect) -> [(f64, Coord); 4] {
    let (min, max) = (cell.min(), cell.max());
    let w = cell.width();
    let h = cell.height();

    [
        (0.0, coord! { x: min.x, y: min.y }),
        (h, coord! { x: min.x, y: max.y }),
        (h + w, coord! { x: max.x, y: max.y }),
        (2.0 * h + w, coord! { x: max.x, y: min.y }),
    ]
}

/// Signed area of a polygon, last vertex implicitly joined to the first.
pub(crate) fn shoelace(coords: &[Coord]) -> f64 {
    let mut sum = 0.0;
    for (i, a) in coords.iter().enumerate() {
        let b = coords[(i + 1) % coords.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

#[cfg(test)]
#[path = "./cell_tests.rs"]
mod tests;
