//! Corner orientation and point-in-triangle tests, used by polygon decomposition.

use crate::math::{Point, Real};
use core::cmp::Ordering;

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
/// The turning direction of a corner.
pub enum Orientation {
    /// Counter-clockwise, in a `y`-up frame.
    Ccw,
    /// Clockwise, in a `y`-up frame.
    Cw,
    /// Neither (the three points are aligned, or one of them is NaN).
    None,
}

/// Returns the turning direction at `p2` of the path `p1 -> p2 -> p3`.
pub fn corner_direction(p1: &Point<Real>, p2: &Point<Real>, p3: &Point<Real>) -> Orientation {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let cross: Real = v1.perp(&v2);

    match cross.partial_cmp(&0.0) {
        Some(Ordering::Less) => Orientation::Ccw,
        Some(Ordering::Greater) => Orientation::Cw,
        Some(Ordering::Equal) | None => Orientation::None,
    }
}

/// Returns `true` if `p` lies inside, or on the border of, the triangle `v1 v2 v3`.
///
/// Returns `None` if the triangle is degenerate and `p` is aligned with all of its sides.
pub fn is_point_in_triangle(
    p: &Point<Real>,
    v1: &Point<Real>,
    v2: &Point<Real>,
    v3: &Point<Real>,
) -> Option<bool> {
    let dirs = [
        corner_direction(p, v1, v2),
        corner_direction(p, v2, v3),
        corner_direction(p, v3, v1),
    ];

    if dirs.iter().all(|d| *d == Orientation::None) {
        return None;
    }

    let has_cw = dirs.contains(&Orientation::Cw);
    let has_ccw = dirs.contains(&Orientation::Ccw);
    Some(!(has_cw && has_ccw))
}
