use crate::math::{Point, Real};
use crate::utils::perpendicular;
use num::Zero;

/// Computes the intersection point of the segments `[a1, b1]` and `[a2, b2]`.
///
/// An intersection exactly at `a1` is not reported, so a segment leaving a
/// vertex does not hit the edges sharing that vertex. Parallel segments never
/// intersect.
pub fn line_intersection(
    a1: &Point<Real>,
    b1: &Point<Real>,
    a2: &Point<Real>,
    b2: &Point<Real>,
) -> Option<Point<Real>> {
    let dir1 = b1 - a1;
    let dir2 = b2 - a2;
    let perp1 = perpendicular(&dir1);
    let perp2 = perpendicular(&dir2);

    let denom1 = dir1.dot(&perp2);
    if denom1.is_zero() {
        return None;
    }

    let t = (a2 - a1).dot(&perp2) / denom1;
    if t <= 0.0 || t > 1.0 {
        return None;
    }

    let u = (a1 - a2).dot(&perp1) / dir2.dot(&perp1);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(a1 + dir1 * t)
}

/// Do the segments `[a1, b1]` and `[a2, b2]` cross?
pub fn segments_cross(
    a1: &Point<Real>,
    b1: &Point<Real>,
    a2: &Point<Real>,
    b2: &Point<Real>,
) -> bool {
    line_intersection(a1, b1, a2, b2).is_some()
}
