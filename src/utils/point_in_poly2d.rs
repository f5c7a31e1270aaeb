use crate::math::{Point, Real, MAX_WORLD_SIZE};
use crate::utils::perpendicular;
use num::Zero;

/// Tests if the given point is inside a convex polygon.
///
/// The polygon must follow the vertex order used by the narrow phase, i.e. the
/// perpendicular of each edge points outward. Points lying on an edge are
/// considered inside.
pub fn point_in_convex_poly2d(pt: &Point<Real>, poly: &[Point<Real>]) -> bool {
    if poly.is_empty() {
        return false;
    }

    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let normal = perpendicular(&(b - a));
        if (pt - a).dot(&normal) > 0.0 {
            return false;
        }
    }

    true
}

/// Tests if the given point is inside an arbitrary closed polygon using its
/// winding number.
///
/// Handles concave and self-overlapping polygons: the point is inside when the
/// polygon winds around it at least once, in either direction.
pub fn point_in_poly2d(pt: &Point<Real>, poly: &[Point<Real>]) -> bool {
    if poly.is_empty() {
        return false;
    }

    let mut winding = 0i32;

    for (i, s1) in poly.iter().enumerate() {
        let s2 = poly[(i + 1) % poly.len()];

        if (pt.y <= s1.y) == (pt.y <= s2.y) {
            continue;
        }

        // Horizontal ray going to +x.
        let side = s2 - s1;
        let side_perp = perpendicular(&side);
        let denom = MAX_WORLD_SIZE * side_perp.x;
        if denom.is_zero() {
            continue;
        }

        let t = (s1 - pt).dot(&side_perp) / denom;
        if t >= 0.0 && t <= 1.0 {
            winding += if side.y < 0.0 { -1 } else { 1 };
        }
    }

    winding != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> [Point<Real>; 4] {
        [
            Point::new(-1.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn convex_square() {
        let poly = square();
        assert!(point_in_convex_poly2d(&Point::origin(), &poly));
        assert!(point_in_convex_poly2d(&Point::new(1.0, 0.0), &poly));
        assert!(!point_in_convex_poly2d(&Point::new(1.5, 0.0), &poly));
    }

    #[test]
    fn winding_number_concave() {
        // An L shape.
        let poly = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ]
        .map(Point::from);
        assert!(point_in_poly2d(&Point::new(0.5, 1.5), &poly));
        assert!(point_in_poly2d(&Point::new(1.5, 0.5), &poly));
        assert!(!point_in_poly2d(&Point::new(1.5, 1.5), &poly));
        assert!(!point_in_poly2d(&Point::new(-0.5, 0.5), &poly));
    }

    #[test]
    fn winding_number_both_orders() {
        let mut poly = square();
        assert!(point_in_poly2d(&Point::new(0.25, 0.5), &poly));
        poly.reverse();
        assert!(point_in_poly2d(&Point::new(0.25, 0.5), &poly));
        assert!(!point_in_poly2d(&Point::new(3.0, 0.5), &poly));
    }
}
