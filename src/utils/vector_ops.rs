//! Small vector helpers shared by the narrow phase and the solvers.

use crate::math::{Point, Real, Rotation, Vector};

/// The vector perpendicular to `v`, rotated a quarter turn so that, for the
/// vertex order used by every polygon of this crate, `perpendicular(edge)`
/// points out of the polygon.
#[inline]
pub fn perpendicular(v: &Vector<Real>) -> Vector<Real> {
    Vector::new(v.y, -v.x)
}

/// Normalizes `v`, returning the zero vector when `v` has no length.
#[inline]
pub fn safe_normalize(v: &Vector<Real>) -> Vector<Real> {
    v.try_normalize(0.0).unwrap_or_else(Vector::zeros)
}

/// Rotates `v` by `angle` radians.
#[inline]
pub fn rotated(v: &Vector<Real>, angle: Real) -> Vector<Real> {
    if angle == 0.0 {
        *v
    } else {
        Rotation::new(angle) * v
    }
}

/// The unit vector with the given angle.
#[inline]
pub fn angle_to_unit_vector(angle: Real) -> Vector<Real> {
    Vector::new(angle.cos(), angle.sin())
}

/// The signed angle going from `reference` to `v`, in `[-π, π]`.
pub fn angle_between(v: &Vector<Real>, reference: &Vector<Real>) -> Real {
    reference.perp(v).atan2(reference.dot(v))
}

/// The unit vector bisecting the corner `b` of the polyline `a -> b -> c`.
///
/// The result points into the polygon when `check_ccw` is set. Without the
/// check, the direction is derived from the `a -> c` chord only.
pub fn bisector_unit_vector(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    check_ccw: bool,
) -> Vector<Real> {
    let from_prev = b - a;
    let prev_to_next = c - a;
    let prev_to_next_perp = perpendicular(&prev_to_next);
    let mut bisector = safe_normalize(&prev_to_next_perp);

    if check_ccw {
        let to_center = prev_to_next * 0.5 - from_prev;
        let side = to_center.dot(&bisector);

        if from_prev.dot(&prev_to_next_perp) < 0.0 {
            if side < 0.0 {
                bisector = -bisector;
            }
        } else if side > 0.0 {
            bisector = -bisector;
        }
    }

    -bisector
}

/// Twice the signed area of a closed polygon.
///
/// Positive for the vertex order expected by the narrow phase (counter-clockwise
/// in a `y`-up frame).
pub fn signed_polygon_area(points: &[Point<Real>]) -> Real {
    let mut res = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        res += a.x * b.y - b.x * a.y;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_of_top_edge_points_up() {
        // Top edge of a box in screen space, y pointing down.
        let edge = Point::new(1.0, -1.0) - Point::new(-1.0, -1.0);
        let n = safe_normalize(&perpendicular(&edge));
        assert_relative_eq!(n, Vector::new(0.0, -1.0));
    }

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(safe_normalize(&Vector::zeros()), Vector::zeros());
    }

    #[test]
    fn bisector_points_inside() {
        let a = Point::new(-1.0, -1.0);
        let b = Point::new(1.0, -1.0);
        let c = Point::new(1.0, 1.0);
        let bisector = bisector_unit_vector(&a, &b, &c, true);
        let to_center = safe_normalize(&(Point::origin() - b));
        assert_relative_eq!(bisector, to_center, epsilon = 1.0e-5);
    }

    #[test]
    fn signed_angle() {
        let x = Vector::x();
        let y = Vector::y();
        assert_relative_eq!(angle_between(&y, &x), core::f32::consts::FRAC_PI_2);
        assert_relative_eq!(angle_between(&x, &y), -core::f32::consts::FRAC_PI_2);
    }
}
