//! Ear-clipping triangulation of a simple polygon.

use crate::math::{Point, Real};
use crate::utils::{corner_direction, is_point_in_triangle, Orientation};

#[derive(Clone, Copy, Default)]
struct Corner {
    active: bool,
    ear: bool,
    // Cosine of the corner angle. The pointiest ears are clipped first.
    pointiness: Real,
    prev: usize,
    next: usize,
}

/// Recomputes `pointiness` and `ear` for the corner `idx`.
///
/// Returns `false` if the corner is degenerate.
fn classify(idx: usize, corners: &mut [Corner], points: &[Point<Real>]) -> bool {
    let Corner { prev, next, .. } = corners[idx];
    let (p1, p, p3) = (points[prev], points[idx], points[next]);

    let (Some(to_prev), Some(to_next)) =
        ((p1 - p).try_normalize(0.0), (p3 - p).try_normalize(0.0))
    else {
        return false;
    };

    let pointiness = to_prev.dot(&to_next);
    let mut degenerate = false;
    let convex = corner_direction(&p1, &p, &p3) == Orientation::Ccw;
    let ear = convex
        && corners
            .iter()
            .enumerate()
            .filter(|(i, c)| c.active && *i != prev && *i != idx && *i != next)
            .all(|(i, _)| match is_point_in_triangle(&points[i], &p1, &p, &p3) {
                Some(inside) => !inside,
                None => {
                    degenerate = true;
                    true
                }
            });

    corners[idx].pointiness = pointiness;
    corners[idx].ear = ear;
    !degenerate
}

/// Triangulates the polygon `points` by repeatedly clipping its pointiest ear.
///
/// The polygon must be simple and counter-clockwise in a `y`-up frame. Returns
/// `None` if no ear can be found, which happens for self-intersecting or
/// clockwise inputs.
pub fn triangulate_ear_clipping(points: &[Point<Real>]) -> Option<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut corners: Vec<Corner> = (0..n)
        .map(|i| Corner {
            active: true,
            prev: (i + n - 1) % n,
            next: (i + 1) % n,
            ..Default::default()
        })
        .collect();

    for i in 0..n {
        if !classify(i, &mut corners, points) {
            return None;
        }
    }

    let mut triangles = Vec::with_capacity(n - 2);

    for remaining in (4..=n).rev() {
        let (tip, _) = corners
            .iter()
            .enumerate()
            .filter(|(_, c)| c.active && c.ear)
            .max_by(|(_, a), (_, b)| a.pointiness.total_cmp(&b.pointiness))?;

        let Corner { prev, next, .. } = corners[tip];
        corners[tip].active = false;
        triangles.push([prev, tip, next]);
        corners[prev].next = next;
        corners[next].prev = prev;

        // The last triangle is convex whatever its corners look like.
        if remaining > 4
            && !(classify(prev, &mut corners, points) && classify(next, &mut corners, points))
        {
            return None;
        }
    }

    let (last, corner) = corners.iter().enumerate().find(|(_, c)| c.active)?;
    triangles.push([corner.prev, last, corner.next]);

    Some(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(triangulate_ear_clipping(&points).unwrap(), vec![[2, 0, 1]]);
    }

    #[test]
    fn clockwise_input_fails() {
        let points = [
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert!(triangulate_ear_clipping(&points).is_none());
    }

    #[test]
    fn dented_square() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.5, 0.5),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let triangles = triangulate_ear_clipping(&points).unwrap();
        assert_eq!(triangles.len(), 3);
        // The reflex corner is never clipped as an ear.
        assert!(triangles.iter().all(|t| t[1] != 2));
    }
}
