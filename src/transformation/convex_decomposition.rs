use crate::math::{Point, Real};
use crate::transformation::{hertel_mehlhorn_idx, triangulate_ear_clipping};
use crate::utils::{corner_direction, signed_polygon_area, Orientation};

/// Is the closed polygon convex, whatever its winding?
pub fn is_convex_polygon(points: &[Point<Real>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut winding = Orientation::None;

    for i in 0..n {
        let dir = corner_direction(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n]);
        match (dir, winding) {
            (Orientation::None, _) => {}
            (_, Orientation::None) => winding = dir,
            _ if dir != winding => return false,
            _ => {}
        }
    }

    winding != Orientation::None
}

/// Splits a simple polygon into convex pieces, given as indices into `points`.
///
/// Each piece keeps the winding of the input. A convex polygon is returned as a
/// single piece. Returns `None` for polygons with fewer than three vertices and
/// for polygons that cannot be triangulated (self-intersecting ones).
pub fn convex_decomposition(points: &[Point<Real>]) -> Option<Vec<Vec<usize>>> {
    if points.len() < 3 {
        return None;
    }

    if is_convex_polygon(points) {
        return Some(vec![(0..points.len()).collect()]);
    }

    // Triangulation expects a counter-clockwise polygon in a y-up frame.
    let reversed = signed_polygon_area(points) < 0.0;
    let ccw: Vec<Point<Real>> = if reversed {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    };

    let triangles = triangulate_ear_clipping(&ccw)?;
    let mut pieces = hertel_mehlhorn_idx(&ccw, &triangles);

    if reversed {
        let last = points.len() - 1;
        for piece in &mut pieces {
            piece.reverse();
            piece.iter_mut().for_each(|i| *i = last - *i);
        }
    }

    Some(pieces)
}
