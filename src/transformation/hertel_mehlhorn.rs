//! Hertel-Mehlhorn merge of a triangulation into convex pieces.

use crate::math::{Point, Real};
use crate::utils::{corner_direction, Orientation};

/// Position, inside `piece`, of the directed edge `a -> b`.
fn find_edge(a: usize, b: usize, piece: &[usize]) -> Option<(usize, usize)> {
    (0..piece.len())
        .map(|i| (i, (i + 1) % piece.len()))
        .find(|(i, j)| piece[*i] == a && piece[*j] == b)
}

/// Merges adjacent triangles of a counter-clockwise triangulation as long as
/// the result stays convex.
///
/// This is a heuristic: it produces at most four times the optimal number of
/// convex pieces, and usually far fewer. Runs in `O(n²)`.
pub fn hertel_mehlhorn_idx(points: &[Point<Real>], triangles: &[[usize; 3]]) -> Vec<Vec<usize>> {
    let mut pieces: Vec<Vec<usize>> = triangles.iter().map(|t| t.to_vec()).collect();

    let mut i1 = 0;
    while i1 < pieces.len() {
        let mut e = 0;
        while e < pieces[i1].len() {
            let piece1 = &pieces[i1];
            let e_next = (e + 1) % piece1.len();
            let (start, end) = (piece1[e], piece1[e_next]);

            // The shared edge runs the other way in the neighbor.
            let Some((i2, (f, f_next))) = pieces
                .iter()
                .enumerate()
                .skip(i1 + 1)
                .find_map(|(i, p)| find_edge(end, start, p).map(|edge| (i, edge)))
            else {
                e += 1;
                continue;
            };

            let piece2 = &pieces[i2];
            let len1 = piece1.len();
            let len2 = piece2.len();

            // Both corners touching the removed diagonal must stay convex.
            let corner_a = corner_direction(
                &points[piece2[(f_next + 1) % len2]],
                &points[piece1[(e + len1 - 1) % len1]],
                &points[piece1[e]],
            );
            let corner_b = corner_direction(
                &points[piece1[(e_next + 1) % len1]],
                &points[piece2[(f + len2 - 1) % len2]],
                &points[piece1[e_next]],
            );

            if corner_a == Orientation::Cw || corner_b == Orientation::Cw {
                e += 1;
                continue;
            }

            let mut merged = Vec::with_capacity(len1 + len2 - 2);
            merged.extend(piece1.iter().cycle().skip(e_next).take(len1 - 1));
            merged.extend(piece2.iter().cycle().skip(f_next).take(len2 - 1));

            let _ = pieces.remove(i2);
            pieces[i1] = merged;
            e = 0;
        }

        i1 += 1;
    }

    pieces
}
