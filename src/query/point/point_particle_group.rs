use crate::dynamics::ParticleId;
use crate::math::{Point, Real, MAX_WORLD_SIZE};
use crate::query::ParticleGroup;
use crate::utils::{perpendicular, point_in_convex_poly2d, point_in_poly2d, safe_normalize};

/// Is `point` inside the closed polygon formed by `group`?
///
/// Uses the winding number, so concave and self-overlapping groups work too.
pub fn point_in_group(point: &Point<Real>, group: &ParticleGroup) -> bool {
    point_in_poly2d(point, &group.positions())
}

/// Is `point` inside the convex polygon formed by `group`?
pub fn point_in_convex_group(point: &Point<Real>, group: &ParticleGroup) -> bool {
    point_in_convex_poly2d(point, &group.positions())
}

/// The edge of `group` closest to `point`, as a pair of group indices.
///
/// Distances are measured along the unnormalized edge perpendicular. With
/// `range_check`, edges on which `point` does not project are ignored.
pub fn find_nearest_side(
    point: &Point<Real>,
    group: &ParticleGroup,
    range_check: bool,
) -> Option<(usize, usize)> {
    let mut res = None;
    let mut min_dist = MAX_WORLD_SIZE;

    for k in 0..group.len() {
        let nk = group.next(k);
        let start = group.position(k);
        let side = group.position(nk) - start;
        let bridge = point - start;

        if range_check {
            let proj = bridge.dot(&safe_normalize(&side));
            if proj < 0.0 || proj > side.norm() {
                continue;
            }
        }

        let dist = bridge.dot(&perpendicular(&side)).abs();
        if dist < min_dist {
            min_dist = dist;
            res = Some((k, nk));
        }
    }

    res
}

/// The group index of the particle closest to `point`, skipping `exclude`.
///
/// Returns `0` if every particle is excluded.
pub fn find_nearest_particle(
    point: &Point<Real>,
    group: &ParticleGroup,
    exclude: Option<ParticleId>,
) -> usize {
    let mut res = 0;
    let mut min_dist = MAX_WORLD_SIZE;

    for k in 0..group.len() {
        if Some(group.id(k)) == exclude {
            continue;
        }

        let dist = (point - group.position(k)).norm();
        if dist < min_dist {
            min_dist = dist;
            res = k;
        }
    }

    res
}
