use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::query::{Contact, ParticleGroup};
use crate::utils::safe_normalize;

/// Group indices sorted by the left side of the particle bounding boxes.
fn sorted_by_min_x(group: &ParticleGroup) -> Vec<usize> {
    let mut sorted: Vec<usize> = (0..group.len()).collect();
    sorted.sort_by(|i, j| {
        let a = group.particle(*i).aabb().mins.x;
        let b = group.particle(*j).aabb().mins.x;
        a.total_cmp(&b)
    });
    sorted
}

/// Contacts between the disks of two particle groups.
///
/// The incident particle of each contact belongs to `group2` and its reference
/// particle to `group1`. The normal goes from the center in `group1` toward
/// the center in `group2`, or between the previous positions when
/// `velocity_sensitive` is set.
///
/// `radius` overrides the radius of every particle. When both groups have
/// more than one particle, the particles of `group1` outside of `aabb2` are
/// skipped.
pub fn contact_circles_circles(
    group1: &ParticleGroup,
    group2: &ParticleGroup,
    aabb2: &Aabb,
    radius: Option<Real>,
    velocity_sensitive: bool,
    out: &mut Vec<Contact>,
) {
    let sorted1 = sorted_by_min_x(group1);
    let sorted2 = sorted_by_min_x(group2);
    let prefilter = sorted1.len() > 1 && sorted2.len() > 1;

    for i in sorted1 {
        let p1 = group1.particle(i);
        let aabb1 = p1.aabb();

        if prefilter && !aabb1.intersects(aabb2) {
            continue;
        }

        for j in &sorted2 {
            let p2 = group2.particle(*j);
            let aabb_p2 = p2.aabb();

            if aabb1.maxs.x < aabb_p2.mins.x {
                break;
            }
            if !aabb1.overlaps_y(&aabb_p2) {
                continue;
            }

            let (r1, r2) = radius.map_or((p1.radius, p2.radius), |r| (r, r));
            let total = r1 + r2;
            let dist_vec = p2.position - p1.position;
            let dist_sq = dist_vec.norm_squared();

            if dist_sq < total * total {
                let normal = if velocity_sensitive {
                    safe_normalize(&(p2.prev_position - p1.prev_position))
                } else {
                    safe_normalize(&dist_vec)
                };
                let penetration = total - dist_sq.sqrt();
                let position = p1.position + normal * r1;

                out.push(Contact::with_particle(
                    group2.id(*j),
                    position,
                    normal,
                    penetration,
                    group1.id(i),
                ));
            }
        }
    }
}

/// Contacts between the disks of a single group, for self collisions.
///
/// Every disk uses `radius`, or the radius of the first particle if unset.
pub fn contact_circles_self(group: &ParticleGroup, radius: Option<Real>, out: &mut Vec<Contact>) {
    if group.is_empty() {
        return;
    }

    let radius = radius.unwrap_or_else(|| group.particle(0).radius);
    let total = radius * 2.0;
    let sorted = sorted_by_min_x(group);

    for (k, i) in sorted.iter().enumerate() {
        let p1 = group.particle(*i);
        let aabb1 = p1.aabb();

        for j in &sorted[k + 1..] {
            let p2 = group.particle(*j);
            let aabb2 = p2.aabb();

            if aabb1.maxs.x < aabb2.mins.x {
                break;
            }
            if !aabb1.overlaps_y(&aabb2) {
                continue;
            }

            let dist_vec = p2.position - p1.position;
            let dist_sq = dist_vec.norm_squared();
            if dist_sq < total * total {
                let normal = safe_normalize(&dist_vec);
                out.push(Contact::with_particle(
                    group.id(*j),
                    p1.position + normal * radius,
                    normal,
                    total - dist_sq.sqrt(),
                    group.id(*i),
                ));
            }
        }
    }
}
