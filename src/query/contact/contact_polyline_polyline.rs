use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector, MAX_WORLD_SIZE};
use crate::query::{
    find_nearest_particle, find_nearest_side, point_in_group, Contact, ParticleGroup,
};
use crate::utils::{bisector_unit_vector, line_intersection, perpendicular, safe_normalize};
use smallvec::SmallVec;

type Side = (usize, usize);

/// Penetrations found through a fallback side are scaled down by this factor.
const MINI_RESPONSE_FACTOR: Real = 0.2;

/// The endpoints of a side of `group`, pushed outward by the particle radii,
/// and the resulting unit normal.
///
/// With `min_total_radius`, the offset only happens when the sum of both radii
/// exceeds it. Otherwise it happens as soon as one particle has a volume.
fn offset_side(
    group: &ParticleGroup,
    side: Side,
    min_total_radius: Option<Real>,
) -> (Point<Real>, Point<Real>, Vector<Real>) {
    let (a, b) = (group.particle(side.0), group.particle(side.1));
    let mut a_pos = a.position;
    let mut b_pos = b.position;
    let mut normal = perpendicular(&safe_normalize(&(b_pos - a_pos)));

    let offset = match min_total_radius {
        Some(min) => a.radius + b.radius > min,
        None => a.has_volume() || b.has_volume(),
    };
    if offset {
        if a.has_volume() {
            a_pos += normal * a.radius;
        }
        if b.has_volume() {
            b_pos += normal * b.radius;
        }
        normal = perpendicular(&safe_normalize(&(b_pos - a_pos)));
    }

    (a_pos, b_pos, normal)
}

/// Is the `k`-th particle of `test` inside `target`?
///
/// Besides the winding test, a vertex whose two adjacent edges both cross the
/// same edge of `target` is considered inside.
fn is_inside(test: &ParticleGroup, target: &ParticleGroup, k: usize) -> bool {
    let pos = test.position(k);
    if point_in_group(&pos, target) {
        return true;
    }

    if test.len() <= 3 || target.len() <= 3 {
        return false;
    }

    let prev = test.position(test.prev(k));
    let next = test.position(test.next(k));
    (0..target.len()).any(|j| {
        let a = target.position(j);
        let b = target.position(target.next(j));
        line_intersection(&prev, &pos, &a, &b).is_some()
            && line_intersection(&pos, &next, &a, &b).is_some()
    })
}

/// Contacts between the particles of `test` and the edges of the closed
/// polyline `target`.
///
/// A particle inside `target` is pushed out through the edge hit by a ray cast
/// along its inward corner bisector, preferring the edges adjacent to the
/// nearest target particle. A particle with a volume outside of `target`
/// collides with the nearest edge its disk overlaps. The particles of `test`
/// are the incident particles.
pub fn contact_polyline_polyline(
    test: &ParticleGroup,
    target: &ParticleGroup,
    target_aabb: &Aabb,
    out: &mut Vec<Contact>,
) {
    if target.len() < 2 {
        return;
    }

    let self_collision = test.same_as(target);

    for ia in 0..test.len() {
        let pa = test.particle(ia);
        if !pa.aabb().intersects(target_aabb) {
            continue;
        }

        let inside = !self_collision && is_inside(test, target, ia);
        let contact = if inside {
            inside_contact(test, target, ia)
        } else if pa.has_volume() {
            outside_contact(test, target, ia)
        } else {
            None
        };

        if let Some(contact) = contact {
            out.push(contact);
        }
    }
}

fn inside_contact(test: &ParticleGroup, target: &ParticleGroup, ia: usize) -> Option<Contact> {
    let pa = test.particle(ia);
    let pos = pa.position;
    let radius = pa.radius;

    let (ray_end, ray_unit) = if test.len() >= 3 {
        let prev = test.particle(test.prev(ia));
        let next = test.particle(test.next(ia));
        let corner_len = (next.local_position - prev.local_position).norm();
        let unit = bisector_unit_vector(&prev.position, &pos, &next.position, true);
        (pos + unit * corner_len, unit)
    } else {
        (Point::origin(), Vector::zeros())
    };

    let ni = find_nearest_particle(&pos, target, Some(test.id(ia)));
    let mut sides: SmallVec<[Side; 4]> = SmallVec::new();
    sides.push((target.prev(ni), ni));
    sides.push((ni, target.next(ni)));

    let faces_ray = |side: &Side| {
        let side_vec = target.position(side.1) - target.position(side.0);
        perpendicular(&side_vec).dot(&ray_unit) > 0.0
    };

    // When neither side adjacent to the nearest particle faces the ray, every
    // side facing it is a candidate and the response is damped.
    let mini_response = !sides.iter().any(faces_ray);
    if mini_response {
        sides = (0..target.len())
            .map(|j| (j, target.next(j)))
            .filter(faces_ray)
            .collect();
    }

    let mut collided = None;
    let mut normal = Vector::zeros();
    let mut penetration = 0.0;
    let mut min_dist = -MAX_WORLD_SIZE;

    for side in &sides {
        let (a_pos, b_pos, side_normal) = offset_side(target, *side, Some(1.0));
        let dist = (pos - a_pos).dot(&side_normal);

        if test.len() >= 3 {
            if line_intersection(&ray_end, &pos, &a_pos, &b_pos).is_some()
                && dist < 0.0
                && dist > min_dist
            {
                min_dist = dist;
                normal = side_normal;
                penetration = dist - radius;
                collided = Some(*side);
            }
        } else if dist > min_dist && dist < radius {
            min_dist = dist;
            normal = side_normal;
            penetration = dist - radius;
            collided = Some(*side);
        }
    }

    if collided.is_none() {
        let mut min_abs = MAX_WORLD_SIZE;
        for j in 0..target.len() {
            let side = (j, target.next(j));
            let a = target.position(side.0);
            let side_normal = perpendicular(&safe_normalize(&(target.position(side.1) - a)));
            let dist = (pos - a).dot(&side_normal);
            if dist.abs() < min_abs {
                min_abs = dist.abs();
                normal = side_normal;
                penetration = dist;
                collided = Some(side);
            }
        }
    }

    if mini_response {
        penetration *= MINI_RESPONSE_FACTOR;
    }

    let (a, b) = collided?;
    Some(Contact::with_segment(
        test.id(ia),
        pos,
        normal,
        -penetration,
        target.id(a),
        target.id(b),
    ))
}

fn outside_contact(test: &ParticleGroup, target: &ParticleGroup, ia: usize) -> Option<Contact> {
    let pa = test.particle(ia);
    let pos = pa.position;
    let radius = pa.radius;

    let (first, second) = find_nearest_side(&pos, target, true)?;
    let pair = [first, second];
    let ni = {
        let mut best = first;
        let mut min_dist = MAX_WORLD_SIZE;
        for k in pair {
            if target.id(k) == test.id(ia) {
                continue;
            }
            let dist = (pos - target.position(k)).norm();
            if dist < min_dist {
                min_dist = dist;
                best = k;
            }
        }
        best
    };

    let sides = [(target.prev(ni), ni), (ni, target.next(ni))];
    let mut best = None;
    let mut min_dist = MAX_WORLD_SIZE;

    for side in sides {
        let (a_pos, b_pos, normal) = offset_side(target, side, None);
        let segment = b_pos - a_pos;
        let len = segment.norm();
        let unit = safe_normalize(&segment);
        let bridge = pos - a_pos;
        let perp_proj = bridge.dot(&normal);

        if perp_proj.abs() < min_dist && perp_proj.abs() < radius {
            let proj = bridge.dot(&unit);
            if proj >= 0.0 && proj <= len {
                let sign = if perp_proj < 0.0 { -1.0 } else { 1.0 };
                min_dist = perp_proj.abs();
                best = Some((
                    side,
                    pos - normal * (radius * sign),
                    normal,
                    (radius * sign - perp_proj).abs(),
                ));
            }
        }
    }

    let ((a, b), position, normal, penetration) = best?;
    Some(Contact::with_segment(
        test.id(ia),
        position,
        normal,
        penetration,
        target.id(a),
        target.id(b),
    ))
}
