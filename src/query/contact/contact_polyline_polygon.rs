use crate::math::{Real, Vector, MAX_WORLD_SIZE};
use crate::query::{Contact, ParticleGroup};
use crate::utils::{bisector_unit_vector, line_intersection, perpendicular, safe_normalize};

/// For every vertex of `polygon`, a probe vector going inward along the corner
/// bisector, or zero if the vertex cannot be probed.
///
/// Outside of self collisions the probe goes halfway to the nearest opposite
/// edge hit by the bisector.
fn bisector_probes(polygon: &ParticleGroup, self_collision: bool) -> Vec<Vector<Real>> {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let (pi, ni) = (polygon.prev(i), polygon.next(i));
            let pos = polygon.position(i);
            let prev = polygon.position(pi);
            let unit = bisector_unit_vector(&prev, &pos, &polygon.position(ni), true);

            if self_collision {
                let len = (pos - prev).dot(&unit).abs() * 0.5;
                return unit * len;
            }

            let ray_end = pos + unit * MAX_WORLD_SIZE;
            let mut probe = Vector::zeros();
            let mut min_dist = MAX_WORLD_SIZE;
            let mut sa = ni;
            while sa != pi {
                let sb = polygon.next(sa);
                let (a, b) = (polygon.position(sa), polygon.position(sb));
                let hit = line_intersection(&pos, &ray_end, &a, &b);
                if let Some(hit) = hit {
                    let found = hit - pos;
                    let dist = found.norm();
                    if dist < min_dist {
                        probe = found * 0.5;
                        min_dist = dist;
                    }
                }
                sa = sb;
            }
            probe
        })
        .collect()
}

/// Contacts between the vertices of `polygon` and the edges of `polyline`.
///
/// Each vertex of the polygon is probed along its inward corner bisector: when
/// the probe crosses an edge of the polyline, the vertex is behind that edge
/// and collides with it. The polygon vertices are the incident particles.
///
/// Passing the same group twice runs the self-collision variant, where the
/// probes are shorter and particles linked by a spring to an edge ignore it.
pub fn contact_polyline_polygon(
    polyline: &ParticleGroup,
    polygon: &ParticleGroup,
    out: &mut Vec<Contact>,
) {
    if polyline.len() < 2 || polygon.len() < 3 {
        return;
    }

    let self_collision = polyline.same_as(polygon);
    let probes = bisector_probes(polygon, self_collision);

    for i in 0..polyline.len() {
        let ni = polyline.next(i);
        let (s1, s2) = (polyline.particle(i), polyline.particle(ni));

        let normal = perpendicular(&safe_normalize(&(s2.position - s1.position)));
        let mut s1_pos = s1.position;
        let mut s2_pos = s2.position;
        if s1.has_volume() {
            s1_pos += normal * s1.radius;
        }
        if s2.has_volume() {
            s2_pos += normal * s2.radius;
        }
        let normal = perpendicular(&safe_normalize(&(s2_pos - s1_pos)));

        for (n, probe) in probes.iter().enumerate() {
            if *probe == Vector::zeros() {
                continue;
            }

            if self_collision
                && (n == i
                    || n == ni
                    || polygon.connected_with_spring(n, i)
                    || polygon.connected_with_spring(n, ni))
            {
                continue;
            }

            let p = polygon.particle(n);
            let mut pos = p.position;
            if p.has_volume() {
                pos -= normal * p.radius;
            }

            if line_intersection(&pos, &(pos + probe), &s1_pos, &s2_pos).is_none() {
                continue;
            }

            let penetration = (pos - s1_pos).dot(&-normal);
            out.push(Contact::with_segment(
                polygon.id(n),
                p.position,
                normal,
                penetration,
                polyline.id(i),
                polyline.id(ni),
            ));
        }
    }
}
