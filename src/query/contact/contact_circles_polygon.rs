use crate::math::{Point, Real, Vector, MAX_WORLD_SIZE};
use crate::query::{point_in_group, Contact, ParticleGroup};
use crate::utils::{bisector_unit_vector, perpendicular, safe_normalize};

/// The positions of a polygon, moved inward by the particle radii.
fn offset_polygon(polygon: &ParticleGroup) -> Vec<Point<Real>> {
    (0..polygon.len())
        .map(|k| {
            let particle = polygon.particle(k);
            if particle.has_volume() {
                let prev = polygon.position(polygon.prev(k));
                let next = polygon.position(polygon.next(k));
                let bisector = bisector_unit_vector(&prev, &particle.position, &next, false);
                particle.position - bisector * particle.radius
            } else {
                particle.position
            }
        })
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VoronoiRegion {
    Vertex,
    Edge,
    Inside,
}

/// Contacts between the disks of `circles` and the convex polygon `polygon`.
///
/// Each disk center is classified against the Voronoi regions of the polygon
/// (closest vertex, closest edge, or inside) and collides with the matching
/// feature. The disks are the incident particles.
pub fn contact_circles_polygon(
    circles: &ParticleGroup,
    polygon: &ParticleGroup,
    out: &mut Vec<Contact>,
) {
    if polygon.is_empty() {
        return;
    }

    let positions = offset_polygon(polygon);

    for c in 0..circles.len() {
        let circle = circles.particle(c);
        let center = circle.position;
        let radius = circle.radius;

        let mut nearest_vertex = 0;
        let mut vertex_dist_sq = MAX_WORLD_SIZE;
        let mut vertex_normal = Vector::zeros();

        let mut nearest_edge = None;
        let mut edge_penetration = MAX_WORLD_SIZE;
        let mut edge_min_dist = MAX_WORLD_SIZE;
        let mut edge_normal = Vector::zeros();

        for k in 0..positions.len() {
            let nk = polygon.next(k);
            let (pos, next_pos) = (positions[k], positions[nk]);

            let to_center = center - pos;
            let dist_sq = to_center.norm_squared();
            if dist_sq < vertex_dist_sq {
                nearest_vertex = k;
                vertex_dist_sq = dist_sq;
                vertex_normal = safe_normalize(&to_center);
            }

            let edge = next_pos - pos;
            let unit = safe_normalize(&edge);
            let normal = perpendicular(&unit);
            let penetration = to_center.dot(&normal);

            if penetration.abs() < edge_min_dist {
                let proj = to_center.dot(&unit);
                if proj >= 0.0 && proj <= edge.norm() {
                    edge_min_dist = penetration.abs();
                    edge_penetration = penetration;
                    nearest_edge = Some((k, nk));
                    edge_normal = normal;
                }
            }
        }

        let vertex_dist = vertex_dist_sq.sqrt();
        let region = match nearest_edge {
            None => VoronoiRegion::Vertex,
            Some(_) if vertex_dist > edge_min_dist => {
                if edge_penetration < 0.0 && point_in_group(&center, polygon) {
                    VoronoiRegion::Inside
                } else {
                    VoronoiRegion::Edge
                }
            }
            Some(_) => VoronoiRegion::Vertex,
        };

        let surface_point = |normal: &Vector<Real>| {
            if circle.has_volume() {
                center - normal * radius
            } else {
                center
            }
        };

        match region {
            VoronoiRegion::Vertex => {
                let reference = polygon.id(nearest_vertex);
                if point_in_group(&center, polygon) {
                    out.push(Contact::with_particle(
                        circles.id(c),
                        center,
                        -vertex_normal,
                        radius + vertex_dist,
                        reference,
                    ));
                } else if vertex_dist < radius {
                    out.push(Contact::with_particle(
                        circles.id(c),
                        surface_point(&vertex_normal),
                        vertex_normal,
                        radius - vertex_dist,
                        reference,
                    ));
                }
            }
            VoronoiRegion::Edge | VoronoiRegion::Inside => {
                let Some((a, b)) = nearest_edge else {
                    continue;
                };
                if region == VoronoiRegion::Inside || edge_penetration < radius {
                    out.push(Contact::with_segment(
                        circles.id(c),
                        surface_point(&edge_normal),
                        edge_normal,
                        radius - edge_penetration,
                        polygon.id(a),
                        polygon.id(b),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyHandle;
    use crate::shape::Mesh;

    fn setup(center: Point<Real>, radius: Real) -> Vec<Contact> {
        let boxed = Mesh::rectangle(Vector::new(4.0, 4.0), Point::origin());
        let disk = Mesh::circle(radius, center);
        let polygon = ParticleGroup::polygon(BodyHandle(0), 0, &boxed);
        let circles = ParticleGroup::all(BodyHandle(1), 0, &disk);
        let mut out = Vec::new();
        contact_circles_polygon(&circles, &polygon, &mut out);
        out
    }

    #[test]
    fn disk_on_edge() {
        let out = setup(Point::new(0.0, -2.5), 1.0);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].penetration, 0.5, epsilon = 1.0e-5);
        assert_relative_eq!(out[0].normal, Vector::new(0.0, -1.0), epsilon = 1.0e-5);
        assert_relative_eq!(out[0].position, Point::new(0.0, -1.5), epsilon = 1.0e-5);
        assert_eq!(out[0].reference.len(), 2);
    }

    #[test]
    fn disk_near_vertex() {
        let out = setup(Point::new(2.3, -2.4), 1.0);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].penetration, 0.5, epsilon = 1.0e-5);
        assert_relative_eq!(out[0].normal, Vector::new(0.6, -0.8), epsilon = 1.0e-5);
        assert_eq!(out[0].reference.len(), 1);
        assert_eq!(out[0].reference[0].index, 1);
    }

    #[test]
    fn disk_inside_and_apart() {
        let out = setup(Point::new(0.0, -1.5), 1.0);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].penetration, 1.5, epsilon = 1.0e-5);
        assert_relative_eq!(out[0].normal, Vector::new(0.0, -1.0), epsilon = 1.0e-5);

        assert!(setup(Point::new(0.0, -3.5), 1.0).is_empty());
        assert!(setup(Point::new(4.0, 4.0), 1.0).is_empty());
    }
}
