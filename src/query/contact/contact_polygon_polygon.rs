use crate::dynamics::ParticleId;
use crate::math::{Point, Real, Vector};
use crate::query::clip::clip_segment_segment;
use crate::query::sat::{polygon_polygon_find_min_penetration, project_on_axis};
use crate::query::{Contact, ParticleGroup};

/// The edge adjacent to the support vertex `support` that is the most
/// perpendicular to `axis`, along with how parallel to `axis` it is.
fn best_edge(
    poly: &ParticleGroup,
    support: usize,
    axis: &Vector<Real>,
) -> ([(ParticleId, Point<Real>); 2], Real) {
    let (prev, next) = (poly.prev(support), poly.next(support));
    let feature =
        |a: usize, b: usize| [(poly.id(a), poly.position(a)), (poly.id(b), poly.position(b))];

    let rate_next = (poly.position(next) - poly.position(support)).dot(axis).abs();
    let rate_prev = (poly.position(support) - poly.position(prev)).dot(axis).abs();

    if rate_prev < rate_next {
        (feature(prev, support), rate_prev)
    } else {
        (feature(support, next), rate_next)
    }
}

/// Contacts between two convex polygons.
///
/// The axis of least penetration is found with the separating axis test. The
/// edge of each polygon best facing that axis is selected, the one most
/// perpendicular to the axis becomes the reference, and the endpoints of the
/// other one are clipped against it. If nothing survives the clipping, the
/// roles are swapped.
pub fn contact_polygon_polygon(
    poly1: &ParticleGroup,
    poly2: &ParticleGroup,
    out: &mut Vec<Contact>,
) {
    if poly1.len() < 2 || poly2.len() < 2 {
        return;
    }

    let Some((axis, _)) = polygon_polygon_find_min_penetration(poly1, poly2) else {
        return;
    };

    let proj1 = project_on_axis(poly1, &axis);
    let proj2 = project_on_axis(poly2, &axis);
    let (support1, support2) = if proj2.min < proj1.min {
        (proj1.min_index, proj2.max_index)
    } else {
        (proj1.max_index, proj2.min_index)
    };

    let (edge1, rate1) = best_edge(poly1, support1, &axis);
    let (edge2, rate2) = best_edge(poly2, support2, &axis);

    let (reference, incident) = if rate2 < rate1 {
        (edge2, edge1)
    } else {
        (edge1, edge2)
    };

    if clip_segment_segment(reference, incident, out) == 0 {
        let _ = clip_segment_segment(incident, reference, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyHandle;
    use crate::shape::Mesh;

    fn collide(center2: Point<Real>) -> Vec<Contact> {
        let mesh1 = Mesh::rectangle(Vector::new(4.0, 2.0), Point::origin());
        let mesh2 = Mesh::rectangle(Vector::new(2.0, 2.0), center2);
        let g1 = ParticleGroup::polygon(BodyHandle(0), 0, &mesh1);
        let g2 = ParticleGroup::polygon(BodyHandle(1), 0, &mesh2);
        let mut out = Vec::new();
        contact_polygon_polygon(&g1, &g2, &mut out);
        out
    }

    #[test]
    fn separated_boxes() {
        assert!(collide(Point::new(0.0, -2.5)).is_empty());
        assert!(collide(Point::new(3.5, 0.0)).is_empty());
    }

    #[test]
    fn stacked_boxes() {
        // The small box sinks 0.25 into the top of the wide one.
        let out = collide(Point::new(0.0, -1.75));
        assert_eq!(out.len(), 2);
        for contact in &out {
            assert_relative_eq!(contact.penetration, 0.25, epsilon = 1.0e-5);
            assert_eq!(contact.particle.body, BodyHandle(1));
            assert_eq!(contact.reference_body(), BodyHandle(0));
            assert_relative_eq!(contact.normal, Vector::new(0.0, -1.0), epsilon = 1.0e-5);
        }
    }
}
