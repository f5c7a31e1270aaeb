use crate::math::{Real, Vector, MAX_WORLD_SIZE};
use crate::query::sat::project_on_axis;
use crate::query::ParticleGroup;
use crate::utils::{perpendicular, safe_normalize};

/// Finds the edge normal of either polygon along which both polygons
/// penetrate the least.
///
/// The edges of `poly1` are tested first, then the edges of `poly2`, and the
/// first axis reaching the minimum wins ties. Returns `None` as soon as one
/// axis separates both polygons.
pub fn polygon_polygon_find_min_penetration(
    poly1: &ParticleGroup,
    poly2: &ParticleGroup,
) -> Option<(Vector<Real>, Real)> {
    let mut min_penetration = MAX_WORLD_SIZE;
    let mut best_axis = Vector::zeros();

    for (reference, incident) in [(poly1, poly2), (poly2, poly1)] {
        for k in 0..reference.len() {
            let edge = reference.position(reference.next(k)) - reference.position(k);
            let axis = perpendicular(&safe_normalize(&edge));

            let proj_ref = project_on_axis(reference, &axis);
            let proj_inc = project_on_axis(incident, &axis);
            let separation = proj_ref.separation(&proj_inc);

            if separation >= 0.0 {
                return None;
            }

            if -separation < min_penetration {
                min_penetration = -separation;
                best_axis = axis;
            }
        }
    }

    Some((best_axis, min_penetration))
}
