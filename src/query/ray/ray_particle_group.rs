use crate::math::MAX_WORLD_SIZE;
use crate::query::{ParticleGroup, Ray, RayIntersection};
use crate::utils::{line_intersection, perpendicular, safe_normalize};

/// Casts `ray` on the disks of `circles` and returns the nearest hit.
///
/// A ray starting inside a disk reports its own origin when `containing` is
/// set, and ignores that disk otherwise.
pub fn cast_ray_on_circles(
    ray: &Ray,
    circles: &ParticleGroup,
    containing: bool,
) -> Option<RayIntersection> {
    let unit = safe_normalize(&ray.dir);
    let normal = perpendicular(&unit);
    let len = ray.dir.norm();
    let mut res: Option<RayIntersection> = None;

    for k in 0..circles.len() {
        let particle = circles.particle(k);
        let radius = particle.radius;
        let bridge = particle.position - ray.origin;
        let proj = bridge.dot(&unit);

        if let Some(best) = &res {
            if proj - radius > best.distance {
                continue;
            }
        }

        let perp_proj = bridge.dot(&normal);
        if perp_proj.abs() >= radius || proj < -radius || proj > len + radius {
            continue;
        }

        let half_chord = (radius * radius - perp_proj * perp_proj).sqrt();
        let mut position = ray.origin + unit * (proj - half_chord);
        if (position - ray.origin).dot(&unit) <= 0.0 {
            if !containing {
                continue;
            }
            position = ray.origin;
        }

        res = Some(RayIntersection {
            position,
            normal: safe_normalize(&(position - particle.position)),
            distance: proj,
        });
    }

    res
}

/// Casts `ray` on the edges of the closed polygon `polygon` and returns the
/// nearest hit.
///
/// A hit on an edge facing away from the ray means the ray starts inside the
/// polygon: the origin is reported when `containing` is set, nothing otherwise.
pub fn cast_ray_on_polygon(
    ray: &Ray,
    polygon: &ParticleGroup,
    containing: bool,
) -> Option<RayIntersection> {
    let end = ray.end();
    let mut res: Option<RayIntersection> = None;
    let mut min_dist = MAX_WORLD_SIZE;

    for k in 0..polygon.len() {
        let a = polygon.position(k);
        let b = polygon.position(polygon.next(k));

        let Some(hit) = line_intersection(&a, &b, &ray.origin, &end) else {
            continue;
        };

        let distance = (hit - ray.origin).norm();
        if distance > min_dist {
            continue;
        }

        min_dist = distance;
        res = Some(RayIntersection {
            position: hit,
            normal: perpendicular(&safe_normalize(&(b - a))),
            distance,
        });
    }

    let mut hit = res?;
    if ray.dir.dot(&hit.normal) > 0.0 {
        if !containing {
            return None;
        }
        hit.position = ray.origin;
    }
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyHandle;
    use crate::math::{Point, Vector};
    use crate::shape::Mesh;

    #[test]
    fn ray_hits_disk_front() {
        let disk = Mesh::circle(2.0, Point::new(10.0, 0.0));
        let group = ParticleGroup::all(BodyHandle(0), 0, &disk);
        let ray = Ray::new(Point::origin(), Vector::new(20.0, 0.0));

        let hit = cast_ray_on_circles(&ray, &group, false).unwrap();
        assert_relative_eq!(hit.position, Point::new(8.0, 0.0), epsilon = 1.0e-4);
        assert_relative_eq!(hit.normal, Vector::new(-1.0, 0.0), epsilon = 1.0e-4);
        assert_relative_eq!(hit.distance, 10.0);

        let short = Ray::new(Point::origin(), Vector::new(5.0, 0.0));
        assert!(cast_ray_on_circles(&short, &group, false).is_none());
    }

    #[test]
    fn ray_inside_polygon() {
        let boxed = Mesh::rectangle(Vector::new(4.0, 4.0), Point::origin());
        let group = ParticleGroup::polygon(BodyHandle(0), 0, &boxed);

        let outside = Ray::new(Point::new(-10.0, 0.0), Vector::new(20.0, 0.0));
        let hit = cast_ray_on_polygon(&outside, &group, false).unwrap();
        assert_relative_eq!(hit.position, Point::new(-2.0, 0.0), epsilon = 1.0e-4);
        assert_relative_eq!(hit.normal, Vector::new(-1.0, 0.0), epsilon = 1.0e-4);
        assert_relative_eq!(hit.distance, 8.0, epsilon = 1.0e-4);

        let inside = Ray::new(Point::origin(), Vector::new(10.0, 0.0));
        assert!(cast_ray_on_polygon(&inside, &group, false).is_none());
        let hit = cast_ray_on_polygon(&inside, &group, true).unwrap();
        assert_eq!(hit.position, Point::origin());
    }
}
