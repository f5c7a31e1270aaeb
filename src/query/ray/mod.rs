//! Ray casts against particle groups.

pub use self::ray::{Ray, RayIntersection};
pub use self::ray_particle_group::{cast_ray_on_circles, cast_ray_on_polygon};

#[allow(clippy::module_inception)]
mod ray;
mod ray_particle_group;
