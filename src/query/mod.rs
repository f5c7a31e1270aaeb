//! Non-persistent geometric queries over particle groups.
//!
//! The narrow phase is made of the `contact_[group1]_[group2]` functions of
//! the [`details`] module, where each group is one of:
//!
//! * `circles`: independent disks.
//! * `polygon`: a convex polygon, usually a convex piece of a rigid mesh.
//! * `polyline`: the closed boundary of a soft mesh, possibly concave or
//!   self-overlapping.
//!
//! Ray casts and point queries against the same groups are exported at the
//! root of this module.

pub use self::contact::Contact;
pub use self::particle_group::ParticleGroup;
pub use self::point::{
    find_nearest_particle, find_nearest_side, point_in_convex_group, point_in_group,
};
pub use self::ray::{cast_ray_on_circles, cast_ray_on_polygon, Ray, RayIntersection};

pub mod clip;
mod contact;
mod particle_group;
mod point;
mod ray;
pub mod sat;

/// Queries dedicated to specific pairs of particle groups.
pub mod details {
    pub use super::clip::*;
    pub use super::contact::{
        contact_circles_circles, contact_circles_polygon, contact_circles_self,
        contact_polygon_polygon, contact_polyline_polygon, contact_polyline_polyline,
    };
}
