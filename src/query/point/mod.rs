//! Point queries against particle groups.

pub use self::point_particle_group::{
    find_nearest_particle, find_nearest_side, point_in_convex_group, point_in_group,
};

mod point_particle_group;
