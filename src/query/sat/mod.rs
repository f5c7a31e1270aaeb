//! Application of the Separating-Axis-Theorem (SAT).

pub use self::sat_polygon_polygon::polygon_polygon_find_min_penetration;

mod sat_polygon_polygon;

use crate::math::{Real, Vector, MAX_WORLD_SIZE};
use crate::query::ParticleGroup;

/// The extent of a particle group projected on an axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// The smallest projected value.
    pub min: Real,
    /// The group index of the particle giving `min`.
    pub min_index: usize,
    /// The largest projected value.
    pub max: Real,
    /// The group index of the particle giving `max`.
    pub max_index: usize,
}

impl Projection {
    /// The signed gap between both projections.
    ///
    /// Positive or zero when the intervals are separated, negative when they
    /// overlap, in which case its magnitude is the overlap depth.
    pub fn separation(&self, other: &Projection) -> Real {
        if other.min < self.min {
            self.min - other.max
        } else {
            other.min - self.max
        }
    }
}

/// Projects every particle position of `group` on `axis`.
pub fn project_on_axis(group: &ParticleGroup, axis: &Vector<Real>) -> Projection {
    let mut res = Projection {
        min: MAX_WORLD_SIZE,
        min_index: 0,
        max: -MAX_WORLD_SIZE,
        max_index: 0,
    };

    for k in 0..group.len() {
        let dist = group.position(k).coords.dot(axis);
        if dist < res.min {
            res.min = dist;
            res.min_index = k;
        }
        if dist > res.max {
            res.max = dist;
            res.max_index = k;
        }
    }

    res
}
