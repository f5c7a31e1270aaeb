//! Structures needed to cast rays.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// A segment-shaped ray: it starts at `origin` and stops at `origin + dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray. Its length is the reach of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and reaching `origin + dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// The point reached by the ray.
    #[inline]
    pub fn end(&self) -> Point<Real> {
        self.origin + self.dir
    }

    /// Computes the point at the given parameter on this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }

    /// Can the ray reach the given box at all?
    ///
    /// Each axis compares the box against the range swept by the ray on it.
    pub fn may_hit(&self, aabb: &Aabb) -> bool {
        let end = self.end();
        for i in 0..2 {
            let (lo, hi) = if self.dir[i] < 0.0 {
                (end[i], self.origin[i])
            } else {
                (self.origin[i], end[i])
            };
            if aabb.mins[i] > hi || aabb.maxs[i] < lo {
                return false;
            }
        }
        true
    }
}

/// Where a ray hits a particle group.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The hit point. The origin of the ray when it starts inside the group.
    pub position: Point<Real>,
    /// The surface normal at the hit point.
    pub normal: Vector<Real>,
    /// The distance from the origin of the ray, used to sort hits.
    pub distance: Real,
}
