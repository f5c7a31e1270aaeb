//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, MAX_WORLD_SIZE};
use na;

/// An Axis-Aligned Bounding Box (AABB).
///
/// Bodies, meshes and particle groups all carry one. The broad phase only
/// compares these boxes, and most narrow-phase routines reject particles whose
/// box does not overlap the other side.
///
/// Since the `y` axis points down, `mins` is the top-left corner of the box on
/// screen and `maxs` is its bottom-right corner.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point::origin(), Point::origin())
    }
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// # Arguments:
    ///   * `mins` - position of the point with the smallest coordinates.
    ///   * `maxs` - position of the point with the highest coordinates. Each component of `mins`
    ///     must be smaller than the related components of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to the world size and
    /// `maxs` components set to its opposite.
    ///
    /// This is often used as the initial value of some AABB merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(MAX_WORLD_SIZE).into(),
            Vector::repeat(-MAX_WORLD_SIZE).into(),
        )
    }

    /// Creates a new AABB from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.inf(&pt);
        self.maxs = self.maxs.sup(&pt);
    }

    /// Enlarges this AABB so it also contains a disk of radius `radius` centered at `pt`.
    pub fn take_disk(&mut self, pt: Point<Real>, radius: Real) {
        let half = Vector::repeat(radius);
        self.mins = self.mins.inf(&(pt - half));
        self.maxs = self.maxs.sup(&(pt + half));
    }

    /// Does this AABB contain the given point? Points on the border are contained.
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        point.x >= self.mins.x
            && point.x <= self.maxs.x
            && point.y >= self.mins.y
            && point.y <= self.maxs.y
    }

    /// Does this AABB overlap the other one along the `y` axis?
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.maxs.y >= other.mins.y && self.mins.y <= other.maxs.y
    }

    /// This AABB scaled around its center by `rate`.
    ///
    /// Used by the broad phase to keep fast bodies in the cells they are
    /// about to enter.
    #[inline]
    pub fn fattened(&self, rate: Real) -> Self {
        Self::from_half_extents(self.center(), self.half_extents() * rate)
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        self.mins -= Vector::repeat(amount);
        self.maxs += Vector::repeat(amount);
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::Point;

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Aabb::new(Point::new(1.0, 0.5), Point::new(2.0, 2.0));
        let mut c = Aabb::new(Point::new(1.1, 0.5), Point::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        c.loosen(0.1);
        assert!(a.intersects(&c));
        assert!(!a.overlaps_y(&Aabb::new(Point::new(0.0, 1.5), Point::new(1.0, 2.0))));
    }

    #[test]
    fn growing_with_points_and_disks() {
        let mut aabb = Aabb::new_invalid();
        aabb.take_point(Point::new(1.0, 2.0));
        aabb.take_point(Point::new(-1.0, 4.0));
        assert_eq!(aabb.mins, Point::new(-1.0, 2.0));
        assert_eq!(aabb.maxs, Point::new(1.0, 4.0));
        aabb.take_disk(Point::new(0.0, 0.0), 1.0);
        assert_eq!(aabb.mins, Point::new(-1.0, -1.0));
        assert!(aabb.contains_local_point(&Point::new(1.0, 4.0)));

        let mut merged = Aabb::new_invalid();
        merged.merge(&aabb);
        assert_eq!(merged, aabb);
    }

    #[test]
    fn fattening_keeps_the_center() {
        let aabb = Aabb::new(Point::new(0.0, 0.0), Point::new(2.0, 4.0));
        let fat = aabb.fattened(1.5);
        assert_relative_eq!(fat.mins, Point::new(-0.5, -1.0));
        assert_relative_eq!(fat.maxs, Point::new(2.5, 5.0));
    }
}
