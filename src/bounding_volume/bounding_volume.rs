use crate::math::Real;

/// The box operations shared by bodies, meshes and the broad phase.
///
/// Body and mesh boxes are grown by merging the boxes of their parts, and
/// touching boxes count as overlapping so that resting contacts keep their
/// candidate pair.
pub trait BoundingVolume {
    /// Do these two volumes overlap? Touching volumes do.
    fn intersects(&self, other: &Self) -> bool;

    /// Grows this volume in-place so it also encloses `other`.
    fn merge(&mut self, other: &Self);

    /// Grows this volume by `amount` in every direction.
    fn loosen(&mut self, amount: Real);
}
