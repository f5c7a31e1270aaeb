use crate::bounding_volume::Aabb;
use crate::math::Real;

/// A strategy producing candidate pairs of possibly overlapping boxes.
///
/// Implementations must be sound: every pair of intersecting boxes has to be
/// reported. Reporting pairs that do not intersect is allowed.
pub trait BroadPhase {
    /// Pushes to `pairs` the candidate pairs `(i, j)`, with `i < j`, of
    /// indices into `aabbs`.
    ///
    /// Each pair is reported once. Pairs are ordered by their first index,
    /// then by their second index, for boxes already sorted by `mins.x`.
    fn find_pairs(&mut self, aabbs: &[Aabb], pairs: &mut Vec<(usize, usize)>);
}

/// The broad-phase strategy used by a world.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BroadPhaseKind {
    /// Sort the boxes along `x` and sweep them. Run at every solver iteration.
    SweepAndPrune,
    /// Bucket the boxes in a uniform grid. Run once per step.
    SpatialHash {
        /// The side length of a grid cell.
        cell_size: Real,
    },
}

impl Default for BroadPhaseKind {
    fn default() -> Self {
        BroadPhaseKind::SweepAndPrune
    }
}

impl BroadPhaseKind {
    /// Instantiates the matching broad phase.
    pub fn build(&self) -> Box<dyn BroadPhase> {
        match *self {
            BroadPhaseKind::SweepAndPrune => Box::new(super::SweepAndPrune::new()),
            BroadPhaseKind::SpatialHash { cell_size } => {
                Box::new(super::SpatialHash::new(cell_size))
            }
        }
    }
}
