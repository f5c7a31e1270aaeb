//! Broad phases: coarse culling of the body pairs handed to the narrow phase.

pub use self::broad_phase::{BroadPhase, BroadPhaseKind};
pub use self::spatial_hash::SpatialHash;
pub use self::sweep_and_prune::SweepAndPrune;

mod broad_phase;
mod spatial_hash;
mod sweep_and_prune;
