use crate::dynamics::{BodyHandle, JointHandle, ParticleId, RaycastHandle, SpringHandle};

/// Errors returned by the mutators of a [`World`](crate::dynamics::World).
///
/// Stepping never fails: these only report handles that do not point to a
/// live object, or objects that cannot play the requested role.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// The body was removed or never inserted.
    #[error("no body is registered under {0:?}.")]
    UnknownBody(BodyHandle),
    /// The joint was removed or never inserted.
    #[error("no joint is registered under {0:?}.")]
    UnknownJoint(JointHandle),
    /// The spring was removed or never inserted.
    #[error("no spring is registered under {0:?}.")]
    UnknownSpring(SpringHandle),
    /// The raycast was removed or never inserted.
    #[error("no raycast is registered under {0:?}.")]
    UnknownRaycast(RaycastHandle),
    /// The mesh or particle index is out of range for its body.
    #[error("the particle {0:?} does not exist.")]
    UnknownParticle(ParticleId),
    /// Joints only act on rigid bodies.
    #[error("the body {0:?} is not a rigid body.")]
    NotARigidBody(BodyHandle),
}
