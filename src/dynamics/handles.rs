//! Typed handles to the objects owned by a [`World`](crate::dynamics::World).

/// The handle of a body inserted into a world.
///
/// Handles stay valid until the body is removed. A handle of a removed body
/// may be reused by a body inserted later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    /// The raw index of this handle in the body arena.
    pub fn into_raw(self) -> usize {
        self.0
    }

    /// Builds a handle from a raw index. The handle is only meaningful if the
    /// index came from [`BodyHandle::into_raw`].
    pub fn from_raw(index: usize) -> Self {
        Self(index)
    }
}

/// The handle of a joint inserted into a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JointHandle(pub(crate) usize);

/// The handle of a world-level spring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SpringHandle(pub(crate) usize);

/// The handle of a persistent raycast.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RaycastHandle(pub(crate) usize);

/// Identifies one particle of one mesh of one body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ParticleId {
    /// The body owning the mesh.
    pub body: BodyHandle,
    /// The index of the mesh in its body.
    pub mesh: usize,
    /// The index of the particle in its mesh.
    pub index: usize,
}

impl ParticleId {
    /// Identifies the `index`-th particle of the `mesh`-th mesh of `body`.
    pub fn new(body: BodyHandle, mesh: usize, index: usize) -> Self {
        Self { body, mesh, index }
    }
}
