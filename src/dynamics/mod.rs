//! Bodies, constraints, and the world stepping them.

pub use self::area_body::AreaBody;
pub use self::body::{Body, BodyKind, BodyMode, SimulationModel};
pub use self::error::WorldError;
pub use self::events::{BodyEvents, CollisionInfo};
pub use self::handles::{BodyHandle, JointHandle, ParticleId, RaycastHandle, SpringHandle};
pub use self::joint::Joint;
pub use self::manifold::Manifold;
pub use self::raycast::{Raycast, RaycastContact};
pub use self::rigid_body::RigidBody;
pub use self::soft_body::SoftBody;
pub use self::world::World;
pub use self::world_config::WorldConfig;

/// A spring between two particles of possibly different bodies.
pub type WorldSpring = crate::shape::Spring<ParticleId>;

mod area_body;
mod body;
mod error;
mod events;
mod handles;
mod island;
mod joint;
mod manifold;
mod raycast;
mod rigid_body;
mod soft_body;
mod world;
mod world_config;
