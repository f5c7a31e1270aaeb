//! Particles, meshes and the constraints living inside them.

pub use self::angle_constraint::{corner_angle, AngleConstraint};
pub use self::mesh::{CollisionBehavior, Mesh, MeshOptions};
pub use self::mesh_data::{MeshData, MeshDataError};
pub use self::particle::{segment_force_split, Particle};
pub use self::spring::Spring;

mod angle_constraint;
mod mesh;
mod mesh_data;
mod particle;
mod spring;
