/*!
quark2d
========

**quark2d** is a 2-dimensional, particle-based physics engine written with
the rust programming language.

Every body is made of meshes, and every mesh is made of particles. Rigid bodies
move all of their particles with a single transform, soft bodies integrate each
particle on its own and keep their shape with springs, area preservation and
shape matching, and area bodies only report what overlaps them.

All positions use screen coordinates: the `y` axis points down.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)] // TODO: deny this
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Maybe revisit this one later.
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.
#![deny(unused_qualifications)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[cfg(test)]
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod dynamics;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod transformation;
pub mod utils;

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use na::{Point2, UnitComplex, Vector2};

    /// The scalar type used throughout this crate.
    pub type Real = f32;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// Half-extent of the simulated space.
    ///
    /// Used as the "infinite" distance by searches and as the seed of empty
    /// bounding boxes.
    pub const MAX_WORLD_SIZE: Real = 99999.0;

    /// Radius at or below which a particle is treated as a point.
    pub const POINT_PARTICLE_RADIUS: Real = 0.5;

    /// The point type.
    pub use Point2 as Point;

    /// The vector type.
    pub use Vector2 as Vector;

    /// The rotation type.
    pub type Rotation<N> = UnitComplex<N>;
}
