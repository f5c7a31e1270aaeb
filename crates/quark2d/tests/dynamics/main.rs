#[macro_use]
extern crate approx;

mod area_bodies;
mod collision_events;
mod joints;
mod meshes;
mod rigid_bodies;
mod sleeping;
mod soft_bodies;

use quark2d::dynamics::{Body, BodyMode, World, WorldConfig};
use quark2d::math::{Point, Vector};
use quark2d::shape::Mesh;

pub fn zero_gravity_world() -> World {
    World::new(WorldConfig::default().with_gravity(Vector::zeros()))
}

/// A static 400x20 floor whose top side is at `y = 110`.
pub fn floor() -> Body {
    Body::rigid()
        .with_mesh(Mesh::rectangle(Vector::new(400.0, 20.0), Point::new(0.0, 120.0)))
        .with_mode(BodyMode::Static)
}

pub fn ball(radius: f32, center: Point<f32>) -> Body {
    Body::rigid().with_mesh(Mesh::circle(radius, center))
}
