use crate::{ball, zero_gravity_world};
use quark2d::dynamics::{Body, Joint, World, WorldConfig, WorldError};
use quark2d::math::{Point, Vector};
use quark2d::shape::Mesh;

#[test]
fn joint_distance_error_never_grows() {
    let config = WorldConfig::default()
        .with_gravity(Vector::zeros())
        .with_sleeping(false);
    let mut world = World::new(config);
    let a = world.add_body(ball(5.0, Point::new(-25.0, 0.0)));
    let b = world.add_body(ball(5.0, Point::new(25.0, 0.0)));
    let mut joint =
        Joint::new(&world, Some(a), Point::new(-25.0, 0.0), Some(b), Point::new(25.0, 0.0))
            .unwrap();
    joint.distance = 30.0;
    let joint = world.add_joint(joint);

    let error = |world: &World| {
        let (pa, pb) = world.joint(joint).unwrap().global_anchors(world);
        ((pb - pa).norm() - 30.0).abs()
    };

    let mut last = error(&world);
    for _ in 0..100 {
        world.step();
        let current = error(&world);
        assert!(current <= last + 1.0e-3, "{} > {}", current, last);
        last = current;
    }
    assert!(last < 1.0e-2);
}

#[test]
fn pinned_body_hangs_below_its_pin() {
    let mut world = World::new(WorldConfig::default().with_sleeping(false));
    let h = world.add_body(ball(5.0, Point::new(40.0, 0.0)));
    let joint = Joint::to_point(&world, h, Point::new(40.0, 0.0), Point::origin()).unwrap();
    let _ = world.add_joint(joint);

    for _ in 0..2000 {
        world.step();
    }

    let position = world.body(h).unwrap().position();
    assert_relative_eq!(position.coords.norm(), 40.0, epsilon = 0.5);
    assert!(position.y > 35.0, "{:?}", position);
}

#[test]
fn groove_joints_only_pull() {
    let mut world = zero_gravity_world();
    let a = world.add_body(ball(5.0, Point::new(0.0, 0.0)));
    let b = world.add_body(ball(5.0, Point::new(20.0, 0.0)));
    let mut joint =
        Joint::new(&world, Some(a), Point::new(0.0, 0.0), Some(b), Point::new(20.0, 0.0))
            .unwrap();
    joint.distance = 50.0;
    joint.groove = true;
    let _ = world.add_joint(joint);

    world.step();
    assert_eq!(world.body(b).unwrap().position(), Point::new(20.0, 0.0));
}

#[test]
fn joints_only_attach_rigid_bodies() {
    let mut world = zero_gravity_world();
    let soft = world.add_body(Body::soft().with_mesh(Mesh::circle(2.0, Point::origin())));
    assert_eq!(
        Joint::to_point(&world, soft, Point::origin(), Point::new(0.0, -10.0)).unwrap_err(),
        WorldError::NotARigidBody(soft)
    );
}
