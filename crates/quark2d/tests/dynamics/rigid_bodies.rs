use crate::{ball, zero_gravity_world};
use quark2d::math::{Point, Vector};

#[test]
fn body_at_rest_stays_put() {
    let mut world = zero_gravity_world();
    let h = world.add_body(ball(5.0, Point::new(12.0, -7.0)));
    world.body_mut(h).unwrap().set_rotation(0.3, true);

    for _ in 0..500 {
        world.step();
    }

    let body = world.body(h).unwrap();
    assert_eq!(body.position(), Point::new(12.0, -7.0));
    assert_eq!(body.rotation(), 0.3);
    assert_eq!(body.velocity(), Vector::zeros());
}

#[test]
fn bodies_keep_their_velocity_without_friction() {
    let mut world = zero_gravity_world();
    let mut body = ball(5.0, Point::origin());
    body.air_friction = 0.0;
    body.set_prev_position(Point::new(-1.0, 0.0));
    let h = world.add_body(body);

    for _ in 0..10 {
        world.step();
    }

    assert_relative_eq!(world.body(h).unwrap().position(), Point::new(10.0, 0.0), epsilon = 1.0e-4);
}

#[test]
fn forces_are_consumed_by_one_step() {
    let mut world = zero_gravity_world();
    let mut body = ball(5.0, Point::origin());
    body.air_friction = 1.0;
    let h = world.add_body(body);

    world.body_mut(h).unwrap().add_force(Vector::new(2.0, 0.0));
    world.step();
    assert_relative_eq!(world.body(h).unwrap().position().x, 2.0);
    world.step();
    // Full air friction cancels the velocity left by the force.
    assert_relative_eq!(world.body(h).unwrap().position().x, 2.0);
}
