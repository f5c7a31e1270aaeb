use crate::{ball, floor};
use quark2d::dynamics::{World, WorldConfig};
use quark2d::math::{Point, Vector};

#[test]
fn dropped_ball_settles_on_the_floor_and_sleeps() {
    let mut world = World::new(WorldConfig::default().with_gravity(Vector::new(0.0, 0.2)));
    let floor = world.add_body(floor());
    let ball = world.add_body(ball(16.0, Point::new(0.0, 10.0)));

    let mut fell_asleep_at = None;
    for i in 0..1000 {
        world.step();
        if fell_asleep_at.is_none() && world.body(ball).unwrap().is_sleeping() {
            fell_asleep_at = Some(i);
        }
    }

    let body = world.body(ball).unwrap();
    assert!(body.is_sleeping());
    assert!(fell_asleep_at.unwrap() >= world.config().sleep_tick as usize);
    assert_relative_eq!(body.position().y, 110.0 - 16.0, epsilon = 1.0);
    assert!(body.velocity().y.abs() < 0.1);

    let contacts = world.get_collisions(floor, ball);
    assert!(contacts.iter().all(|c| c.penetration < 0.5));
}

#[test]
fn still_bodies_fall_asleep() {
    let config = WorldConfig::default()
        .with_gravity(Vector::zeros())
        .with_sleep_tick(10);
    let mut world = World::new(config);
    let h = world.add_body(ball(5.0, Point::origin()));

    for _ in 0..11 {
        world.step();
    }
    assert!(world.body(h).unwrap().is_sleeping());

    world.set_sleeping_enabled(false);
    assert!(!world.body(h).unwrap().is_sleeping());
}

#[test]
fn islands_sleep_and_wake_as_a_whole() {
    let config = WorldConfig::default()
        .with_gravity(Vector::zeros())
        .with_sleep_tick(10);
    let mut world = World::new(config);
    let mut pushed = ball(5.0, Point::new(0.0, 0.0));
    let _ = pushed.events.on_pre_step(|body| body.add_force(Vector::new(0.3, 0.0)));
    let pushed = world.add_body(pushed);
    let idle = world.add_body(ball(5.0, Point::new(9.0, 0.0)));

    for _ in 0..400 {
        world.step();
        let a = world.body(pushed).unwrap();
        let b = world.body(idle).unwrap();
        assert!(!a.is_sleeping());
        if a.aabb().mins.x <= b.aabb().maxs.x && b.aabb().mins.x <= a.aabb().maxs.x {
            assert!(!b.is_sleeping());
        }
    }
}

#[test]
fn static_bodies_do_not_join_islands() {
    let mut world = World::new(WorldConfig::default().with_sleep_tick(10));
    let _ = world.add_body(floor());
    let resting = world.add_body(ball(5.0, Point::new(-100.0, 105.0)));
    let mut rolling = ball(5.0, Point::new(100.0, 105.0));
    let _ = rolling.events.on_pre_step(|body| body.add_force(Vector::new(0.2, 0.0)));
    let rolling = world.add_body(rolling);

    for _ in 0..200 {
        world.step();
    }

    assert!(world.body(resting).unwrap().is_sleeping());
    assert!(!world.body(rolling).unwrap().is_sleeping());
}
