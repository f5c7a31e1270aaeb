use crate::{ball, floor};
use quark2d::dynamics::World;
use quark2d::math::Point;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn vetoed_collisions_are_not_solved() {
    let mut world = World::default();
    let _ = world.add_body(floor());
    let calls = Rc::new(Cell::new(0));

    let mut ghost = ball(5.0, Point::new(0.0, 80.0));
    let counter = calls.clone();
    let _ = ghost.events.on_collision(move |_| {
        counter.set(counter.get() + 1);
        false
    });
    let ghost = world.add_body(ghost);

    for _ in 0..200 {
        world.step();
    }

    assert!(calls.get() > 0);
    assert!(world.body(ghost).unwrap().position().y > 140.0);
}

#[test]
fn both_sides_are_notified() {
    let mut world = World::default();
    let seen_by_floor = Rc::new(Cell::new(false));
    let mut static_floor = floor();
    let seen = seen_by_floor.clone();
    let _ = static_floor.events.on_collision(move |info| {
        seen.set(info.penetration >= 0.0);
        true
    });
    let _ = world.add_body(static_floor);
    let h = world.add_body(ball(5.0, Point::new(0.0, 100.0)));

    for _ in 0..100 {
        world.step();
    }

    assert!(seen_by_floor.get());
    assert!(world.body(h).unwrap().position().y < 106.0);
}

#[test]
fn exceptions_disable_collisions() {
    let mut world = World::default();
    let f = world.add_body(floor());
    let h = world.add_body(ball(5.0, Point::new(0.0, 100.0)));
    world.add_collision_exception(h, f);

    for _ in 0..100 {
        world.step();
    }
    assert!(world.body(h).unwrap().position().y > 140.0);

    world.remove_matching_collision_exceptions(h);
    assert!(!world.has_collision_exception(f, h));
}
