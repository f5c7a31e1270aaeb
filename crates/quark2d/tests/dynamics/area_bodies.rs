use crate::{ball, zero_gravity_world};
use quark2d::dynamics::{Body, BodyHandle};
use quark2d::math::{Point, Vector};
use quark2d::shape::Mesh;
use std::cell::RefCell;
use std::rc::Rc;

fn area() -> Body {
    Body::area().with_mesh(Mesh::rectangle(Vector::new(40.0, 40.0), Point::new(100.0, 0.0)))
}

#[test]
fn bodies_crossing_an_area_enter_then_exit() {
    let mut world = zero_gravity_world();
    let entered = Rc::new(RefCell::new(Vec::<BodyHandle>::new()));
    let exited = Rc::new(RefCell::new(Vec::<BodyHandle>::new()));

    let mut trigger = area();
    let log = entered.clone();
    let _ = trigger.events.on_area_enter(move |body| log.borrow_mut().push(body));
    let log = exited.clone();
    let _ = trigger.events.on_area_exit(move |body| log.borrow_mut().push(body));
    let trigger = world.add_body(trigger);

    let mut moving = ball(5.0, Point::origin());
    moving.air_friction = 0.0;
    moving.set_prev_position(Point::new(-2.0, 0.0));
    let moving = world.add_body(moving);

    let mut was_inside = false;
    for _ in 0..100 {
        world.step();
        let inside = world.body(trigger).unwrap().as_area().unwrap().bodies().contains(&moving);
        was_inside |= inside;
    }

    assert!(was_inside);
    assert_eq!(*entered.borrow(), vec![moving]);
    assert_eq!(*exited.borrow(), vec![moving]);
    assert!(world.body(trigger).unwrap().as_area().unwrap().bodies().is_empty());
    // Areas never push.
    assert_relative_eq!(
        world.body(moving).unwrap().position(),
        Point::new(200.0, 0.0),
        epsilon = 1.0e-3
    );
}

#[test]
fn gravity_free_areas_suspend_gravity() {
    let mut world = quark2d::dynamics::World::default();
    let mut trigger = area();
    trigger.as_area_mut().unwrap().gravity_free = true;
    let trigger = world.add_body(trigger);
    let inside = world.add_body(ball(5.0, Point::new(100.0, 0.0)));

    for _ in 0..5 {
        world.step();
    }

    assert!(world.body(trigger).unwrap().as_area().unwrap().bodies().contains(&inside));
    assert!(world.body(inside).unwrap().ignore_gravity);
    let y = world.body(inside).unwrap().position().y;
    // Only the first step, before the overlap was known, applied gravity.
    assert!(y < 1.5, "{}", y);
}

#[test]
fn removed_bodies_leave_areas() {
    let mut world = zero_gravity_world();
    let trigger = world.add_body(area());
    let inside = world.add_body(ball(5.0, Point::new(100.0, 0.0)));
    world.step();
    assert_eq!(world.body(trigger).unwrap().as_area().unwrap().bodies(), &[inside]);

    let _ = world.remove_body(inside).unwrap();
    assert!(world.body(trigger).unwrap().as_area().unwrap().bodies().is_empty());
}
