use quark2d::dynamics::{Body, BodyMode, Raycast, World, WorldConfig};
use quark2d::math::{Point, Vector};
use quark2d::shape::Mesh;

fn world() -> World {
    World::new(WorldConfig::default().with_gravity(Vector::zeros()))
}

#[test]
fn hits_are_sorted_by_distance() {
    let mut world = world();
    let far = world.add_body(
        Body::rigid()
            .with_mesh(Mesh::rectangle(Vector::new(10.0, 10.0), Point::new(100.0, 0.0)))
            .with_mode(BodyMode::Static),
    );
    let near = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(40.0, 0.0))));

    let hits = world.raycast_to(Point::origin(), Vector::new(200.0, 0.0), 1, false);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].body, near);
    assert_eq!(hits[1].body, far);
    assert_relative_eq!(hits[0].position, Point::new(35.0, 0.0), epsilon = 1.0e-3);
    assert_relative_eq!(hits[0].normal, Vector::new(-1.0, 0.0), epsilon = 1.0e-3);
    assert_relative_eq!(hits[1].position.x, 95.0, epsilon = 1.0e-3);
}

#[test]
fn layers_and_length_limit_hits() {
    let mut world = world();
    let mut ball = Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(40.0, 0.0)));
    ball.layers_bit = 2;
    let _ = world.add_body(ball);

    assert!(world.raycast_to(Point::origin(), Vector::new(200.0, 0.0), 1, false).is_empty());
    assert_eq!(world.raycast_to(Point::origin(), Vector::new(200.0, 0.0), 2, false).len(), 1);
    assert!(world.raycast_to(Point::origin(), Vector::new(20.0, 0.0), 2, false).is_empty());
}

#[test]
fn origin_inside_a_body() {
    let mut world = world();
    let ball = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::origin())));

    let hits = world.raycast_to(Point::origin(), Vector::new(20.0, 0.0), 1, true);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].body, ball);
    assert_relative_eq!(hits[0].position, Point::origin());
}

#[test]
fn soft_polylines_are_not_hit() {
    let mut world = world();
    let ring = Mesh::regular_polygon(10.0, 12, Point::new(50.0, 0.0), -1);
    let _ = world.add_body(Body::soft().with_mesh(ring));
    assert!(world.raycast_to(Point::origin(), Vector::new(200.0, 0.0), 1, false).is_empty());
}

#[test]
fn persistent_raycasts_refresh_after_each_step() {
    let mut world = world();
    let ball = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(40.0, 0.0))));
    let ray = world.add_raycast(Raycast::new(Point::origin(), Vector::new(100.0, 0.0), false));
    assert!(world.raycast(ray).unwrap().contacts().is_empty());

    world.step();
    assert_eq!(world.raycast(ray).unwrap().contacts()[0].body, ball);

    world.raycast_mut(ray).unwrap().set_rotation(core::f32::consts::FRAC_PI_2);
    world.step();
    assert!(world.raycast(ray).unwrap().contacts().is_empty());
}
