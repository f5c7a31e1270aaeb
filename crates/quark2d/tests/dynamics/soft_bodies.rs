use quark2d::dynamics::{Body, ParticleId, World, WorldConfig};
use quark2d::math::{Point, Vector};
use quark2d::shape::{CollisionBehavior, Mesh, Particle, Spring};

fn world() -> World {
    World::new(WorldConfig::default().with_gravity(Vector::zeros()).with_sleeping(false))
}

fn squeeze(body: &mut Body, rate: f32) {
    for mesh in body.meshes_mut() {
        for particle in mesh.particles_mut() {
            particle.position = Point::from(particle.position.coords * rate);
            particle.prev_position = particle.position;
        }
    }
}

#[test]
fn squeezed_ring_recovers_its_area() {
    let mut world = world();
    let mut ring = Body::soft().with_mesh(Mesh::regular_polygon(30.0, 16, Point::origin(), -1));
    ring.set_area_preserving_enabled(true);
    let target = ring.as_soft().unwrap().target_preservation_area;
    assert_relative_eq!(target, ring.total_initial_polygons_area());

    squeeze(&mut ring, 0.7);
    assert!(ring.total_polygons_area() < target * 0.6);
    let ring = world.add_body(ring);

    for _ in 0..600 {
        world.step();
    }

    let area = world.body(ring).unwrap().total_polygons_area();
    assert!((area - target).abs() < target * 0.1, "area {} target {}", area, target);
}

#[test]
fn soft_bodies_fall_and_stop_on_the_floor() {
    let mut world = World::new(WorldConfig::default());
    let _ = world.add_body(crate::floor());
    let ring = Mesh::regular_polygon(20.0, 12, Point::new(0.0, 50.0), 0);
    let ring = world.add_body(Body::soft().with_mesh(ring));

    for _ in 0..600 {
        world.step();
    }

    let body = world.body(ring).unwrap();
    assert!(body.aabb().maxs.y < 112.0, "{:?}", body.aabb());
    assert!(body.aabb().maxs.y > 100.0, "{:?}", body.aabb());
}

#[test]
fn world_springs_pull_particles_together() {
    let mut world = world();
    let a = world.add_body(Body::soft().with_mesh(Mesh::circle(2.0, Point::new(0.0, 0.0))));
    let b = world.add_body(Body::soft().with_mesh(Mesh::circle(2.0, Point::new(10.0, 0.0))));
    let spring = world
        .add_spring_between(ParticleId::new(a, 0, 0), ParticleId::new(b, 0, 0), false)
        .unwrap();
    world.spring_mut(spring).unwrap().length = 6.0;

    world.step();

    let pa = world.particle(ParticleId::new(a, 0, 0)).unwrap().position;
    let pb = world.particle(ParticleId::new(b, 0, 0)).unwrap().position;
    assert!((pb - pa).norm() < 10.0);
    assert!((pb - pa).norm() >= 6.0 - 1.0e-3);
}

/// Two rows of disks folded on top of each other, with springs along each row.
fn folded_strip(origin: Point<f32>) -> Body {
    let mut mesh = Mesh::new();
    for y in [0.0, 2.0] {
        for x in [0.0, 6.0, 12.0] {
            let _ = mesh.add_particle(Particle::new(origin + Vector::new(x, y), 3.0));
        }
    }
    for (a, b) in [(0, 1), (1, 2), (3, 4), (4, 5)] {
        let spring = Spring::new(mesh.particles(), a, b, false);
        mesh.add_spring(spring).unwrap();
    }
    Body::soft().with_mesh(mesh)
}

fn particle_positions(body: &Body) -> Vec<Point<f32>> {
    body.meshes()
        .iter()
        .flat_map(|m| m.particles())
        .map(|p| p.position)
        .collect()
}

#[test]
fn self_collisions_unfold_overlapping_particles() {
    let mut world = world();
    let still = world.add_body(folded_strip(Point::new(200.0, 0.0)));
    let mut strip = folded_strip(Point::origin());
    strip.as_soft_mut().unwrap().self_collisions = true;
    let strip = world.add_body(strip);

    for _ in 0..100 {
        world.step();
    }

    let still = particle_positions(world.body(still).unwrap());
    assert_relative_eq!((still[3] - still[0]).norm(), 2.0, epsilon = 1.0e-4);

    let positions = particle_positions(world.body(strip).unwrap());
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            assert!((b - a).norm() >= 6.0 - 1.0e-3, "{:?} {:?}", a, b);
        }
    }
}

/// A soft square boundary with a disk trapped inside, near its right side.
fn boundary_with_disk(center: Point<f32>, self_collisions: bool) -> Body {
    let mut body = Body::soft()
        .with_mesh(Mesh::rectangle(Vector::new(40.0, 40.0), center))
        .with_mesh(Mesh::circle(1.0, center + Vector::new(15.0, 0.0)));
    body.set_area_preserving_enabled(true);
    body.as_soft_mut().unwrap().self_collisions = self_collisions;
    body
}

#[test]
fn self_collisions_push_disks_out_of_the_boundary() {
    let mut world = world();
    let body = boundary_with_disk(Point::origin(), true);
    assert_eq!(body.meshes()[0].collision_behavior(), CollisionBehavior::Polyline);
    assert_eq!(body.meshes()[1].collision_behavior(), CollisionBehavior::Circles);
    let body = world.add_body(body);
    let trapped = world.add_body(boundary_with_disk(Point::new(200.0, 0.0), false));

    for _ in 0..300 {
        world.step();
    }

    let disk = |h| world.body(h).unwrap().meshes()[1].particles()[0].position;
    let right_side = |h| {
        world.body(h).unwrap().meshes()[0]
            .particles()
            .iter()
            .map(|p| p.position.x)
            .fold(f32::MIN, f32::max)
    };

    assert_relative_eq!(disk(trapped), Point::new(215.0, 0.0), epsilon = 1.0e-3);
    assert!(disk(body).x > right_side(body), "{:?}", disk(body));
}
