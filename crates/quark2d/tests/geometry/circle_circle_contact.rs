use quark2d::dynamics::BodyHandle;
use quark2d::math::{Point, Real, Vector};
use quark2d::query::details::contact_circles_circles;
use quark2d::query::ParticleGroup;
use quark2d::shape::Mesh;

#[test]
fn penetration_is_exact_for_random_placements() {
    let mut rng = oorandom::Rand32::new(1234);

    for _ in 0..200 {
        let (r1, r2) = (0.5 + rng.rand_float() * 10.0, 0.5 + rng.rand_float() * 10.0);
        let distance = 0.01 + rng.rand_float() * (r1 + r2 - 0.02);
        let angle = rng.rand_float() * core::f32::consts::TAU;
        let dir = Vector::new(angle.cos(), angle.sin());
        let c1 = Point::new(rng.rand_float() * 100.0, rng.rand_float() * 100.0);

        let m1 = Mesh::circle(r1, c1);
        let m2 = Mesh::circle(r2, c1 + dir * distance);
        let g1 = ParticleGroup::all(BodyHandle::from_raw(0), 0, &m1);
        let g2 = ParticleGroup::all(BodyHandle::from_raw(1), 0, &m2);

        let mut out = Vec::new();
        contact_circles_circles(&g1, &g2, &g2.aabb(), None, false, &mut out);

        assert_eq!(out.len(), 1);
        let expected: Real = r1 + r2 - distance;
        assert_relative_eq!(out[0].penetration, expected, epsilon = 1.0e-3);
        assert_relative_eq!(out[0].normal, dir, epsilon = 1.0e-3);
    }
}

#[test]
fn touching_circles_do_not_collide() {
    let m1 = Mesh::circle(2.0, Point::new(0.0, 0.0));
    let m2 = Mesh::circle(3.0, Point::new(5.5, 0.0));
    let g1 = ParticleGroup::all(BodyHandle::from_raw(0), 0, &m1);
    let g2 = ParticleGroup::all(BodyHandle::from_raw(1), 0, &m2);

    let mut out = Vec::new();
    contact_circles_circles(&g1, &g2, &g2.aabb(), None, false, &mut out);
    assert!(out.is_empty());
}
