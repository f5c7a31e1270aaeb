use quark2d::dynamics::BodyHandle;
use quark2d::math::{Point, Real, Vector};
use quark2d::query::details::contact_polygon_polygon;
use quark2d::query::{Contact, ParticleGroup};
use quark2d::shape::Mesh;

fn collide(a: &Mesh, b: &Mesh) -> Vec<Contact> {
    let g1 = ParticleGroup::polygon(BodyHandle::from_raw(0), 0, a);
    let g2 = ParticleGroup::polygon(BodyHandle::from_raw(1), 0, b);
    let mut out = Vec::new();
    contact_polygon_polygon(&g1, &g2, &mut out);
    out
}

#[test]
fn disjoint_boxes_have_no_contact() {
    let a = Mesh::rectangle(Vector::new(4.0, 2.0), Point::origin());
    for offset in [3.1, 4.0, 10.0] {
        let b = Mesh::rectangle(Vector::new(2.0, 2.0), Point::new(offset, 0.0));
        assert!(collide(&a, &b).is_empty(), "offset {}", offset);
    }
}

#[test]
fn penetration_matches_overlap() {
    let a = Mesh::rectangle(Vector::new(4.0, 2.0), Point::origin());

    for eps in [0.05 as Real, 0.25, 0.5] {
        let b = Mesh::rectangle(Vector::new(2.0, 2.0), Point::new(3.0 - eps, 0.0));
        let out = collide(&a, &b);
        assert!(!out.is_empty());

        for contact in &out {
            assert_relative_eq!(contact.penetration, eps, epsilon = 1.0e-4);
            assert_relative_eq!(contact.normal, Vector::new(1.0, 0.0), epsilon = 1.0e-4);
            assert_eq!(contact.particle.body, BodyHandle::from_raw(1));
            assert_eq!(contact.reference_body(), BodyHandle::from_raw(0));
        }
    }
}

#[test]
fn rotated_overlap_is_detected() {
    let a = Mesh::rectangle(Vector::new(4.0, 4.0), Point::origin());
    let mut b = Mesh::regular_polygon(1.5, 4, Point::origin(), -1);
    b.update_transform(&Point::new(3.0, 0.0), 0.0, true);
    // The diamond's left corner reaches x = 1.5, 0.5 inside the box.
    let out = collide(&a, &b);
    assert!(!out.is_empty());
    assert!(out.iter().any(|c| (c.penetration - 0.5).abs() < 1.0e-3));
}
