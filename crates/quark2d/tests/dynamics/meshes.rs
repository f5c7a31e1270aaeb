use quark2d::dynamics::Body;
use quark2d::math::{Point, Vector};
use quark2d::shape::Mesh;

fn assert_same_box(body: &Body, mins: Point<f32>, maxs: Point<f32>) {
    assert_relative_eq!(body.aabb().mins, mins, epsilon = 1.0e-5);
    assert_relative_eq!(body.aabb().maxs, maxs, epsilon = 1.0e-5);
}

#[test]
fn removing_then_adding_a_mesh_restores_the_body() {
    let mut body = Body::rigid()
        .with_position(Point::new(50.0, 20.0))
        .with_mesh(Mesh::rectangle(Vector::new(20.0, 10.0), Point::origin()));
    let (mins, maxs) = (body.aabb().mins, body.aabb().maxs);
    let area = body.total_area();

    let extra = body.add_mesh(Mesh::circle(3.0, Point::new(30.0, 0.0)));
    assert!(body.aabb().maxs.x > maxs.x);
    assert!(body.total_area() > area);

    let _ = body.remove_mesh_at(extra).unwrap();
    assert_same_box(&body, mins, maxs);
    assert_relative_eq!(body.total_area(), area);

    let _ = body.remove_mesh_at(0).unwrap();
    assert!(body.meshes().is_empty());
    let _ = body.add_mesh(Mesh::rectangle(Vector::new(20.0, 10.0), Point::origin()));
    assert_same_box(&body, mins, maxs);
    assert_relative_eq!(body.total_area(), area);
}

#[test]
fn removing_out_of_range_meshes_fails() {
    let mut body = Body::soft().with_mesh(Mesh::circle(3.0, Point::origin()));
    assert!(body.remove_mesh_at(1).is_none());
    assert_eq!(body.meshes().len(), 1);
}
