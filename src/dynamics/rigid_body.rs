use crate::dynamics::body::StepContext;
use crate::dynamics::{Body, BodyKind};
use crate::math::{Point, Real, Vector};

/// Implicit velocities smaller than this, per axis, are dropped.
const REST_VELOCITY: Real = 0.01;

/// The state specific to rigid bodies.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// Forces never rotate the body.
    pub fixed_rotation: bool,
}

impl Body {
    pub(crate) fn update_rigid(&mut self, ctx: &StepContext) {
        if self.is_static() || self.sleeping {
            return;
        }

        let time_scale = self.effective_time_scale(ctx);

        let mut velocity = self.position - self.prev_position;
        self.prev_position = self.position;
        if velocity.x.abs() < REST_VELOCITY {
            velocity.x = 0.0;
        }
        if velocity.y.abs() < REST_VELOCITY {
            velocity.y = 0.0;
        }

        if self.velocity_limit > 0.0 {
            let speed = velocity.norm();
            if speed > self.velocity_limit {
                velocity *= self.velocity_limit / speed;
            }
        }

        let angular_velocity = self.rotation - self.prev_rotation;
        self.prev_rotation = self.rotation;

        if !self.is_kinematic && self.integrated_velocities {
            self.position += velocity - velocity * self.air_friction;
            if !self.ignore_gravity {
                self.position += self.effective_gravity(ctx) * time_scale;
            }
            self.rotation += angular_velocity - angular_velocity * self.air_friction;
        }

        self.position += self.force;
        self.force = Vector::zeros();
        self.rotation += self.angular_force;
        self.angular_force = 0.0;

        self.update_mesh_transforms();
        self.update_aabb();
    }

    fn fixed_rotation(&self) -> bool {
        matches!(
            self.kind,
            BodyKind::Rigid(RigidBody {
                fixed_rotation: true
            })
        )
    }

    /// Moves the body by `force`, applied at the offset `r` from its position.
    ///
    /// The offset turns part of the force into rotation, unless the rotation is
    /// fixed. Static and disabled bodies are left untouched. With
    /// `update_transforms`, the meshes follow immediately.
    pub fn apply_force(&mut self, force: Vector<Real>, r: Vector<Real>, update_transforms: bool) {
        if self.is_static() || !self.enabled {
            return;
        }

        self.position += force;
        if !self.fixed_rotation() {
            self.rotation += r.perp(&force) / self.inertia();
        }

        if update_transforms {
            self.update_mesh_transforms();
        }
    }

    /// Changes the implicit velocity by `impulse`, applied at the offset `r`.
    pub fn apply_impulse(&mut self, impulse: Vector<Real>, r: Vector<Real>) {
        self.prev_position -= impulse;
        if !self.fixed_rotation() {
            self.prev_rotation -= r.perp(&impulse) / self.inertia();
        }
    }

    /// Converts a world-space point into the local frame of this body.
    pub fn to_local_point(&self, point: &Point<Real>) -> Point<Real> {
        Point::from(crate::utils::rotated(&(point - self.position), -self.rotation))
    }

    /// Converts a local point of this body into world space.
    pub fn to_world_point(&self, point: &Point<Real>) -> Point<Real> {
        self.position + crate::utils::rotated(&point.coords, self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use crate::dynamics::body::StepContext;
    use crate::dynamics::{Body, BodyMode};
    use crate::math::{Point, Vector};
    use crate::shape::Mesh;

    fn ctx() -> StepContext {
        StepContext {
            gravity: Vector::new(0.0, 0.2),
            time_scale: 1.0,
        }
    }

    #[test]
    fn gravity_accumulates_into_velocity() {
        let mut body = Body::rigid().with_mesh(Mesh::circle(5.0, Point::origin()));
        body.air_friction = 0.0;
        body.update_rigid(&ctx());
        assert_relative_eq!(body.position(), Point::new(0.0, 0.2));
        // The first velocity is below the rest threshold.
        body.update_rigid(&ctx());
        assert_relative_eq!(body.position(), Point::new(0.0, 0.6));
        assert_relative_eq!(body.meshes()[0].particles()[0].position, Point::new(0.0, 0.6));
    }

    #[test]
    fn static_and_kinematic_bodies_ignore_gravity() {
        let mut floor = Body::rigid().with_mode(BodyMode::Static);
        floor.update_rigid(&ctx());
        assert_eq!(floor.position(), Point::origin());

        let mut platform = Body::rigid();
        platform.is_kinematic = true;
        platform.set_force(Vector::new(1.0, 0.0));
        platform.update_rigid(&ctx());
        assert_eq!(platform.position(), Point::new(1.0, 0.0));
        platform.update_rigid(&ctx());
        assert_eq!(platform.position(), Point::new(1.0, 0.0));
    }

    #[test]
    fn off_center_force_rotates() {
        let mut body =
            Body::rigid().with_mesh(Mesh::rectangle(Vector::new(2.0, 2.0), Point::origin()));
        body.apply_force(Vector::new(0.0, 1.0), Vector::new(1.0, 0.0), true);
        assert_relative_eq!(body.position(), Point::new(0.0, 1.0));
        assert_relative_eq!(body.rotation(), 1.0 / body.inertia());

        body.as_rigid_mut().unwrap().fixed_rotation = true;
        let rotation = body.rotation();
        body.apply_force(Vector::new(0.0, 1.0), Vector::new(1.0, 0.0), true);
        assert_eq!(body.rotation(), rotation);
    }

    #[test]
    fn impulses_change_velocity_only() {
        let mut body = Body::rigid();
        body.apply_impulse(Vector::new(2.0, 0.0), Vector::zeros());
        assert_eq!(body.position(), Point::origin());
        assert_relative_eq!(body.velocity(), Vector::new(2.0, 0.0));
    }

    #[test]
    fn local_points_round_trip() {
        let mut body = Body::rigid();
        body.set_position(Point::new(3.0, 4.0), true);
        body.set_rotation(0.7, true);
        let p = Point::new(-1.0, 2.0);
        assert_relative_eq!(body.to_world_point(&body.to_local_point(&p)), p, epsilon = 1.0e-5);
    }
}
