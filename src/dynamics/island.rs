use crate::bounding_volume::BoundingVolume;
use crate::dynamics::{Body, BodyHandle, World};
use crate::math::Real;
use hashbrown::HashSet;

impl World {
    /// Groups the moving bodies into islands of overlapping boxes, then puts
    /// to sleep the islands that stayed still long enough and wakes the others.
    ///
    /// Islands sleep and wake as a whole, so an awake body never rests against
    /// a sleeping one.
    pub(crate) fn update_islands(&mut self) {
        if !self.config.sleeping {
            return;
        }

        for island in self.generate_islands() {
            let needs_waking = island.iter().any(|h| {
                self.bodies[h.0].is_moving(
                    self.config.sleeping_position_tolerance,
                    self.config.sleeping_rotation_tolerance,
                )
            });

            if needs_waking {
                for h in &island {
                    self.bodies[h.0].wake_up();
                }
                continue;
            }

            let mut can_sleep = true;
            for h in &island {
                let body = &mut self.bodies[h.0];
                body.still_ticks = body.still_ticks.saturating_add(1);
                can_sleep &= body.can_sleep && body.still_ticks >= self.config.sleep_tick;
            }

            if can_sleep {
                for h in &island {
                    self.bodies[h.0].fall_asleep();
                }
            }
        }
    }

    /// The connected components of the overlap graph of enabled, non-static
    /// bodies, in body order.
    ///
    /// Bodies kept apart by a collision exception are not linked.
    pub(crate) fn generate_islands(&self) -> Vec<Vec<BodyHandle>> {
        let candidates: Vec<BodyHandle> = self
            .order
            .iter()
            .copied()
            .filter(|h| {
                let body = &self.bodies[h.0];
                body.enabled && !body.is_static()
            })
            .collect();

        let mut visited = HashSet::new();
        let mut islands = Vec::new();

        for start in &candidates {
            if !visited.insert(*start) {
                continue;
            }

            let mut island = Vec::new();
            let mut stack = vec![*start];
            while let Some(current) = stack.pop() {
                island.push(current);
                let body = &self.bodies[current.0];
                for other in &candidates {
                    if visited.contains(other) {
                        continue;
                    }
                    let other_body = &self.bodies[other.0];
                    if body.aabb().intersects(other_body.aabb())
                        && Body::can_collide(body, other_body)
                        && !self.has_collision_exception(current, *other)
                    {
                        let _ = visited.insert(*other);
                        stack.push(*other);
                    }
                }
            }
            islands.push(island);
        }

        islands
    }
}

impl Body {
    /// Did this body move more than the tolerances during the last step?
    fn is_moving(&self, position_tolerance: Real, rotation_tolerance: Real) -> bool {
        if self.is_soft() {
            return self.meshes.iter().flat_map(|m| m.particles()).any(|p| {
                let v = p.velocity();
                v.x.abs() > position_tolerance || v.y.abs() > position_tolerance
            });
        }

        let v = self.velocity();
        v.x.abs() > position_tolerance
            || v.y.abs() > position_tolerance
            || self.angular_velocity().abs() > rotation_tolerance
    }

    fn fall_asleep(&mut self) {
        self.sleeping = true;
        if self.is_soft() {
            for mesh in &mut self.meshes {
                for particle in mesh.particles_mut() {
                    particle.prev_position = particle.position;
                }
            }
        } else {
            self.prev_position = self.position;
            self.prev_rotation = self.rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dynamics::{Body, BodyMode, World, WorldConfig};
    use crate::math::{Point, Vector};
    use crate::shape::Mesh;

    #[test]
    fn static_bodies_split_islands() {
        let mut world = World::new(WorldConfig::default());
        let floor = Body::rigid()
            .with_mesh(Mesh::rectangle(Vector::new(100.0, 10.0), Point::origin()))
            .with_mode(BodyMode::Static);
        let _ = world.add_body(floor);
        let a = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(-20.0, -6.0))));
        let b = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(20.0, -6.0))));
        let c = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(28.0, -6.0))));

        let islands = world.generate_islands();
        assert_eq!(islands.len(), 2);
        assert!(islands.contains(&vec![a]));
        assert!(islands.iter().any(|i| i.len() == 2 && i.contains(&b) && i.contains(&c)));
    }

    #[test]
    fn collision_exceptions_split_islands() {
        let mut world = World::new(WorldConfig::default());
        let a = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(0.0, 0.0))));
        let b = world.add_body(Body::rigid().with_mesh(Mesh::circle(5.0, Point::new(8.0, 0.0))));
        assert_eq!(world.generate_islands().len(), 1);

        world.add_collision_exception(a, b);
        let islands = world.generate_islands();
        assert_eq!(islands.len(), 2);
        assert!(islands.contains(&vec![a]));
        assert!(islands.contains(&vec![b]));
    }
}
