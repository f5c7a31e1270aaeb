use crate::dynamics::body::StepContext;
use crate::dynamics::{Body, BodyKind};
use crate::math::{Point, Real, Vector};
use crate::shape::{CollisionBehavior, Mesh};
use crate::utils::{perpendicular, rotated, safe_normalize, segments_cross};

/// The state specific to soft bodies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SoftBody {
    /// The stiffness of the mesh springs.
    pub rigidity: Real,
    /// Internal particles are not integrated, and internal springs only push.
    pub passivation_of_internal_springs: bool,
    /// The fraction of the target area the pressure aims for.
    pub area_preserving_rate: Real,
    /// Scales the pressure keeping the area.
    pub area_preserving_rigidity: Real,
    /// The area kept by area preservation.
    pub target_preservation_area: Real,
    /// Lets the particles of this body collide with each other.
    pub self_collisions: bool,
    /// Replaces the particle radii in particle-particle self collisions.
    pub self_collisions_specified_radius: Option<Real>,
    /// Pulls the particles toward their rest shape.
    pub shape_matching: bool,
    /// The strength of shape matching.
    pub shape_matching_rate: Real,
    /// Whether shape matching also pulls internal particles.
    pub shape_matching_internals: bool,
    /// Match the rest shape at a fixed pose instead of the best-fit one.
    pub shape_matching_fixed_transform: Option<(Point<Real>, Real)>,
    /// Replaces the body mass in the gravity applied to each particle.
    pub particle_mass: Option<Real>,
    area_preserving: bool,
    area_stable: bool,
}

impl Default for SoftBody {
    fn default() -> Self {
        Self {
            rigidity: 1.0,
            passivation_of_internal_springs: false,
            area_preserving_rate: 0.8,
            area_preserving_rigidity: 1.0,
            target_preservation_area: 0.0,
            self_collisions: false,
            self_collisions_specified_radius: None,
            shape_matching: false,
            shape_matching_rate: 0.4,
            shape_matching_internals: true,
            shape_matching_fixed_transform: None,
            particle_mass: None,
            area_preserving: false,
            area_stable: false,
        }
    }
}

impl SoftBody {
    /// Is area preservation enabled?
    pub fn area_preserving(&self) -> bool {
        self.area_preserving
    }
}

impl Body {
    /// Enables area preservation. The target area becomes the rest area of the
    /// polygons.
    pub fn set_area_preserving_enabled(&mut self, enabled: bool) {
        let target = self.total_initial_polygons_area();
        if let BodyKind::Soft(soft) = &mut self.kind {
            soft.area_preserving = enabled;
            if enabled {
                soft.target_preservation_area = target;
            }
        }
    }

    pub(crate) fn update_soft(&mut self, ctx: &StepContext) {
        if self.is_static() || self.sleeping {
            return;
        }

        let time_scale = self.effective_time_scale(ctx);
        let gravity = self.effective_gravity(ctx) * self.mass() * time_scale;
        let air_friction = self.air_friction;
        let ignore_gravity = self.ignore_gravity;

        let BodyKind::Soft(soft) = &mut self.kind else {
            return;
        };

        for mesh in &mut self.meshes {
            for particle in mesh.particles_mut() {
                if soft.passivation_of_internal_springs && particle.internal {
                    continue;
                }

                let velocity = particle.velocity();
                particle.prev_position = particle.position;
                particle.apply_force(velocity - velocity * air_friction);
                if !ignore_gravity && !particle.ignore_gravity {
                    particle.apply_force(gravity);
                }
                let force = core::mem::replace(&mut particle.force, Vector::zeros());
                particle.apply_force(force);
            }
        }

        if soft.area_preserving {
            let circumference = self.meshes.iter().map(Mesh::circumference).sum();
            for mesh in &mut self.meshes {
                preserve_area(soft, mesh, circumference, time_scale);
            }
        }

        self.update_aabb();
    }

    /// Pulls the particles toward their rest shape.
    pub(crate) fn apply_shape_matching(&mut self, ctx: &StepContext) {
        let time_scale = self.effective_time_scale(ctx);
        let BodyKind::Soft(soft) = &self.kind else {
            return;
        };

        for mesh in &mut self.meshes {
            let indices = shape_matching_indices(soft, mesh);
            match_shape(
                mesh,
                &indices,
                soft.shape_matching_fixed_transform,
                soft.shape_matching_rate,
                time_scale,
            );
        }
    }

    /// Solves the springs and angle constraints of every mesh.
    ///
    /// A polygon that crossed itself cannot be untangled by its corner
    /// constraints, so it is pulled back to its rest shape instead.
    pub(crate) fn update_mesh_constraints(&mut self, ctx: &StepContext) {
        let time_scale = self.effective_time_scale(ctx);
        let BodyKind::Soft(soft) = &self.kind else {
            return;
        };
        let rigidity = soft.rigidity * time_scale;

        for mesh in &mut self.meshes {
            let (particles, springs) = mesh.springs_and_particles_mut();
            let passive = soft.passivation_of_internal_springs;
            for spring in springs {
                let (a, b) = (spring.a, spring.b);
                let solved = spring.solve(&particles[a], &particles[b], rigidity, passive);
                if let Some((fa, fb)) = solved {
                    particles[a].apply_force(fa);
                    particles[b].apply_force(fb);
                }
            }

            let (particles, constraints) = mesh.angle_constraints_and_particles_mut();
            for constraint in constraints {
                let [a, b, c] = constraint.particles;
                let solved = constraint.solve(&particles[a], &particles[b], &particles[c], None);
                if let Some((fa, fc)) = solved {
                    particles[a].apply_force(fa);
                    particles[c].apply_force(fc);
                }
            }

            if mesh.collision_behavior() != CollisionBehavior::Polyline {
                continue;
            }

            if polygon_self_intersects(mesh) {
                log::trace!("Self-intersecting soft polygon, falling back to shape matching.");
                let polygon = mesh.polygon().to_vec();
                match_shape(mesh, &polygon, None, soft.shape_matching_rate, time_scale);
            } else {
                let (particles, constraints) = mesh.corner_constraints_mut();
                for constraint in constraints {
                    let [a, b, c] = constraint.particles;
                    if let Some((fa, fc)) =
                        constraint.solve(&particles[a], &particles[b], &particles[c], None)
                    {
                        particles[a].apply_force(fa);
                        particles[c].apply_force(fc);
                    }
                }
            }
        }
    }
}

fn preserve_area(soft: &mut SoftBody, mesh: &mut Mesh, circumference: Real, time_scale: Real) {
    if mesh.springs().is_empty() || mesh.polygon().len() < 3 || circumference == 0.0 {
        return;
    }

    let target = soft.target_preservation_area * soft.area_preserving_rate;
    let mut delta = target - mesh.polygons_area();
    if !soft.area_stable {
        if delta < 0.0 {
            delta = 0.0;
        } else {
            soft.area_stable = true;
        }
    }

    let pressure = delta / circumference * soft.area_preserving_rigidity;
    let polygon = mesh.polygon().to_vec();
    let n = polygon.len();

    let forces: Vec<_> = (0..n)
        .map(|k| {
            let prev = mesh.particles()[polygon[(k + n - 1) % n]].position;
            let next = mesh.particles()[polygon[(k + 1) % n]].position;
            safe_normalize(&perpendicular(&(next - prev))) * pressure * time_scale
        })
        .collect();

    for (k, force) in forces.into_iter().enumerate() {
        let prev = polygon[(k + n - 1) % n];
        let next = polygon[(k + 1) % n];
        let center = Point::from(
            (mesh.particles()[prev].position.coords + mesh.particles()[next].position.coords) * 0.5,
        );
        mesh.apply_force_to_segment(prev, next, force, &center);
    }
}

fn shape_matching_indices(soft: &SoftBody, mesh: &Mesh) -> Vec<usize> {
    if mesh.collision_behavior() == CollisionBehavior::Polyline {
        mesh.polygon().to_vec()
    } else {
        (0..mesh.particle_count())
            .filter(|i| soft.shape_matching_internals || !mesh.particles()[*i].internal)
            .collect()
    }
}

/// Moves the `indices` particles toward their local layout, placed at the
/// given pose or at their best-fit pose.
fn match_shape(
    mesh: &mut Mesh,
    indices: &[usize],
    fixed: Option<(Point<Real>, Real)>,
    rate: Real,
    time_scale: Real,
) {
    if indices.len() < 2 {
        return;
    }

    let (local_center, (position, rotation)) = match fixed {
        Some(pose) => (Vector::zeros(), pose),
        None => {
            let center = indices
                .iter()
                .map(|i| mesh.particles()[*i].local_position.coords)
                .sum::<Vector<Real>>()
                / indices.len() as Real;
            (center, mesh.average_position_and_rotation(indices))
        }
    };

    for i in indices {
        let particle = &mut mesh.particles_mut()[*i];
        let target = position + rotated(&(particle.local_position.coords - local_center), rotation);
        let delta = target - particle.position;
        let dist = delta.norm();
        let magnitude = (dist * dist * 0.002 * rate * time_scale).min(dist * time_scale);
        particle.apply_force(safe_normalize(&delta) * magnitude);
    }
}

/// Do two non-adjacent edges of the polygon cross?
fn polygon_self_intersects(mesh: &Mesh) -> bool {
    let points = mesh.polygon_positions();
    let n = points.len();
    if n < 4 {
        return false;
    }

    for i in 0..n {
        let (a1, a2) = (points[i], points[(i + 1) % n]);
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (points[j], points[(j + 1) % n]);
            if segments_cross(&a1, &a2, &b1, &b2) {
                return true;
            }
        }
    }
    false
}
