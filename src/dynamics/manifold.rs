use crate::dynamics::{Body, BodyHandle, BodyKind, CollisionInfo, SimulationModel};
use crate::math::{Point, Real, Vector};
use crate::query::Contact;
use crate::shape::segment_force_split;
use crate::utils::perpendicular;
use slab::Slab;

/// The contacts found between two bodies during one solver iteration.
///
/// A manifold is rebuilt at every iteration. Solving it first pushes the
/// bodies apart, then applies friction and restitution to the contacts that
/// were actually solved.
#[derive(Clone, Debug)]
pub struct Manifold {
    body1: BodyHandle,
    body2: BodyHandle,
    contacts: Vec<Contact>,
    restitution: Real,
    inv_mass: Real,
    one_sided: bool,
    linear_relative_velocity: Vector<Real>,
}

impl Manifold {
    pub(crate) fn new(
        bodies: &Slab<Body>,
        body1: BodyHandle,
        body2: BodyHandle,
        contacts: Vec<Contact>,
    ) -> Self {
        let (b1, b2) = (&bodies[body1.0], &bodies[body2.0]);
        Self {
            body1: body1.min(body2),
            body2: body1.max(body2),
            contacts,
            restitution: b1.restitution.min(b2.restitution),
            inv_mass: 1.0 / (b1.mass() + b2.mass()),
            one_sided: !b1.can_give_collision_response_to(b2)
                || !b2.can_give_collision_response_to(b1),
            linear_relative_velocity: Vector::zeros(),
        }
    }

    /// The two bodies, smallest handle first.
    pub fn bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body1, self.body2)
    }

    /// The contacts of this manifold.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Does only one body of the pair respond to the collision?
    pub fn is_one_sided(&self) -> bool {
        self.one_sided
    }

    /// Scales `(reference, incident)` responses by the mass of the other side.
    fn mass_split(
        &self,
        v: Vector<Real>,
        ref_mass: Real,
        inc_mass: Real,
    ) -> (Vector<Real>, Vector<Real>) {
        if self.one_sided {
            (-v, v)
        } else {
            (-v * inc_mass * self.inv_mass, v * ref_mass * self.inv_mass)
        }
    }

    /// Pushes the bodies apart along the contact normals.
    pub(crate) fn solve(&mut self, bodies: &mut Slab<Body>) {
        let model1 = bodies[self.body1.0].simulation_model();
        let model2 = bodies[self.body2.0].simulation_model();
        let between_rigid =
            model1 == SimulationModel::RigidBody && model2 == SimulationModel::RigidBody;
        let between_soft =
            model1 == SimulationModel::MassSpring && model2 == SimulationModel::MassSpring;
        let count = self.contacts.len() as Real;

        for i in 0..self.contacts.len() {
            let contact = &mut self.contacts[i];
            if between_rigid {
                contact.penetration *= 0.75;
            } else if between_soft {
                contact.penetration *= 0.5;
            }
            contact.penetration = contact.penetration.max(0.0);

            let mut response = contact.normal * contact.penetration;
            if self.restitution > 0.0 {
                response *= 2.0;
            }
            if between_rigid {
                response /= count;
            }

            let ref_handle = contact.reference_body();
            let inc_handle = contact.particle.body;
            let (ref_body, inc_body) = (&bodies[ref_handle.0], &bodies[inc_handle.0]);
            let r_ref = contact.position - ref_body.position;
            let r_inc = contact.position - inc_body.position;
            let ref_mass = ref_body.mass();
            let inc_mass = inc_body.mass();
            let inc_gives = inc_body.can_give_collision_response_to(ref_body);
            let ref_gives = ref_body.can_give_collision_response_to(inc_body);
            let involves_area = ref_body.is_area() || inc_body.is_area();

            if i == 0 {
                self.linear_relative_velocity =
                    relative_velocity(bodies, &self.contacts[0], r_ref, r_inc);
            }
            let (ref_force, inc_force) = self.mass_split(response, ref_mass, inc_mass);
            let contact = &mut self.contacts[i];

            if involves_area {
                bodies[ref_handle.0].register_area_overlap(inc_handle);
                bodies[inc_handle.0].register_area_overlap(ref_handle);
            }

            let ref_accepts = bodies[ref_handle.0].events.emit_collision(&CollisionInfo {
                position: contact.position,
                body: inc_handle,
                normal: -contact.normal,
                penetration: contact.penetration,
            });
            let inc_accepts = bodies[inc_handle.0].events.emit_collision(&CollisionInfo {
                position: contact.position,
                body: ref_handle,
                normal: contact.normal,
                penetration: contact.penetration,
            });

            if involves_area || !ref_accepts || !inc_accepts {
                continue;
            }

            if inc_gives {
                contact.solved = true;
                let body = &mut bodies[ref_handle.0];
                if body.is_rigid() {
                    body.apply_force(ref_force, r_ref, true);
                } else {
                    apply_to_reference(body, contact, ref_force, contact.position);
                }
            }

            if ref_gives {
                contact.solved = true;
                let body = &mut bodies[inc_handle.0];
                if body.is_rigid() {
                    body.apply_force(inc_force, r_inc, true);
                } else if let Some(particle) = body.particle_mut(&contact.particle) {
                    particle.apply_force(inc_force);
                }
            }
        }
    }

    /// Applies restitution on the first contact and friction on every solved one.
    pub(crate) fn solve_friction_and_velocities(&mut self, bodies: &mut Slab<Body>) {
        if !bodies[self.body1.0].is_dynamic() && !bodies[self.body2.0].is_dynamic() {
            return;
        }

        for i in 0..self.contacts.len() {
            let contact = &self.contacts[i];
            if !contact.solved {
                continue;
            }

            let ref_handle = contact.reference_body();
            let inc_handle = contact.particle.body;
            let (ref_body, inc_body) = (&bodies[ref_handle.0], &bodies[inc_handle.0]);
            let r_ref = contact.position - ref_body.position;
            let r_inc = contact.position - inc_body.position;
            let ref_mass = ref_body.mass();
            let inc_mass = inc_body.mass();
            let ref_moves =
                inc_body.can_give_collision_response_to(ref_body) && !ref_body.is_kinematic;
            let inc_moves =
                ref_body.can_give_collision_response_to(inc_body) && !inc_body.is_kinematic;

            if i == 0 && self.restitution > 0.0 {
                let j = self.linear_relative_velocity.dot(&contact.normal);
                if j > self.restitution * 2.0 {
                    let rel = relative_velocity(bodies, contact, Vector::zeros(), Vector::zeros());
                    let tangent = rel - contact.normal * rel.dot(&contact.normal);
                    let jn = contact.normal * j * self.restitution - tangent;
                    let (ref_impulse, inc_impulse) = self.mass_split(jn, ref_mass, inc_mass);

                    let body = &mut bodies[ref_handle.0];
                    if body.is_rigid() && ref_moves {
                        body.prev_position = body.position - ref_impulse;
                    }
                    let body = &mut bodies[inc_handle.0];
                    if body.is_rigid() && inc_moves {
                        body.prev_position = body.position - inc_impulse;
                    }
                }
            }

            let rel = relative_velocity(bodies, contact, r_ref, r_inc);
            let friction = Body::compute_friction(
                &bodies[inc_handle.0],
                &bodies[ref_handle.0],
                &contact.normal,
                contact.penetration,
                &rel,
            );
            let (ref_force, inc_force) = self.mass_split(-friction, ref_mass, inc_mass);

            let incident_position = bodies[inc_handle.0]
                .particle(&contact.particle)
                .map_or(contact.position, |p| p.position);

            if ref_moves {
                let body = &mut bodies[ref_handle.0];
                if body.is_rigid() {
                    body.apply_force(ref_force, r_ref, true);
                } else {
                    apply_to_reference(body, contact, ref_force, incident_position);
                }
            }

            if inc_moves {
                let body = &mut bodies[inc_handle.0];
                if body.is_rigid() {
                    body.apply_force(inc_force, r_inc, true);
                } else if let Some(particle) = body.particle_mut(&contact.particle) {
                    particle.apply_force(inc_force);
                }
            }
        }
    }
}

/// Applies `force` to the reference particles of `contact`, split along the
/// reference segment when there are two of them.
fn apply_to_reference(body: &mut Body, contact: &Contact, force: Vector<Real>, from: Point<Real>) {
    match contact.reference.as_slice() {
        [a, b] if a.mesh == b.mesh => {
            if let Some(mesh) = body.meshes.get_mut(a.mesh) {
                mesh.apply_force_to_segment(a.index, b.index, force, &from);
            }
        }
        [a, b] => {
            let split = match (body.particle(a), body.particle(b)) {
                (Some(pa), Some(pb)) => segment_force_split(&pa.position, &pb.position, &from),
                _ => return,
            };
            if let Some(p) = body.particle_mut(a) {
                p.apply_force(force * split.0);
            }
            if let Some(p) = body.particle_mut(b) {
                p.apply_force(force * split.1);
            }
        }
        [a] => {
            if let Some(p) = body.particle_mut(a) {
                p.apply_force(force);
            }
        }
        _ => {}
    }
}

/// The velocity of the reference side at `r_ref` minus the velocity of the
/// incident side at `r_inc`.
///
/// Rigid bodies contribute their implicit linear and angular velocities. Soft
/// bodies contribute the average velocity of the reference particles, or the
/// velocity of the incident particle.
fn relative_velocity(
    bodies: &Slab<Body>,
    contact: &Contact,
    r_ref: Vector<Real>,
    r_inc: Vector<Real>,
) -> Vector<Real> {
    let ref_body = &bodies[contact.reference_body().0];
    let inc_body = &bodies[contact.particle.body.0];

    let (ref_vel, ref_ang) = if ref_body.simulation_model() == SimulationModel::RigidBody {
        (ref_body.velocity(), ref_body.angular_velocity())
    } else {
        let sum: Vector<Real> = contact
            .reference
            .iter()
            .filter_map(|id| ref_body.particle(id))
            .map(|p| p.velocity())
            .sum();
        (sum / contact.reference.len().max(1) as Real, 0.0)
    };

    let (inc_vel, inc_ang) = if inc_body.simulation_model() == SimulationModel::RigidBody {
        (inc_body.velocity(), inc_body.angular_velocity())
    } else {
        let vel = inc_body
            .particle(&contact.particle)
            .map_or(Vector::zeros(), |p| p.velocity());
        (vel, 0.0)
    };

    (ref_vel + -perpendicular(&r_ref) * ref_ang) - (inc_vel + -perpendicular(&r_inc) * inc_ang)
}

impl Body {
    /// Records `other` as overlapping this area body, firing the enter event
    /// the first time.
    pub(crate) fn register_area_overlap(&mut self, other: BodyHandle) {
        if let BodyKind::Area(area) = &mut self.kind {
            if area.insert(other) {
                self.events.emit_area_enter(other);
            }
        }
    }
}
