use crate::dynamics::{BodyHandle, BodyKind, World};
use crate::math::{Real, Vector};

/// The state specific to area bodies.
///
/// Area bodies never push nor get pushed. They keep track of the bodies
/// overlapping them and may alter their gravity and motion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AreaBody {
    /// Overlapping bodies ignore gravity until they leave the area.
    pub gravity_free: bool,
    /// A displacement applied at every step to the overlapping bodies.
    pub linear_force_to_apply: Vector<Real>,
    bodies: Vec<BodyHandle>,
}

impl AreaBody {
    /// The bodies overlapping this area, in the order they entered it.
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    /// Adds `body` to the overlapping set. Returns `true` if it was not there yet.
    pub(crate) fn insert(&mut self, body: BodyHandle) -> bool {
        if self.bodies.contains(&body) {
            false
        } else {
            self.bodies.push(body);
            true
        }
    }

    pub(crate) fn remove(&mut self, body: BodyHandle) {
        self.bodies.retain(|b| *b != body);
    }

    fn affects_bodies(&self) -> bool {
        self.gravity_free || self.linear_force_to_apply != Vector::zeros()
    }
}

impl World {
    /// Applies the effects of every area body to the bodies overlapping it, and
    /// drops the bodies that left.
    pub(crate) fn check_area_bodies(&mut self) {
        let areas: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_area() && b.enabled)
            .map(|(i, _)| BodyHandle(i))
            .collect();

        for area in areas {
            self.check_area_body(area);
        }
    }

    fn check_area_body(&mut self, area: BodyHandle) {
        let (gravity_free, force, overlapping) = match &self.bodies[area.0].kind {
            BodyKind::Area(a) if a.affects_bodies() => {
                (a.gravity_free, a.linear_force_to_apply, a.bodies.clone())
            }
            BodyKind::Area(a) => (false, Vector::zeros(), a.bodies.clone()),
            _ => return,
        };
        let mut left = Vec::new();

        for handle in overlapping {
            if !self.bodies.contains(handle.0) {
                left.push(handle);
                continue;
            }

            let contacts = if self.bodies[handle.0].enabled {
                self.get_collisions(area, handle)
            } else {
                Vec::new()
            };
            let gone = contacts.is_empty();
            if gone {
                left.push(handle);
            }

            let body = &mut self.bodies[handle.0];
            if body.is_rigid() {
                if gone {
                    if gravity_free {
                        body.ignore_gravity = false;
                    }
                } else {
                    if gravity_free {
                        body.ignore_gravity = true;
                    }
                    if force != Vector::zeros() {
                        body.apply_force(force, Vector::zeros(), true);
                    }
                }
            } else if body.is_soft() && !body.is_static() {
                if gravity_free {
                    for mesh in body.meshes_mut() {
                        mesh.particles_mut().iter_mut().for_each(|p| p.ignore_gravity = false);
                    }
                }
                for contact in &contacts {
                    for id in contact.reference.iter().chain(core::iter::once(&contact.particle)) {
                        if id.body != handle {
                            continue;
                        }
                        let Some(particle) = body.particle_mut(id) else {
                            continue;
                        };
                        if !particle.enabled || particle.lazy {
                            continue;
                        }
                        particle.apply_force(force);
                        if gravity_free {
                            particle.ignore_gravity = true;
                        }
                    }
                }
            }
        }

        for handle in left {
            if let BodyKind::Area(a) = &mut self.bodies[area.0].kind {
                a.remove(handle);
            }
            self.bodies[area.0].events.emit_area_exit(handle);

            if let Some(body) = self.bodies.get_mut(handle.0) {
                if gravity_free {
                    body.ignore_gravity = false;
                    for mesh in body.meshes_mut() {
                        mesh.particles_mut().iter_mut().for_each(|p| p.ignore_gravity = false);
                    }
                }
            }
        }
    }
}
