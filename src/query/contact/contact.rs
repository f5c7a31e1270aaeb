use crate::dynamics::ParticleId;
use crate::math::{Point, Real, Vector};
use arrayvec::ArrayVec;

/// A contact between one incident particle and one or two reference particles.
///
/// Contacts only live for one solver iteration: the narrow phase creates them
/// and the manifold owning them drops them once solved.
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    /// The incident particle, pushed along `normal`.
    pub particle: ParticleId,
    /// The contact point in world space.
    pub position: Point<Real>,
    /// The unit contact normal, pointing from the reference toward the incident particle.
    pub normal: Vector<Real>,
    /// The penetration depth along `normal`.
    pub penetration: Real,
    /// The reference particles: a single particle or a segment.
    pub reference: ArrayVec<ParticleId, 2>,
    /// Set by the manifold once a response has been applied for this contact.
    pub solved: bool,
}

impl Contact {
    /// Creates a contact against a single reference particle.
    pub fn with_particle(
        particle: ParticleId,
        position: Point<Real>,
        normal: Vector<Real>,
        penetration: Real,
        reference: ParticleId,
    ) -> Self {
        let mut refs = ArrayVec::new();
        refs.push(reference);
        Self {
            particle,
            position,
            normal,
            penetration,
            reference: refs,
            solved: false,
        }
    }

    /// Creates a contact against the reference segment `[a, b]`.
    pub fn with_segment(
        particle: ParticleId,
        position: Point<Real>,
        normal: Vector<Real>,
        penetration: Real,
        a: ParticleId,
        b: ParticleId,
    ) -> Self {
        Self {
            particle,
            position,
            normal,
            penetration,
            reference: [a, b].into(),
            solved: false,
        }
    }

    /// The body owning the reference particles.
    pub fn reference_body(&self) -> crate::dynamics::BodyHandle {
        self.reference
            .first()
            .map(|p| p.body)
            .unwrap_or(self.particle.body)
    }
}
