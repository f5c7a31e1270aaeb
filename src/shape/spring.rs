use crate::math::{Real, Vector};
use crate::shape::Particle;
use crate::utils::safe_normalize;

/// A distance constraint between two particles.
///
/// `P` identifies the particles: mesh springs use indices into the mesh particle
/// list, world springs use [`ParticleId`](crate::dynamics::ParticleId)s that can
/// point into different bodies.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Spring<P = usize> {
    /// The first particle.
    pub a: P,
    /// The second particle.
    pub b: P,
    /// The rest length.
    pub length: Real,
    /// Internal springs hold the inner structure of a mesh and may be weakened
    /// by passivation.
    pub internal: bool,
    /// The stiffness in `[0, 1]`, used by world springs.
    pub rigidity: Real,
    /// Disabled springs apply no force.
    pub enabled: bool,
}

impl<P> Spring<P> {
    /// Creates a spring with an explicit rest length.
    pub fn with_length(a: P, b: P, length: Real, internal: bool) -> Self {
        Self {
            a,
            b,
            length,
            internal,
            rigidity: 1.0,
            enabled: true,
        }
    }

    /// Computes the position corrections of both ends.
    ///
    /// The rest length is pulled back toward `length`, scaled by `rigidity`. When
    /// `internals_exception` is set, internal springs only push along internal
    /// particles and never pull them, so they cannot collapse the mesh from the
    /// inside.
    ///
    /// Returns `None` if the spring is disabled.
    pub fn solve(
        &self,
        pa: &Particle,
        pb: &Particle,
        rigidity: Real,
        internals_exception: bool,
    ) -> Option<(Vector<Real>, Vector<Real>)> {
        if !self.enabled {
            return None;
        }

        let delta = pb.position - pa.position;
        let current = delta.norm();
        let force = safe_normalize(&delta) * (self.length - current);
        let mut force_a = -force;
        let mut force_b = force;

        if internals_exception && self.internal {
            let stretched = if current < self.length { 0.0 } else { 1.0 };
            match (pa.internal, pb.internal) {
                (true, false) => {
                    force_a *= stretched * 0.5;
                    force_b = Vector::zeros();
                }
                (false, true) => {
                    force_a = Vector::zeros();
                    force_b *= stretched * 0.5;
                }
                (true, true) => {
                    force_a *= stretched * 0.25;
                    force_b *= stretched * 0.25;
                }
                (false, false) => {}
            }
        } else {
            force_a *= 0.5 * rigidity;
            force_b *= 0.5 * rigidity;
        }

        Some((force_a, force_b))
    }

    /// Does this spring connect the given particle?
    pub fn involves(&self, particle: &P) -> bool
    where
        P: PartialEq,
    {
        self.a == *particle || self.b == *particle
    }
}

impl Spring<usize> {
    /// Creates a spring between two particles of `particles`, using their current
    /// distance as the rest length.
    pub fn new(particles: &[Particle], a: usize, b: usize, internal: bool) -> Self {
        let length = (particles[b].position - particles[a].position).norm();
        Self::with_length(a, b, length, internal)
    }
}
