use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, POINT_PARTICLE_RADIUS};

/// The smallest building block of every mesh: a point mass with a radius.
///
/// Velocity is implicit: it is the difference between `position` and
/// `prev_position`. For rigid bodies the particle positions are recomputed from
/// the body transform every step, so only soft bodies really integrate them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Particle {
    /// The position of the particle in world space.
    pub position: Point<Real>,
    /// The world-space position at the previous step.
    pub prev_position: Point<Real>,
    /// The position relative to the owning mesh.
    pub local_position: Point<Real>,
    /// The radius. Particles with a radius of `0.5` or less are treated as points.
    pub radius: Real,
    /// The mass, used by soft bodies to scale gravity.
    pub mass: Real,
    /// Disabled particles are not moved by constraints.
    pub enabled: bool,
    /// Lazy particles are excluded from the forces applied by area bodies.
    pub lazy: bool,
    /// Internal particles fill the inside of a mesh instead of shaping its boundary.
    pub internal: bool,
    /// Skip gravity for this particle only.
    pub ignore_gravity: bool,
    /// Force applied, then cleared, at the next soft-body update.
    pub force: Vector<Real>,
    accumulated_force: Vector<Real>,
    accumulated_count: u32,
}

impl Particle {
    /// Creates a particle at rest at `position`, given both in world and in local space.
    pub fn new(position: Point<Real>, radius: Real) -> Self {
        Self {
            position,
            prev_position: position,
            local_position: position,
            radius,
            mass: 1.0,
            enabled: true,
            lazy: false,
            internal: false,
            ignore_gravity: false,
            force: Vector::zeros(),
            accumulated_force: Vector::zeros(),
            accumulated_count: 0,
        }
    }

    /// Marks this particle as internal.
    pub fn internal(mut self, internal: bool) -> Self {
        self.internal = internal;
        self
    }

    /// Is this particle big enough to be treated as a disk?
    #[inline]
    pub fn has_volume(&self) -> bool {
        self.radius > POINT_PARTICLE_RADIUS
    }

    /// The implicit Verlet velocity.
    #[inline]
    pub fn velocity(&self) -> Vector<Real> {
        self.position - self.prev_position
    }

    /// Moves the particle immediately.
    ///
    /// This changes the implicit velocity too, since `prev_position` is untouched.
    #[inline]
    pub fn apply_force(&mut self, force: Vector<Real>) {
        self.position += force;
    }

    /// Queues a force to be averaged with the other queued forces by
    /// [`Particle::apply_accumulated_forces`].
    pub fn accumulate_force(&mut self, force: Vector<Real>) {
        self.accumulated_force += force;
        self.accumulated_count += 1;
    }

    /// Drops all queued forces.
    pub fn clear_accumulated_forces(&mut self) {
        self.accumulated_force = Vector::zeros();
        self.accumulated_count = 0;
    }

    /// Applies the average of the queued forces, then clears the queue.
    pub fn apply_accumulated_forces(&mut self) {
        if self.accumulated_count > 0 {
            let average = self.accumulated_force / self.accumulated_count as Real;
            self.apply_force(average);
            self.clear_accumulated_forces();
        }
    }

    /// The bounding box of the particle disk.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.position, Vector::repeat(self.radius))
    }
}

/// The share of a force applied at `from` that each end of the segment `a b`
/// receives.
///
/// Falls back to an even split when `from` does not project inside the segment
/// or when the segment is degenerate.
pub fn segment_force_split(a: &Point<Real>, b: &Point<Real>, from: &Point<Real>) -> (Real, Real) {
    let segment = b - a;
    let len = segment.norm();
    if len == 0.0 {
        return (0.5, 0.5);
    }

    let proj = (from - a).dot(&segment) / len;
    if proj < 0.0 || proj > len {
        return (0.5, 0.5);
    }

    ((len - proj) / len, proj / len)
}
