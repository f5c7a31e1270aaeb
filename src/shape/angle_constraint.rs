use crate::math::{Point, Real, Vector};
use crate::shape::Particle;
use crate::utils::{angle_between, angle_to_unit_vector, rotated};
use core::f32::consts::TAU;

/// Limits the angle at the middle particle `b` of the corner `a b c`.
///
/// The angle goes from `c - b` to `a - b`, counter-clockwise in a `y`-up frame,
/// and is unwrapped between steps so a corner can be tracked past a full turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AngleConstraint {
    /// Mesh-local indices of the three corner particles.
    pub particles: [usize; 3],
    /// The smallest allowed angle.
    pub min_angle: Real,
    /// The largest allowed angle.
    pub max_angle: Real,
    /// How much of the violation is corrected in one update, in `[0, 1]`.
    pub rigidity: Real,
    /// Disabled constraints do nothing.
    pub enabled: bool,
    current_angle: Real,
    prev_angle: Real,
    started: bool,
}

/// The angle of the corner `a b c`, in `[0, 2π)`.
pub fn corner_angle(a: &Point<Real>, b: &Point<Real>, c: &Point<Real>) -> Real {
    let to_prev = a - b;
    let to_next = c - b;
    let angle = to_next.perp(&to_prev).atan2(to_next.dot(&to_prev));
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

impl AngleConstraint {
    /// Keeps the corner within `range` radians of its current local-space angle.
    pub fn new(particles: &[Particle], corner: [usize; 3], range: Real) -> Self {
        let [a, b, c] = corner.map(|i| particles[i].local_position);
        let angle = corner_angle(&a, &b, &c);
        Self::with_limits(corner, angle - range, angle + range)
    }

    /// Keeps the corner between `min_angle` and `max_angle`.
    pub fn with_limits(corner: [usize; 3], min_angle: Real, max_angle: Real) -> Self {
        Self {
            particles: corner,
            min_angle,
            max_angle,
            rigidity: 0.5,
            enabled: true,
            current_angle: 0.0,
            prev_angle: 0.0,
            started: false,
        }
    }

    /// The unwrapped angle measured by the last update.
    pub fn current_angle(&self) -> Real {
        self.current_angle
    }

    /// Does this constraint use the given particle?
    pub fn involves(&self, particle: usize) -> bool {
        self.particles.contains(&particle)
    }

    /// Measures the corner and computes the corrections of the outer particles.
    ///
    /// The first update only records the angle. Afterward, if the angle leaves
    /// `[min_angle, max_angle]`, `a` and `c` are rotated around `b` toward the
    /// violated limit. `rigidity` overrides the constraint's own rigidity when it
    /// lies in `[0, 1]`. Disabled particles get no correction.
    pub fn solve(
        &mut self,
        pa: &Particle,
        pb: &Particle,
        pc: &Particle,
        rigidity: Option<Real>,
    ) -> Option<(Vector<Real>, Vector<Real>)> {
        if !self.enabled {
            return None;
        }

        let rigidity = rigidity
            .filter(|r| (0.0..=1.0).contains(r))
            .unwrap_or(self.rigidity);
        let raw = corner_angle(&pa.position, &pb.position, &pc.position);

        if !self.started {
            self.started = true;
            self.prev_angle = raw;
            self.current_angle = raw;
            return None;
        }

        let step = angle_between(
            &angle_to_unit_vector(raw),
            &angle_to_unit_vector(self.prev_angle),
        );
        let angle = self.prev_angle + step;
        self.current_angle = angle;
        self.prev_angle = angle;

        let limit = if angle > self.max_angle {
            self.max_angle
        } else if angle < self.min_angle {
            self.min_angle
        } else {
            return None;
        };

        let angular_force = (limit - angle) * 0.5;
        let to_prev = pa.position - pb.position;
        let to_next = pc.position - pb.position;

        let force_a = if pa.enabled {
            (pb.position + rotated(&to_prev, angular_force) - pa.position) * rigidity
        } else {
            Vector::zeros()
        };
        let force_c = if pc.enabled {
            (pb.position + rotated(&to_next, -angular_force) - pc.position) * rigidity
        } else {
            Vector::zeros()
        };

        Some((force_a, force_c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(angle: Real) -> [Particle; 3] {
        [
            Particle::new(Point::from(angle_to_unit_vector(angle)), 0.5),
            Particle::new(Point::origin(), 0.5),
            Particle::new(Point::new(1.0, 0.0), 0.5),
        ]
    }

    #[test]
    fn corner_angles() {
        let [a, b, c] = corner(core::f32::consts::FRAC_PI_2);
        assert_relative_eq!(
            corner_angle(&a.position, &b.position, &c.position),
            core::f32::consts::FRAC_PI_2,
            epsilon = 1.0e-5
        );
        assert_relative_eq!(
            corner_angle(&c.position, &b.position, &a.position),
            3.0 * core::f32::consts::FRAC_PI_2,
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn closing_corner_is_pushed_open() {
        let mut constraint = AngleConstraint::with_limits([0, 1, 2], 1.0, 2.0);
        let [a, b, c] = corner(0.9);
        assert!(constraint.solve(&a, &b, &c, None).is_none());
        let [mut a, b, mut c] = corner(0.5);
        let (fa, fc) = constraint.solve(&a, &b, &c, Some(1.0)).unwrap();
        a.apply_force(fa);
        c.apply_force(fc);
        assert_relative_eq!(
            corner_angle(&a.position, &b.position, &c.position),
            1.0,
            epsilon = 1.0e-4
        );
    }
}
