use crate::math::{Real, Vector};
use crate::partitioning::BroadPhaseKind;
use core::f32::consts::PI;

/// The global parameters of a [`World`](crate::dynamics::World).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// The gravity added to every body position at each step.
    pub gravity: Vector<Real>,
    /// The number of constraint and collision passes per step.
    pub iterations: u32,
    /// Scales gravity and the soft-body forces.
    pub time_scale: Real,
    /// Lets still islands fall asleep.
    pub sleeping: bool,
    /// Bodies moving less than this on both axes count as still.
    pub sleeping_position_tolerance: Real,
    /// Bodies rotating less than this count as still.
    pub sleeping_rotation_tolerance: Real,
    /// The number of consecutive still steps before an island sleeps.
    pub sleep_tick: u32,
    /// Cull body pairs before the narrow phase. When disabled, every pair is tested.
    pub broad_phase: bool,
    /// The culling strategy.
    pub broad_phase_kind: BroadPhaseKind,
    /// A disabled world ignores [`World::step`](crate::dynamics::World::step).
    pub enabled: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector::new(0.0, 0.2),
            iterations: 4,
            time_scale: 1.0,
            sleeping: true,
            sleeping_position_tolerance: 0.1,
            sleeping_rotation_tolerance: PI / 180.0,
            sleep_tick: 120,
            broad_phase: true,
            broad_phase_kind: BroadPhaseKind::SweepAndPrune,
            enabled: true,
        }
    }
}

impl WorldConfig {
    /// Sets the gravity.
    pub fn with_gravity(mut self, gravity: Vector<Real>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the iteration count. At least one iteration always runs.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Sets the time scale.
    pub fn with_time_scale(mut self, time_scale: Real) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Enables or disables sleeping.
    pub fn with_sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }

    /// Sets the sleep tolerances.
    pub fn with_sleeping_tolerances(mut self, position: Real, rotation: Real) -> Self {
        self.sleeping_position_tolerance = position;
        self.sleeping_rotation_tolerance = rotation;
        self
    }

    /// Sets the number of still steps needed to fall asleep.
    pub fn with_sleep_tick(mut self, sleep_tick: u32) -> Self {
        self.sleep_tick = sleep_tick;
        self
    }

    /// Enables or disables the broad phase.
    pub fn with_broad_phase(mut self, enabled: bool) -> Self {
        self.broad_phase = enabled;
        self
    }

    /// Selects the broad-phase strategy.
    pub fn with_broad_phase_kind(mut self, kind: BroadPhaseKind) -> Self {
        self.broad_phase_kind = kind;
        self
    }
}
