use crate::dynamics::{Body, BodyHandle};
use crate::math::{Point, Real, Vector};
use core::fmt;

/// What a body learns about one of its contacts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionInfo {
    /// The contact point.
    pub position: Point<Real>,
    /// The other body.
    pub body: BodyHandle,
    /// The contact normal, pointing toward the body receiving the event.
    pub normal: Vector<Real>,
    /// The penetration depth.
    pub penetration: Real,
}

type StepCallback = Box<dyn FnMut(&mut Body)>;
type CollisionCallback = Box<dyn FnMut(&CollisionInfo) -> bool>;
type AreaCallback = Box<dyn FnMut(BodyHandle)>;

/// The callbacks subscribed to the events of one body.
///
/// Each event holds at most one callback, and subscribing again replaces it.
/// Callbacks run synchronously during [`World::step`](crate::dynamics::World::step),
/// in body order.
#[derive(Default)]
pub struct BodyEvents {
    pre_step: Option<StepCallback>,
    step: Option<StepCallback>,
    collision: Option<CollisionCallback>,
    area_enter: Option<AreaCallback>,
    area_exit: Option<AreaCallback>,
}

impl fmt::Debug for BodyEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyEvents")
            .field("pre_step", &self.pre_step.is_some())
            .field("step", &self.step.is_some())
            .field("collision", &self.collision.is_some())
            .field("area_enter", &self.area_enter.is_some())
            .field("area_exit", &self.area_exit.is_some())
            .finish()
    }
}

impl BodyEvents {
    /// Called after the bodies are integrated and before collisions are solved.
    pub fn on_pre_step(&mut self, callback: impl FnMut(&mut Body) + 'static) -> &mut Self {
        self.pre_step = Some(Box::new(callback));
        self
    }

    /// Called at the end of every step.
    pub fn on_step(&mut self, callback: impl FnMut(&mut Body) + 'static) -> &mut Self {
        self.step = Some(Box::new(callback));
        self
    }

    /// Called for every contact of the body. Returning `false` cancels the
    /// response of that contact.
    pub fn on_collision(
        &mut self,
        callback: impl FnMut(&CollisionInfo) -> bool + 'static,
    ) -> &mut Self {
        self.collision = Some(Box::new(callback));
        self
    }

    /// Called when a body starts overlapping this area body.
    pub fn on_area_enter(&mut self, callback: impl FnMut(BodyHandle) + 'static) -> &mut Self {
        self.area_enter = Some(Box::new(callback));
        self
    }

    /// Called when a body stops overlapping this area body.
    pub fn on_area_exit(&mut self, callback: impl FnMut(BodyHandle) + 'static) -> &mut Self {
        self.area_exit = Some(Box::new(callback));
        self
    }

    /// Drops every callback.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn emit_collision(&mut self, info: &CollisionInfo) -> bool {
        self.collision.as_mut().map_or(true, |cb| cb(info))
    }

    pub(crate) fn emit_area_enter(&mut self, body: BodyHandle) {
        if let Some(cb) = self.area_enter.as_mut() {
            cb(body);
        }
    }

    pub(crate) fn emit_area_exit(&mut self, body: BodyHandle) {
        if let Some(cb) = self.area_exit.as_mut() {
            cb(body);
        }
    }
}

impl Body {
    pub(crate) fn emit_pre_step(&mut self) {
        if let Some(mut cb) = self.events.pre_step.take() {
            cb(self);
            // The callback may have subscribed a replacement.
            if self.events.pre_step.is_none() {
                self.events.pre_step = Some(cb);
            }
        }
    }

    pub(crate) fn emit_step(&mut self) {
        if let Some(mut cb) = self.events.step.take() {
            cb(self);
            if self.events.step.is_none() {
                self.events.step = Some(cb);
            }
        }
    }
}
