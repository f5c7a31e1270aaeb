use crate::dynamics::{Body, BodyHandle, World, WorldError};
use crate::math::{Point, Real, Vector};
use crate::utils::{rotated, safe_normalize};
use slab::Slab;

/// A distance constraint between two anchors.
///
/// Each anchor is attached to a rigid body, or fixed in world space when its
/// body is `None`. Anchors attached to a body are stored in the local frame of
/// that body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Joint {
    body_a: Option<BodyHandle>,
    body_b: Option<BodyHandle>,
    anchor_a: Point<Real>,
    anchor_b: Point<Real>,
    /// The distance kept between the anchors.
    pub distance: Real,
    /// How much of the distance error is corrected at each iteration, in `[0, 1]`.
    pub rigidity: Real,
    /// Only keep the anchors from getting farther than `distance`, like a rope.
    pub groove: bool,
    /// Disabled joints apply no force.
    pub enabled: bool,
    pub(crate) collisions_enabled: bool,
}

impl Joint {
    /// Creates a joint between two anchors given in world space.
    ///
    /// The distance to keep is the current distance between the anchors. Both
    /// bodies, when given, must be rigid bodies of `world`. Collisions between
    /// the two bodies are disabled while the joint is in the world.
    pub fn new(
        world: &World,
        body_a: Option<BodyHandle>,
        anchor_a: Point<Real>,
        body_b: Option<BodyHandle>,
        anchor_b: Point<Real>,
    ) -> Result<Self, WorldError> {
        let local_a = Self::local_anchor(world, body_a, anchor_a)?;
        let local_b = Self::local_anchor(world, body_b, anchor_b)?;

        Ok(Self {
            body_a,
            body_b,
            anchor_a: local_a,
            anchor_b: local_b,
            distance: (anchor_a - anchor_b).norm(),
            rigidity: 1.0,
            groove: false,
            enabled: true,
            collisions_enabled: false,
        })
    }

    /// A joint with a zero distance, pinning both bodies at a common point.
    pub fn pin(
        world: &World,
        body_a: Option<BodyHandle>,
        anchor: Point<Real>,
        body_b: Option<BodyHandle>,
    ) -> Result<Self, WorldError> {
        Self::new(world, body_a, anchor, body_b, anchor)
    }

    /// A joint keeping the anchor of `body` at its current distance from a fixed
    /// world-space point.
    pub fn to_point(
        world: &World,
        body: BodyHandle,
        anchor: Point<Real>,
        point: Point<Real>,
    ) -> Result<Self, WorldError> {
        Self::new(world, Some(body), anchor, None, point)
    }

    fn local_anchor(
        world: &World,
        body: Option<BodyHandle>,
        anchor: Point<Real>,
    ) -> Result<Point<Real>, WorldError> {
        let Some(handle) = body else {
            return Ok(anchor);
        };
        let body = world.body(handle).ok_or(WorldError::UnknownBody(handle))?;
        if !body.is_rigid() {
            return Err(WorldError::NotARigidBody(handle));
        }
        Ok(body.to_local_point(&anchor))
    }

    /// The first body.
    pub fn body_a(&self) -> Option<BodyHandle> {
        self.body_a
    }

    /// The second body.
    pub fn body_b(&self) -> Option<BodyHandle> {
        self.body_b
    }

    /// Does this joint attach `body`?
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == Some(body) || self.body_b == Some(body)
    }

    /// The first anchor, local to its body or in world space.
    pub fn anchor_a(&self) -> Point<Real> {
        self.anchor_a
    }

    /// The second anchor, local to its body or in world space.
    pub fn anchor_b(&self) -> Point<Real> {
        self.anchor_b
    }

    /// May the two bodies of this joint collide?
    pub fn collisions_enabled(&self) -> bool {
        self.collisions_enabled
    }

    /// The anchor offset from its body position and the anchor position, in world space.
    fn global_anchor(
        bodies: &Slab<Body>,
        body: Option<BodyHandle>,
        anchor: &Point<Real>,
    ) -> (Vector<Real>, Point<Real>) {
        match body.and_then(|h| bodies.get(h.0)) {
            Some(body) => {
                let offset = rotated(&anchor.coords, body.rotation);
                (offset, body.position + offset)
            }
            None => (Vector::zeros(), *anchor),
        }
    }

    /// The world-space positions of both anchors.
    pub fn global_anchors(&self, world: &World) -> (Point<Real>, Point<Real>) {
        let (_, a) = Self::global_anchor(&world.bodies, self.body_a, &self.anchor_a);
        let (_, b) = Self::global_anchor(&world.bodies, self.body_b, &self.anchor_b);
        (a, b)
    }

    pub(crate) fn update(&self, bodies: &mut Slab<Body>) {
        if !self.enabled {
            return;
        }

        let is_static =
            |h: Option<BodyHandle>| h.and_then(|h| bodies.get(h.0)).map(Body::is_static);
        let k = match (is_static(self.body_a), is_static(self.body_b)) {
            (None | Some(true), None | Some(true)) => return,
            (Some(false), Some(false)) => 0.5,
            _ => 1.0,
        };

        let (offset_a, global_a) = Self::global_anchor(bodies, self.body_a, &self.anchor_a);
        let (offset_b, global_b) = Self::global_anchor(bodies, self.body_b, &self.anchor_b);

        let diff = global_b - global_a;
        let current = diff.norm();
        if self.groove && current < self.distance {
            return;
        }

        let force = safe_normalize(&diff) * (self.distance - current) * self.rigidity * k;

        if let Some(body) = self.body_a.and_then(|h| bodies.get_mut(h.0)) {
            if !body.is_static() {
                body.apply_force(-force, offset_a, true);
            }
        }
        if let Some(body) = self.body_b.and_then(|h| bodies.get_mut(h.0)) {
            if !body.is_static() {
                body.apply_force(force, offset_b, true);
            }
        }
    }
}
