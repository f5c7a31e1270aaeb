use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::dynamics::{AreaBody, BodyEvents, ParticleId, RigidBody, SoftBody};
use crate::math::{Point, Real, Vector};
use crate::shape::{Mesh, Particle};

/// Whether a body moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyMode {
    /// The body is integrated and pushed by collisions.
    Dynamic,
    /// The body never moves by itself and is never pushed.
    Static,
}

/// How the particles of a body are moved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum SimulationModel {
    /// Every particle is integrated on its own and held by springs.
    MassSpring,
    /// Every particle follows the body transform.
    RigidBody,
}

/// The behavior specific to each kind of body.
#[derive(Clone, Debug)]
pub enum BodyKind {
    /// A body moved as a whole.
    Rigid(RigidBody),
    /// A deformable body.
    Soft(SoftBody),
    /// A trigger reporting the bodies overlapping it.
    Area(AreaBody),
}

/// The parameters shared by every integration routine during one step.
#[derive(Copy, Clone, Debug)]
pub(crate) struct StepContext {
    pub gravity: Vector<Real>,
    pub time_scale: Real,
}

/// A physical object made of meshes.
///
/// The pose of a body places its meshes. Rigid bodies keep every particle
/// attached to that pose, soft bodies only use it to place their particles
/// when they are moved explicitly.
#[derive(Debug)]
pub struct Body {
    pub(crate) position: Point<Real>,
    pub(crate) prev_position: Point<Real>,
    pub(crate) rotation: Real,
    pub(crate) prev_rotation: Real,
    pub(crate) aabb: Aabb,
    pub(crate) kind: BodyKind,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) force: Vector<Real>,
    pub(crate) angular_force: Real,
    pub(crate) sleeping: bool,
    pub(crate) still_ticks: u32,
    mode: BodyMode,
    mass: Real,
    /// The friction coefficient used while sliding.
    pub friction: Real,
    /// The friction coefficient used to stick.
    pub static_friction: Real,
    /// The fraction of the velocity lost at every step.
    pub air_friction: Real,
    /// The bounciness. The smallest restitution of a pair is used.
    pub restitution: Real,
    /// The layers this body is on.
    pub layers_bit: u32,
    /// The layers this body collides with.
    pub collidable_layers_bit: u32,
    /// Kinematic bodies are moved by the user and not by collisions.
    pub is_kinematic: bool,
    /// Lets two kinematic bodies push each other.
    pub allow_kinematic_collisions: bool,
    /// Lets the island of this body fall asleep.
    pub can_sleep: bool,
    /// Disabled bodies are neither integrated nor collided.
    pub enabled: bool,
    /// Skip gravity for this body.
    pub ignore_gravity: bool,
    /// Replaces the world gravity for this body.
    pub custom_gravity: Option<Vector<Real>>,
    /// Replaces the world time scale for this body.
    pub time_scale: Option<Real>,
    /// The largest implicit velocity of a rigid body. Zero disables the limit.
    pub velocity_limit: Real,
    /// Integrates the implicit velocity and gravity of rigid bodies.
    pub integrated_velocities: bool,
    /// The callbacks of this body.
    pub events: BodyEvents,
}

impl Body {
    /// An empty dynamic body of the given kind, at the origin.
    pub fn new(kind: BodyKind) -> Self {
        Self {
            position: Point::origin(),
            prev_position: Point::origin(),
            rotation: 0.0,
            prev_rotation: 0.0,
            aabb: Aabb::new_invalid(),
            kind,
            meshes: Vec::new(),
            force: Vector::zeros(),
            angular_force: 0.0,
            sleeping: false,
            still_ticks: 0,
            mode: BodyMode::Dynamic,
            mass: 1.0,
            friction: 0.2,
            static_friction: 0.5,
            air_friction: 0.01,
            restitution: 0.0,
            layers_bit: 1,
            collidable_layers_bit: 1,
            is_kinematic: false,
            allow_kinematic_collisions: false,
            can_sleep: true,
            enabled: true,
            ignore_gravity: false,
            custom_gravity: None,
            time_scale: None,
            velocity_limit: 0.0,
            integrated_velocities: true,
            events: BodyEvents::default(),
        }
    }

    /// An empty rigid body.
    pub fn rigid() -> Self {
        Self::new(BodyKind::Rigid(RigidBody::default()))
    }

    /// An empty soft body.
    pub fn soft() -> Self {
        Self::new(BodyKind::Soft(SoftBody::default()))
    }

    /// An empty area body.
    pub fn area() -> Self {
        Self::new(BodyKind::Area(AreaBody::default()))
    }

    /// Adds a mesh and returns `self`.
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        let _ = self.add_mesh(mesh);
        self
    }

    /// Moves the body to `position` and returns `self`.
    pub fn with_position(mut self, position: Point<Real>) -> Self {
        self.set_position(position, true);
        self
    }

    /// Sets the mode and returns `self`.
    pub fn with_mode(mut self, mode: BodyMode) -> Self {
        self.mode = mode;
        self
    }

    /*
     * Kind.
     */
    /// The kind-specific part of the body.
    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    /// The rigid-body part, if this is a rigid body.
    pub fn as_rigid(&self) -> Option<&RigidBody> {
        match &self.kind {
            BodyKind::Rigid(rigid) => Some(rigid),
            _ => None,
        }
    }

    /// The rigid-body part, mutably.
    pub fn as_rigid_mut(&mut self) -> Option<&mut RigidBody> {
        match &mut self.kind {
            BodyKind::Rigid(rigid) => Some(rigid),
            _ => None,
        }
    }

    /// The soft-body part, if this is a soft body.
    pub fn as_soft(&self) -> Option<&SoftBody> {
        match &self.kind {
            BodyKind::Soft(soft) => Some(soft),
            _ => None,
        }
    }

    /// The soft-body part, mutably.
    pub fn as_soft_mut(&mut self) -> Option<&mut SoftBody> {
        match &mut self.kind {
            BodyKind::Soft(soft) => Some(soft),
            _ => None,
        }
    }

    /// The area-body part, if this is an area body.
    pub fn as_area(&self) -> Option<&AreaBody> {
        match &self.kind {
            BodyKind::Area(area) => Some(area),
            _ => None,
        }
    }

    /// The area-body part, mutably.
    pub fn as_area_mut(&mut self) -> Option<&mut AreaBody> {
        match &mut self.kind {
            BodyKind::Area(area) => Some(area),
            _ => None,
        }
    }

    /// Is this a rigid body?
    pub fn is_rigid(&self) -> bool {
        matches!(self.kind, BodyKind::Rigid(_))
    }

    /// Is this a soft body?
    pub fn is_soft(&self) -> bool {
        matches!(self.kind, BodyKind::Soft(_))
    }

    /// Is this an area body?
    pub fn is_area(&self) -> bool {
        matches!(self.kind, BodyKind::Area(_))
    }

    /// How the particles of this body move.
    pub fn simulation_model(&self) -> SimulationModel {
        match self.kind {
            BodyKind::Soft(_) => SimulationModel::MassSpring,
            BodyKind::Rigid(_) | BodyKind::Area(_) => SimulationModel::RigidBody,
        }
    }

    /*
     * Meshes.
     */
    /// The meshes of this body.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable access to the meshes.
    ///
    /// Moving particles of a rigid body this way only lasts until its next
    /// update; change their local positions instead.
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Adds a mesh, places it according to the body pose, and returns its index.
    pub fn add_mesh(&mut self, mut mesh: Mesh) -> usize {
        mesh.set_rigid_owner(self.simulation_model() == SimulationModel::RigidBody);
        mesh.update_transform(&self.position, self.rotation, self.is_rigid());
        self.meshes.push(mesh);
        self.update_aabb();
        self.meshes.len() - 1
    }

    /// Removes the `i`-th mesh.
    pub fn remove_mesh_at(&mut self, i: usize) -> Option<Mesh> {
        if i >= self.meshes.len() {
            return None;
        }
        let mesh = self.meshes.remove(i);
        self.update_aabb();
        Some(mesh)
    }

    /// The particle identified by `id`, if it belongs to this body's meshes.
    pub fn particle(&self, id: &ParticleId) -> Option<&Particle> {
        self.meshes.get(id.mesh)?.particle(id.index)
    }

    /// The particle identified by `id`, mutably.
    pub fn particle_mut(&mut self, id: &ParticleId) -> Option<&mut Particle> {
        self.meshes.get_mut(id.mesh)?.particle_mut(id.index)
    }

    /*
     * Pose.
     */
    /// The position.
    pub fn position(&self) -> Point<Real> {
        self.position
    }

    /// The position at the previous step.
    pub fn prev_position(&self) -> Point<Real> {
        self.prev_position
    }

    /// The rotation, in radians.
    pub fn rotation(&self) -> Real {
        self.rotation
    }

    /// The rotation at the previous step.
    pub fn prev_rotation(&self) -> Real {
        self.prev_rotation
    }

    /// The implicit linear velocity.
    pub fn velocity(&self) -> Vector<Real> {
        self.position - self.prev_position
    }

    /// The implicit angular velocity.
    pub fn angular_velocity(&self) -> Real {
        self.rotation - self.prev_rotation
    }

    /// Teleports the body and its meshes.
    ///
    /// With `with_previous`, the previous position moves too so the velocity is
    /// kept. Otherwise the jump becomes velocity.
    pub fn set_position(&mut self, position: Point<Real>, with_previous: bool) {
        self.position = position;
        if with_previous {
            self.prev_position = position;
        }
        self.update_mesh_transforms();
        self.update_aabb();
    }

    /// Moves the body by `offset`, keeping its velocity.
    pub fn add_position(&mut self, offset: Vector<Real>) {
        self.set_position(self.position + offset, true);
    }

    /// Sets the previous position, which changes the implicit velocity.
    pub fn set_prev_position(&mut self, position: Point<Real>) {
        self.prev_position = position;
    }

    /// Rotates the body and its meshes.
    pub fn set_rotation(&mut self, rotation: Real, with_previous: bool) {
        self.rotation = rotation;
        if with_previous {
            self.prev_rotation = rotation;
        }
        self.update_mesh_transforms();
        self.update_aabb();
    }

    /// Rotates the body by `angle`, keeping its angular velocity.
    pub fn add_rotation(&mut self, angle: Real) {
        self.set_rotation(self.rotation + angle, true);
    }

    /// Sets the previous rotation, which changes the implicit angular velocity.
    pub fn set_prev_rotation(&mut self, rotation: Real) {
        self.prev_rotation = rotation;
    }

    /// The bounding box of every particle of the body.
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /*
     * Forces.
     */
    /// The displacement applied at the next update.
    pub fn force(&self) -> Vector<Real> {
        self.force
    }

    /// Sets the displacement applied at the next update, and wakes the body up.
    pub fn set_force(&mut self, force: Vector<Real>) {
        self.wake_up();
        self.force = force;
    }

    /// Adds to the displacement applied at the next update.
    pub fn add_force(&mut self, force: Vector<Real>) {
        self.set_force(self.force + force);
    }

    /// The rotation applied at the next update.
    pub fn angular_force(&self) -> Real {
        self.angular_force
    }

    /// Sets the rotation applied at the next update, and wakes the body up.
    pub fn set_angular_force(&mut self, force: Real) {
        self.wake_up();
        self.angular_force = force;
    }

    /// Adds to the rotation applied at the next update.
    pub fn add_angular_force(&mut self, force: Real) {
        self.set_angular_force(self.angular_force + force);
    }

    /*
     * Properties.
     */
    /// The mode.
    pub fn mode(&self) -> BodyMode {
        self.mode
    }

    /// Sets the mode.
    pub fn set_mode(&mut self, mode: BodyMode) {
        self.mode = mode;
    }

    /// Is this body static?
    pub fn is_static(&self) -> bool {
        self.mode == BodyMode::Static
    }

    /// Is this body moved by the solver? Kinematic and static bodies are not.
    pub fn is_dynamic(&self) -> bool {
        !self.is_kinematic && self.mode != BodyMode::Static
    }

    /// The mass. Soft bodies with a per-particle mass report that mass instead.
    pub fn mass(&self) -> Real {
        match &self.kind {
            BodyKind::Soft(SoftBody {
                particle_mass: Some(mass),
                ..
            }) => *mass,
            _ => self.mass,
        }
    }

    /// Sets the mass.
    pub fn set_mass(&mut self, mass: Real) {
        self.mass = mass;
    }

    /// The rotational inertia, derived from the rest area and the mass.
    pub fn inertia(&self) -> Real {
        let inertia = self.total_initial_area() * 2.0 * self.mass;
        if inertia == 0.0 {
            0.25
        } else {
            inertia
        }
    }

    /// The rest area of every mesh.
    pub fn total_initial_area(&self) -> Real {
        self.meshes.iter().map(Mesh::initial_area).sum()
    }

    /// The current area of every mesh.
    pub fn total_area(&self) -> Real {
        self.meshes.iter().map(Mesh::area).sum()
    }

    /// The rest area of every mesh polygon.
    pub fn total_initial_polygons_area(&self) -> Real {
        self.meshes.iter().map(Mesh::initial_polygons_area).sum()
    }

    /// The current area of every mesh polygon.
    pub fn total_polygons_area(&self) -> Real {
        self.meshes.iter().map(Mesh::polygons_area).sum()
    }

    /// The rest perimeter of every mesh polygon.
    pub fn circumference(&self) -> Real {
        self.meshes.iter().map(Mesh::circumference).sum()
    }

    /// Is this body asleep?
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Wakes the body up and restarts its sleep countdown.
    pub fn wake_up(&mut self) {
        self.sleeping = false;
        self.still_ticks = 0;
    }

    /// Is this body on one of the given layers?
    pub fn overlaps_layers(&self, layers_bit: u32) -> bool {
        self.layers_bit & layers_bit != 0
    }

    /// Does this body collide with one of the given layers?
    pub fn overlaps_collidable_layers(&self, layers_bit: u32) -> bool {
        self.collidable_layers_bit & layers_bit != 0
    }

    /// The time scale applied to this body.
    pub(crate) fn effective_time_scale(&self, ctx: &StepContext) -> Real {
        self.time_scale.unwrap_or(ctx.time_scale)
    }

    /// The gravity applied to this body, ignoring `ignore_gravity`.
    pub(crate) fn effective_gravity(&self, ctx: &StepContext) -> Vector<Real> {
        self.custom_gravity.unwrap_or(ctx.gravity)
    }

    /*
     * Derived state.
     */
    /// Places every mesh and particle according to the body pose.
    pub(crate) fn update_mesh_transforms(&mut self) {
        let rigid = self.is_rigid();
        for mesh in &mut self.meshes {
            mesh.update_transform(&self.position, self.rotation, rigid);
        }
    }

    /// Recomputes the bounding box from the particles.
    pub fn update_aabb(&mut self) {
        let mut aabb = Aabb::new_invalid();
        for mesh in &self.meshes {
            aabb.merge(&mesh.aabb());
        }
        self.aabb = aabb;
    }

    /// Integrates the body for one step.
    pub(crate) fn update(&mut self, ctx: &StepContext) {
        match self.kind {
            BodyKind::Rigid(_) => self.update_rigid(ctx),
            BodyKind::Soft(_) => self.update_soft(ctx),
            BodyKind::Area(_) => {}
        }
    }

    /*
     * Collision rules.
     */
    /// Can these bodies collide, ignoring collision exceptions?
    ///
    /// Both must be enabled, at least one must be awake and dynamic, and the
    /// layers of one must be collidable by the other.
    pub fn can_collide(a: &Body, b: &Body) -> bool {
        if !a.enabled || !b.enabled {
            return false;
        }

        let a_idle = a.sleeping || a.is_static();
        let b_idle = b.sleeping || b.is_static();
        if a_idle && b_idle {
            return false;
        }

        a.overlaps_collidable_layers(b.layers_bit) || b.overlaps_collidable_layers(a.layers_bit)
    }

    /// Can this body push `other` when they collide?
    pub fn can_give_collision_response_to(&self, other: &Body) -> bool {
        if other.is_static() {
            return false;
        }
        if other.is_kinematic && self.is_kinematic && !other.allow_kinematic_collisions {
            return false;
        }
        if !self.is_static() && other.is_kinematic && !self.is_kinematic {
            return false;
        }
        true
    }

    /// The friction displacement between two bodies at a contact.
    ///
    /// Below the static threshold the whole tangential motion is cancelled.
    /// Otherwise it is reduced by the dynamic friction.
    pub fn compute_friction(
        a: &Body,
        b: &Body,
        normal: &Vector<Real>,
        penetration: Real,
        relative_velocity: &Vector<Real>,
    ) -> Vector<Real> {
        let tangent = relative_velocity - normal * relative_velocity.dot(normal);
        let tangent = crate::utils::safe_normalize(&tangent);
        let jt = relative_velocity.dot(&-tangent);

        let dynamic_friction = a.friction.min(b.friction);
        let static_friction = (a.static_friction * b.static_friction).sqrt();

        if jt.abs() < penetration * static_friction {
            tangent * jt
        } else {
            tangent * -penetration * dynamic_friction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_decide_collisions() {
        let mut a = Body::rigid();
        let mut b = Body::rigid();
        assert!(Body::can_collide(&a, &b));

        a.layers_bit = 2;
        a.collidable_layers_bit = 2;
        assert!(!Body::can_collide(&a, &b));
        b.collidable_layers_bit = 3;
        assert!(Body::can_collide(&a, &b));

        a.set_mode(BodyMode::Static);
        b.sleeping = true;
        assert!(!Body::can_collide(&a, &b));
    }

    #[test]
    fn kinematic_bodies_are_not_pushed() {
        let dynamic = Body::rigid();
        let mut kinematic = Body::rigid();
        kinematic.is_kinematic = true;
        let floor = Body::rigid().with_mode(BodyMode::Static);

        assert!(!dynamic.can_give_collision_response_to(&floor));
        assert!(floor.can_give_collision_response_to(&dynamic));
        assert!(!dynamic.can_give_collision_response_to(&kinematic));
        assert!(kinematic.can_give_collision_response_to(&dynamic));

        let mut other = Body::rigid();
        other.is_kinematic = true;
        assert!(!kinematic.can_give_collision_response_to(&other));
        other.allow_kinematic_collisions = true;
        assert!(kinematic.can_give_collision_response_to(&other));
    }

    #[test]
    fn friction_sticks_below_threshold() {
        let a = Body::rigid();
        let b = Body::rigid();
        let normal = Vector::new(0.0, -1.0);
        let sliding = Vector::new(0.1, 0.0);
        let stick = Body::compute_friction(&a, &b, &normal, 1.0, &sliding);
        assert_relative_eq!(stick, Vector::new(-0.1, 0.0));

        let fast = Vector::new(5.0, 0.0);
        let slip = Body::compute_friction(&a, &b, &normal, 1.0, &fast);
        assert_relative_eq!(slip, Vector::new(-0.2, 0.0));
    }

    #[test]
    fn inertia_defaults_when_arealess() {
        let body = Body::rigid();
        assert_relative_eq!(body.inertia(), 0.25);
        let body = Body::rigid().with_mesh(Mesh::rectangle(Vector::new(2.0, 2.0), Point::origin()));
        assert_relative_eq!(body.inertia(), 8.0);
    }
}
