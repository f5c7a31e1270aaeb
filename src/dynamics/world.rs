use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::dynamics::body::StepContext;
use crate::dynamics::{
    Body, BodyHandle, BodyKind, Joint, JointHandle, Manifold, ParticleId, Raycast, RaycastHandle,
    SimulationModel, SpringHandle, WorldConfig, WorldError, WorldSpring,
};
use crate::math::{Point, Real, Vector};
use crate::partitioning::{BroadPhase, BroadPhaseKind};
use crate::query::details::{
    contact_circles_circles, contact_circles_polygon, contact_circles_self, contact_polygon_polygon,
    contact_polyline_polygon, contact_polyline_polyline,
};
use crate::query::{point_in_convex_group, Contact, ParticleGroup};
use crate::shape::{CollisionBehavior, Mesh, Particle};
use crate::utils::SortedPair;
use hashbrown::HashSet;
use slab::Slab;
use core::fmt;

/// One mesh of a body, as handed to the narrow phase.
#[derive(Copy, Clone)]
struct MeshView<'a> {
    body: BodyHandle,
    index: usize,
    mesh: &'a Mesh,
    body_aabb: &'a Aabb,
}

impl<'a> MeshView<'a> {
    fn new(body: &'a Body, handle: BodyHandle, index: usize) -> Self {
        Self {
            body: handle,
            index,
            mesh: &body.meshes()[index],
            body_aabb: body.aabb(),
        }
    }

    fn all(&self) -> ParticleGroup<'a> {
        ParticleGroup::all(self.body, self.index, self.mesh)
    }

    fn polygon(&self) -> ParticleGroup<'a> {
        ParticleGroup::polygon(self.body, self.index, self.mesh)
    }

    fn sub_polygons(&self) -> impl Iterator<Item = ParticleGroup<'a>> + 'a {
        let (body, index, mesh) = (self.body, self.index, self.mesh);
        mesh.sub_polygons()
            .iter()
            .map(move |sub| ParticleGroup::indexed(body, index, mesh, sub))
    }
}

/// The owner of every body, joint, spring and raycast of a simulation.
///
/// A world is advanced by calling [`World::step`] at a fixed rate. Objects are
/// referred to by handles returned when they are inserted.
pub struct World {
    pub(crate) bodies: Slab<Body>,
    pub(crate) order: Vec<BodyHandle>,
    joints: Slab<Joint>,
    springs: Slab<WorldSpring>,
    pub(crate) raycasts: Slab<Raycast>,
    exceptions: HashSet<SortedPair<BodyHandle>>,
    manifolds: Vec<Manifold>,
    broad_phase: Box<dyn BroadPhase>,
    pub(crate) config: WorldConfig,
    aabbs: Vec<Aabb>,
    pairs: Vec<(usize, usize)>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("bodies", &self.bodies.len())
            .field("joints", &self.joints.len())
            .field("springs", &self.springs.len())
            .field("raycasts", &self.raycasts.len())
            .field("exceptions", &self.exceptions.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// An empty world.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            bodies: Slab::new(),
            order: Vec::new(),
            joints: Slab::new(),
            springs: Slab::new(),
            raycasts: Slab::new(),
            exceptions: HashSet::new(),
            manifolds: Vec::new(),
            broad_phase: config.broad_phase_kind.build(),
            config,
            aabbs: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /*
     * Stepping.
     */
    /// Advances the simulation by one step.
    ///
    /// Bodies are integrated first, then every solver iteration solves the
    /// constraints and the collisions. Shape matching, raycasts, area bodies
    /// and sleeping are updated once at the end.
    pub fn step(&mut self) {
        if !self.config.enabled {
            return;
        }

        let ctx = StepContext {
            gravity: self.config.gravity,
            time_scale: self.config.time_scale,
        };

        for h in &self.order {
            let body = &mut self.bodies[h.0];
            if body.enabled {
                body.update(&ctx);
            }
        }
        for h in &self.order {
            let body = &mut self.bodies[h.0];
            if body.enabled {
                body.emit_pre_step();
            }
        }

        let pairs_once = self.config.broad_phase
            && matches!(self.config.broad_phase_kind, BroadPhaseKind::SpatialHash { .. });
        if self.config.broad_phase {
            self.update_aabbs();
            self.sort_order();
        }
        if pairs_once {
            self.find_candidate_pairs();
        }

        let mut contacts = Vec::new();
        for _ in 0..self.config.iterations.max(1) {
            self.update_constraints(&ctx);
            self.update_aabbs();
            self.manifolds.clear();

            if !pairs_once {
                self.find_candidate_pairs();
            }

            for k in 0..self.pairs.len() {
                let (i, j) = self.pairs[k];
                let (a, b) = (self.order[i], self.order[j]);
                if !self.may_collide(a, b) {
                    continue;
                }
                self.collect_collisions(a, b, &mut contacts);
                if !contacts.is_empty() {
                    let contacts = core::mem::take(&mut contacts);
                    self.manifolds.push(Manifold::new(&self.bodies, a, b, contacts));
                }
            }

            for manifold in &mut self.manifolds {
                manifold.solve(&mut self.bodies);
            }
            for manifold in &mut self.manifolds {
                manifold.solve_friction_and_velocities(&mut self.bodies);
            }

            self.solve_self_collisions();
        }

        log::trace!(
            "{} candidate pairs, {} manifolds in the last iteration.",
            self.pairs.len(),
            self.manifolds.len()
        );

        for h in &self.order {
            let body = &mut self.bodies[h.0];
            let matches_shape = body.as_soft().is_some_and(|s| s.shape_matching);
            if matches_shape && body.enabled && !body.sleeping && !body.is_static() {
                body.apply_shape_matching(&ctx);
            }
        }

        self.update_aabbs();
        self.update_raycasts();
        self.check_area_bodies();
        self.update_islands();

        for h in &self.order {
            self.bodies[h.0].emit_step();
        }
    }

    fn update_aabbs(&mut self) {
        for h in &self.order {
            self.bodies[h.0].update_aabb();
        }
    }

    /// Sorts the bodies by the left side of their box.
    fn sort_order(&mut self) {
        let bodies = &self.bodies;
        self.order.sort_by(|a, b| {
            let (a, b) = (bodies[a.0].aabb(), bodies[b.0].aabb());
            a.mins
                .x
                .total_cmp(&b.mins.x)
                .then_with(|| b.maxs.y.total_cmp(&a.maxs.y))
        });
    }

    /// Fills `self.pairs` with candidate pairs of indices into `self.order`,
    /// smallest index first.
    fn find_candidate_pairs(&mut self) {
        self.pairs.clear();
        self.aabbs.clear();
        self.aabbs
            .extend(self.order.iter().map(|h| *self.bodies[h.0].aabb()));

        if self.config.broad_phase {
            self.broad_phase.find_pairs(&self.aabbs, &mut self.pairs);
        } else {
            let n = self.aabbs.len();
            for i in 0..n {
                for j in i + 1..n {
                    self.pairs.push((i, j));
                }
            }
        }
    }

    fn may_collide(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a.0), self.bodies.get(b.0)) else {
            return false;
        };
        Body::can_collide(body_a, body_b)
            && body_a.aabb().intersects(body_b.aabb())
            && !self.has_collision_exception(a, b)
    }

    fn update_constraints(&mut self, ctx: &StepContext) {
        for h in &self.order {
            let body = &mut self.bodies[h.0];
            if body.enabled && body.is_soft() && !body.sleeping && !body.is_static() {
                body.update_mesh_constraints(ctx);
            }
        }

        for (_, spring) in self.springs.iter() {
            solve_world_spring(&mut self.bodies, spring);
        }

        for (_, joint) in self.joints.iter() {
            joint.update(&mut self.bodies);
        }
    }

    fn solve_self_collisions(&mut self) {
        use CollisionBehavior::{Circles, Polyline};

        let mut contacts = Vec::new();
        for k in 0..self.order.len() {
            let handle = self.order[k];
            let body = &self.bodies[handle.0];
            let Some(soft) = body.as_soft() else {
                continue;
            };
            if !soft.self_collisions || !body.enabled || body.sleeping || body.is_static() {
                continue;
            }
            let radius = soft.self_collisions_specified_radius;
            let area_preserving = soft.area_preserving();
            let mesh_count = body.meshes().len();

            for ma in 0..mesh_count {
                for mb in 0..mesh_count {
                    let body = &self.bodies[handle.0];
                    let a = MeshView::new(body, handle, ma);
                    let b = MeshView::new(body, handle, mb);

                    if ma == mb {
                        contact_circles_self(&a.all(), radius, &mut contacts);
                    } else {
                        contact_circles_circles(
                            &a.all(),
                            &b.all(),
                            body.aabb(),
                            radius,
                            false,
                            &mut contacts,
                        );
                    }
                    self.solve_contacts(handle, handle, &mut contacts);

                    let body = &self.bodies[handle.0];
                    let a = MeshView::new(body, handle, ma);
                    let b = MeshView::new(body, handle, mb);
                    match (a.mesh.collision_behavior(), b.mesh.collision_behavior()) {
                        (Polyline, Polyline) if !area_preserving => {
                            contact_polyline_polygon(&a.polygon(), &b.polygon(), &mut contacts);
                        }
                        (Circles, Polyline) => {
                            let aabb = body.aabb();
                            contact_polyline_polyline(&a.all(), &b.polygon(), aabb, &mut contacts);
                        }
                        _ => {}
                    }
                    self.solve_contacts(handle, handle, &mut contacts);
                }
            }
        }
    }

    /// Solves `contacts` right away, without friction, and empties the buffer.
    fn solve_contacts(&mut self, a: BodyHandle, b: BodyHandle, contacts: &mut Vec<Contact>) {
        if contacts.is_empty() {
            return;
        }
        let mut manifold = Manifold::new(&self.bodies, a, b, core::mem::take(contacts));
        manifold.solve(&mut self.bodies);
    }

    /*
     * Narrow phase.
     */
    /// The contacts between every mesh of `a` and every mesh of `b`.
    ///
    /// Returns no contact if one of the handles is not in this world. The
    /// layers, exceptions and sleep state of the bodies are not checked.
    pub fn get_collisions(&self, a: BodyHandle, b: BodyHandle) -> Vec<Contact> {
        let mut contacts = Vec::new();
        self.collect_collisions(a, b, &mut contacts);
        contacts
    }

    fn collect_collisions(&self, a: BodyHandle, b: BodyHandle, out: &mut Vec<Contact>) {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(a.0), self.bodies.get(b.0)) else {
            return;
        };
        let both_soft = body_a.simulation_model() == SimulationModel::MassSpring
            && body_b.simulation_model() == SimulationModel::MassSpring;

        for ia in 0..body_a.meshes().len() {
            for ib in 0..body_b.meshes().len() {
                let va = MeshView::new(body_a, a, ia);
                let vb = MeshView::new(body_b, b, ib);
                collide_meshes(&va, &vb, both_soft, out);
            }
        }
    }

    /// Pushes `body` out of every body it overlaps.
    ///
    /// Returns `true` if a collision was found.
    pub fn collide_with_world(&mut self, body: BodyHandle) -> bool {
        let Some(target) = self.bodies.get(body.0) else {
            return false;
        };
        if !target.enabled {
            return false;
        }

        let others: Vec<BodyHandle> = self
            .order
            .iter()
            .copied()
            .filter(|other| *other != body && self.may_collide(body, *other))
            .collect();

        let mut manifolds = Vec::new();
        for other in others {
            let contacts = self.get_collisions(body, other);
            if !contacts.is_empty() {
                manifolds.push(Manifold::new(&self.bodies, body, other, contacts));
            }
        }

        for manifold in &mut manifolds {
            manifold.solve(&mut self.bodies);
        }
        for manifold in &mut manifolds {
            manifold.solve_friction_and_velocities(&mut self.bodies);
        }

        !manifolds.is_empty()
    }

    /// Moves `body` to `position`, then pushes it out of the bodies it overlaps.
    ///
    /// Returns `true` if a collision was found.
    pub fn set_body_position_and_collide(
        &mut self,
        body: BodyHandle,
        position: Point<Real>,
        with_previous: bool,
    ) -> Result<bool, WorldError> {
        let target = self.body_mut(body).ok_or(WorldError::UnknownBody(body))?;
        target.set_position(position, with_previous);
        target.update_aabb();
        Ok(self.collide_with_world(body))
    }

    /*
     * Point queries.
     */
    /// The bodies containing `point`, at most `max_count` of them.
    ///
    /// Circle particles contain the points closer than their radius, polygons
    /// the points inside one of their convex pieces. When given, `layers_bit`
    /// restricts the search to the bodies on one of these layers.
    pub fn bodies_hit_by_point(
        &self,
        point: Point<Real>,
        max_count: usize,
        only_rigid: bool,
        layers_bit: Option<u32>,
    ) -> Vec<BodyHandle> {
        use CollisionBehavior::{Circles, Polygons, Polyline};

        let mut result = Vec::new();

        for h in &self.order {
            if result.len() >= max_count {
                break;
            }
            let body = &self.bodies[h.0];
            if !body.enabled || (only_rigid && !body.is_rigid()) {
                continue;
            }
            if layers_bit.is_some_and(|bits| !body.overlaps_layers(bits)) {
                continue;
            }
            if !body.aabb().contains_local_point(&point) {
                continue;
            }

            let hit = (0..body.meshes().len()).any(|m| {
                let view = MeshView::new(body, *h, m);
                let behavior = view.mesh.collision_behavior();
                let by_particle = matches!(behavior, Circles | Polyline)
                    && view
                        .mesh
                        .particles()
                        .iter()
                        .any(|p| (point - p.position).norm() < p.radius);
                let by_polygon = matches!(behavior, Polygons | Polyline)
                    && view.sub_polygons().any(|sub| point_in_convex_group(&point, &sub));
                by_particle || by_polygon
            });

            if hit {
                result.push(*h);
            }
        }

        result
    }

    /// The particles closer than `distance` to `point`, at most `max_count` of them.
    pub fn particles_close_to_point(
        &self,
        point: Point<Real>,
        distance: Real,
        max_count: usize,
        except_rigid: bool,
        layers_bit: Option<u32>,
    ) -> Vec<ParticleId> {
        let mut result = Vec::new();

        'bodies: for h in &self.order {
            let body = &self.bodies[h.0];
            if !body.enabled || (except_rigid && body.is_rigid()) {
                continue;
            }
            if layers_bit.is_some_and(|bits| !body.overlaps_layers(bits)) {
                continue;
            }
            let mut reach = *body.aabb();
            reach.loosen(distance);
            if !reach.contains_local_point(&point) {
                continue;
            }

            for (m, mesh) in body.meshes().iter().enumerate() {
                for (i, particle) in mesh.particles().iter().enumerate() {
                    if result.len() >= max_count {
                        break 'bodies;
                    }
                    if (point - particle.position).norm() < distance {
                        result.push(ParticleId::new(*h, m, i));
                    }
                }
            }
        }

        result
    }

    /*
     * Bodies.
     */
    /// Inserts a body and returns its handle.
    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        body.update_aabb();
        let handle = BodyHandle(self.bodies.insert(body));
        self.order.push(handle);
        handle
    }

    /// Removes a body, with every joint, world spring and collision exception
    /// attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body, WorldError> {
        let body = self
            .bodies
            .try_remove(handle.0)
            .ok_or(WorldError::UnknownBody(handle))?;

        self.order.retain(|h| *h != handle);
        self.remove_matching_collision_exceptions(handle);
        self.joints.retain(|_, joint| !joint.involves(handle));
        self.springs
            .retain(|_, spring| spring.a.body != handle && spring.b.body != handle);
        for (_, other) in self.bodies.iter_mut() {
            if let BodyKind::Area(area) = &mut other.kind {
                area.remove(handle);
            }
        }
        self.manifolds.clear();

        Ok(body)
    }

    /// The body with the given handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    /// The body with the given handle, mutably.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    /// Every body, in processing order.
    ///
    /// While the broad phase is enabled, bodies are sorted by the left side of
    /// their box at every step.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.order.iter().map(move |h| (*h, &self.bodies[h.0]))
    }

    /// The number of bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The particle identified by `id`.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.bodies.get(id.body.0)?.particle(&id)
    }

    /// The particle identified by `id`, mutably.
    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.bodies.get_mut(id.body.0)?.particle_mut(&id)
    }

    /// Removes every body, with their joints, springs and collision exceptions.
    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
        self.order.clear();
        self.joints.clear();
        self.springs.clear();
        self.exceptions.clear();
        self.manifolds.clear();
    }

    /*
     * Joints.
     */
    /// Inserts a joint. Unless the joint allows it, its two bodies stop colliding.
    pub fn add_joint(&mut self, joint: Joint) -> JointHandle {
        if let (Some(a), Some(b)) = (joint.body_a(), joint.body_b()) {
            if !joint.collisions_enabled() {
                self.add_collision_exception(a, b);
            }
        }
        JointHandle(self.joints.insert(joint))
    }

    /// Removes a joint and the collision exception it added.
    pub fn remove_joint(&mut self, handle: JointHandle) -> Result<Joint, WorldError> {
        let joint = self
            .joints
            .try_remove(handle.0)
            .ok_or(WorldError::UnknownJoint(handle))?;
        if let (Some(a), Some(b)) = (joint.body_a(), joint.body_b()) {
            if !joint.collisions_enabled() {
                self.remove_collision_exception(a, b);
            }
        }
        Ok(joint)
    }

    /// The joint with the given handle.
    pub fn joint(&self, handle: JointHandle) -> Option<&Joint> {
        self.joints.get(handle.0)
    }

    /// The joint with the given handle, mutably.
    pub fn joint_mut(&mut self, handle: JointHandle) -> Option<&mut Joint> {
        self.joints.get_mut(handle.0)
    }

    /// Every joint.
    pub fn joints(&self) -> impl Iterator<Item = (JointHandle, &Joint)> {
        self.joints.iter().map(|(i, j)| (JointHandle(i), j))
    }

    /// Lets the two bodies of a joint collide, or not.
    pub fn set_joint_collisions_enabled(
        &mut self,
        handle: JointHandle,
        enabled: bool,
    ) -> Result<(), WorldError> {
        let joint = self
            .joints
            .get_mut(handle.0)
            .ok_or(WorldError::UnknownJoint(handle))?;
        if joint.collisions_enabled == enabled {
            return Ok(());
        }
        joint.collisions_enabled = enabled;

        if let (Some(a), Some(b)) = (joint.body_a(), joint.body_b()) {
            if enabled {
                self.remove_collision_exception(a, b);
            } else {
                self.add_collision_exception(a, b);
            }
        }
        Ok(())
    }

    /// Removes every joint and the collision exceptions they added.
    pub fn clear_joints(&mut self) {
        for (_, joint) in self.joints.iter() {
            if let (Some(a), Some(b)) = (joint.body_a(), joint.body_b()) {
                if !joint.collisions_enabled() {
                    let _ = self.exceptions.remove(&SortedPair::new(a, b));
                }
            }
        }
        self.joints.clear();
    }

    /*
     * Springs.
     */
    /// Inserts a spring between two particles of the world.
    pub fn add_spring(&mut self, spring: WorldSpring) -> Result<SpringHandle, WorldError> {
        for id in [spring.a, spring.b] {
            if self.particle(id).is_none() {
                return Err(WorldError::UnknownParticle(id));
            }
        }
        Ok(SpringHandle(self.springs.insert(spring)))
    }

    /// Inserts a spring with the current distance between its particles as rest length.
    pub fn add_spring_between(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        internal: bool,
    ) -> Result<SpringHandle, WorldError> {
        let pa = self.particle(a).ok_or(WorldError::UnknownParticle(a))?;
        let pb = self.particle(b).ok_or(WorldError::UnknownParticle(b))?;
        let length = (pb.position - pa.position).norm();
        self.add_spring(WorldSpring::with_length(a, b, length, internal))
    }

    /// Removes a spring.
    pub fn remove_spring(&mut self, handle: SpringHandle) -> Result<WorldSpring, WorldError> {
        self.springs
            .try_remove(handle.0)
            .ok_or(WorldError::UnknownSpring(handle))
    }

    /// The spring with the given handle.
    pub fn spring(&self, handle: SpringHandle) -> Option<&WorldSpring> {
        self.springs.get(handle.0)
    }

    /// The spring with the given handle, mutably.
    pub fn spring_mut(&mut self, handle: SpringHandle) -> Option<&mut WorldSpring> {
        self.springs.get_mut(handle.0)
    }

    /// Every world spring.
    pub fn springs(&self) -> impl Iterator<Item = (SpringHandle, &WorldSpring)> {
        self.springs.iter().map(|(i, s)| (SpringHandle(i), s))
    }

    /// Removes every world spring.
    pub fn clear_springs(&mut self) {
        self.springs.clear();
    }

    /*
     * Raycasts.
     */
    /// Inserts a raycast, updated at the end of every step.
    pub fn add_raycast(&mut self, raycast: Raycast) -> RaycastHandle {
        RaycastHandle(self.raycasts.insert(raycast))
    }

    /// Removes a raycast.
    pub fn remove_raycast(&mut self, handle: RaycastHandle) -> Result<Raycast, WorldError> {
        self.raycasts
            .try_remove(handle.0)
            .ok_or(WorldError::UnknownRaycast(handle))
    }

    /// The raycast with the given handle.
    pub fn raycast(&self, handle: RaycastHandle) -> Option<&Raycast> {
        self.raycasts.get(handle.0)
    }

    /// The raycast with the given handle, mutably.
    pub fn raycast_mut(&mut self, handle: RaycastHandle) -> Option<&mut Raycast> {
        self.raycasts.get_mut(handle.0)
    }

    /// Removes every raycast.
    pub fn clear_raycasts(&mut self) {
        self.raycasts.clear();
    }

    /*
     * Collision exceptions.
     */
    /// Prevents `a` and `b` from colliding.
    pub fn add_collision_exception(&mut self, a: BodyHandle, b: BodyHandle) {
        let _ = self.exceptions.insert(SortedPair::new(a, b));
    }

    /// Lets `a` and `b` collide again.
    pub fn remove_collision_exception(&mut self, a: BodyHandle, b: BodyHandle) {
        let _ = self.exceptions.remove(&SortedPair::new(a, b));
    }

    /// Removes every collision exception involving `body`.
    pub fn remove_matching_collision_exceptions(&mut self, body: BodyHandle) {
        self.exceptions.retain(|pair| !pair.contains(&body));
    }

    /// Are `a` and `b` prevented from colliding?
    pub fn has_collision_exception(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.exceptions.contains(&SortedPair::new(a, b))
    }

    /// Removes every collision exception, including the ones added by joints.
    pub fn clear_collision_exceptions(&mut self) {
        self.exceptions.clear();
    }

    /// Removes everything from this world. The configuration is kept.
    pub fn clear(&mut self) {
        self.clear_bodies();
        self.clear_raycasts();
        self.clear_collision_exceptions();
    }

    /*
     * Configuration.
     */
    /// The configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The manifolds solved during the last iteration of the last step.
    pub fn manifolds(&self) -> &[Manifold] {
        &self.manifolds
    }

    /// The gravity.
    pub fn gravity(&self) -> Vector<Real> {
        self.config.gravity
    }

    /// Sets the gravity.
    pub fn set_gravity(&mut self, gravity: Vector<Real>) {
        self.config.gravity = gravity;
    }

    /// The number of solver iterations per step.
    pub fn iterations(&self) -> u32 {
        self.config.iterations
    }

    /// Sets the number of solver iterations per step, at least one.
    pub fn set_iterations(&mut self, iterations: u32) {
        self.config.iterations = iterations.max(1);
    }

    /// The time scale.
    pub fn time_scale(&self) -> Real {
        self.config.time_scale
    }

    /// Sets the time scale.
    pub fn set_time_scale(&mut self, time_scale: Real) {
        self.config.time_scale = time_scale;
    }

    /// Is sleeping enabled?
    pub fn sleeping_enabled(&self) -> bool {
        self.config.sleeping
    }

    /// Enables or disables sleeping. Disabling it wakes every body up.
    pub fn set_sleeping_enabled(&mut self, enabled: bool) {
        self.config.sleeping = enabled;
        if !enabled {
            for (_, body) in self.bodies.iter_mut() {
                body.wake_up();
            }
        }
    }

    /// Sets the motion tolerances under which a body counts as still.
    pub fn set_sleeping_tolerances(&mut self, position: Real, rotation: Real) {
        self.config.sleeping_position_tolerance = position;
        self.config.sleeping_rotation_tolerance = rotation;
    }

    /// Sets the number of still steps after which an island falls asleep.
    pub fn set_sleep_tick(&mut self, sleep_tick: u32) {
        self.config.sleep_tick = sleep_tick;
    }

    /// Is the broad phase enabled?
    pub fn broad_phase_enabled(&self) -> bool {
        self.config.broad_phase
    }

    /// Enables or disables the broad phase.
    pub fn set_broad_phase_enabled(&mut self, enabled: bool) {
        self.config.broad_phase = enabled;
    }

    /// Replaces the broad phase.
    pub fn set_broad_phase_kind(&mut self, kind: BroadPhaseKind) {
        self.config.broad_phase_kind = kind;
        self.broad_phase = kind.build();
    }

    /// Is this world stepped?
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enables or disables stepping.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }
}

/// Collides two meshes according to their collision behaviors.
fn collide_meshes(a: &MeshView, b: &MeshView, both_soft: bool, out: &mut Vec<Contact>) {
    use CollisionBehavior::*;

    match (a.mesh.collision_behavior(), b.mesh.collision_behavior()) {
        (Polygons, Polygons) => {
            for sub_a in a.sub_polygons() {
                for sub_b in b.sub_polygons() {
                    contact_polygon_polygon(&sub_a, &sub_b, out);
                }
            }
        }
        (Circles, Polygons) => {
            for sub in b.sub_polygons() {
                contact_circles_polygon(&a.all(), &sub, out);
            }
        }
        (Polygons, Circles) => collide_meshes(b, a, both_soft, out),
        (Circles, Circles) => {
            contact_circles_circles(&a.all(), &b.all(), b.body_aabb, None, false, out);
        }
        (Polyline, Polygons) => {
            let polyline = a.polygon();
            for sub in b.sub_polygons() {
                contact_circles_polygon(&polyline, &sub, out);
                contact_polyline_polygon(&polyline, &sub, out);
            }
        }
        (Polygons, Polyline) => collide_meshes(b, a, both_soft, out),
        (Polyline, Polyline) => {
            if both_soft {
                let (pa, pb) = (a.polygon(), b.polygon());
                contact_circles_circles(&pa, &pb, b.body_aabb, None, false, out);
                contact_polyline_polyline(&pa, &pb, b.body_aabb, out);
                contact_polyline_polyline(&pb, &pa, a.body_aabb, out);
            }
        }
        (Polyline, Circles) => {
            contact_circles_circles(&b.all(), &a.polygon(), a.body_aabb, None, false, out);
            contact_polyline_polyline(&b.all(), &a.polygon(), a.body_aabb, out);
        }
        (Circles, Polyline) => collide_meshes(b, a, both_soft, out),
    }
}

/// Pulls the ends of a world spring toward its rest length.
///
/// Springs between two sleeping bodies are skipped, and particles of static
/// bodies never move.
fn solve_world_spring(bodies: &mut Slab<Body>, spring: &WorldSpring) {
    let (Some(body_a), Some(body_b)) = (bodies.get(spring.a.body.0), bodies.get(spring.b.body.0))
    else {
        return;
    };
    if body_a.sleeping && body_b.sleeping {
        return;
    }
    let (Some(pa), Some(pb)) = (body_a.particle(&spring.a), body_b.particle(&spring.b)) else {
        return;
    };
    let Some((force_a, force_b)) = spring.solve(pa, pb, spring.rigidity, false) else {
        return;
    };

    for (id, force) in [(spring.a, force_a), (spring.b, force_b)] {
        if let Some(body) = bodies.get_mut(id.body.0) {
            if body.is_static() {
                continue;
            }
            if let Some(particle) = body.particle_mut(&id) {
                particle.apply_force(force);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyMode;

    fn ball(center: Point<Real>) -> Body {
        Body::rigid().with_mesh(Mesh::circle(5.0, center))
    }

    #[test]
    fn removing_a_body_cascades() {
        let mut world = World::default();
        let a = world.add_body(ball(Point::new(0.0, 0.0)));
        let b = world.add_body(ball(Point::new(20.0, 0.0)));
        let joint =
            Joint::new(&world, Some(a), Point::new(0.0, 0.0), Some(b), Point::new(20.0, 0.0))
                .unwrap();
        let _ = world.add_joint(joint);
        assert!(world.has_collision_exception(a, b));

        let _ = world.remove_body(a).unwrap();
        assert!(!world.has_collision_exception(a, b));
        assert_eq!(world.joints().count(), 0);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.remove_body(a).unwrap_err(), WorldError::UnknownBody(a));
    }

    #[test]
    fn joint_collisions_toggle_the_exception() {
        let mut world = World::default();
        let a = world.add_body(ball(Point::new(0.0, 0.0)));
        let b = world.add_body(ball(Point::new(8.0, 0.0)));
        let joint =
            Joint::new(&world, Some(a), Point::new(0.0, 0.0), Some(b), Point::new(8.0, 0.0))
                .unwrap();
        let handle = world.add_joint(joint);

        world.set_joint_collisions_enabled(handle, true).unwrap();
        assert!(!world.has_collision_exception(a, b));
        world.set_joint_collisions_enabled(handle, false).unwrap();
        assert!(world.has_collision_exception(a, b));
        let _ = world.remove_joint(handle).unwrap();
        assert!(!world.has_collision_exception(a, b));
    }

    #[test]
    fn point_queries_respect_shapes() {
        let mut world = World::default();
        let floor = Body::rigid()
            .with_mesh(Mesh::rectangle(Vector::new(100.0, 10.0), Point::origin()))
            .with_mode(BodyMode::Static);
        let floor = world.add_body(floor);
        let disk = world.add_body(ball(Point::new(200.0, 0.0)));

        assert_eq!(world.bodies_hit_by_point(Point::new(10.0, 2.0), 10, true, None), vec![floor]);
        assert_eq!(world.bodies_hit_by_point(Point::new(202.0, 1.0), 10, true, None), vec![disk]);
        assert!(world.bodies_hit_by_point(Point::new(204.5, 4.5), 10, true, None).is_empty());
        assert!(world.bodies_hit_by_point(Point::new(10.0, 2.0), 10, true, Some(2)).is_empty());

        let close = world.particles_close_to_point(Point::new(50.0, 5.0), 1.0, 10, false, None);
        assert_eq!(close.len(), 1);
        assert_eq!(close[0].body, floor);
    }

    #[test]
    fn springs_need_live_particles() {
        let mut world = World::default();
        let a = world.add_body(Body::soft().with_mesh(Mesh::circle(2.0, Point::new(0.0, 0.0))));
        let b = world.add_body(Body::soft().with_mesh(Mesh::circle(2.0, Point::new(10.0, 0.0))));
        let spring = world
            .add_spring_between(ParticleId::new(a, 0, 0), ParticleId::new(b, 0, 0), false)
            .unwrap();
        assert_relative_eq!(world.spring(spring).unwrap().length, 10.0);

        let missing = ParticleId::new(b, 0, 3);
        assert_eq!(
            world.add_spring_between(ParticleId::new(a, 0, 0), missing, false),
            Err(WorldError::UnknownParticle(missing))
        );

        let _ = world.remove_body(b).unwrap();
        assert_eq!(world.springs().count(), 0);
    }

    #[test]
    fn disabled_world_does_not_move() {
        let mut world = World::default();
        let h = world.add_body(ball(Point::new(0.0, 0.0)));
        world.set_enabled(false);
        world.step();
        assert_eq!(world.body(h).unwrap().position(), Point::new(0.0, 0.0));
        world.set_enabled(true);
        world.step();
        assert!(world.body(h).unwrap().position().y > 0.0);
    }
}
