use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use crate::shape::{segment_force_split, AngleConstraint, MeshData, MeshDataError, Particle, Spring};
use crate::transformation::convex_decomposition;
use crate::utils::rotated;
use core::f32::consts::{PI, TAU};

/// How the particles of a mesh take part in collisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CollisionBehavior {
    /// Every particle is an independent disk.
    Circles,
    /// The polygon of a rigid body, tested through its convex pieces.
    Polygons,
    /// The polygon of a soft body, which may be concave or even self-overlapping.
    Polyline,
}

/// Which parts of a [`MeshData`] are kept when building a [`Mesh`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshOptions {
    /// Keep the springs.
    pub springs: bool,
    /// Keep the polygon.
    pub polygon: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            springs: true,
            polygon: true,
        }
    }
}

/// A set of particles, optionally bounded by a closed polygon and held together
/// by springs.
///
/// Meshes are owned by a single body. Their particles are indexed by position
/// in [`Mesh::particles`], and every other part of the mesh (polygon, springs,
/// angle constraints, UV maps) refers to particles through these indices.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// The position of the mesh relative to its body.
    pub position: Vector<Real>,
    /// The rotation of the mesh relative to its body.
    pub rotation: Real,
    global_position: Point<Real>,
    global_rotation: Real,
    particles: Vec<Particle>,
    polygon: Vec<usize>,
    sub_polygons: Vec<Vec<usize>>,
    springs: Vec<Spring>,
    angle_constraints: Vec<AngleConstraint>,
    corner_constraints: Vec<AngleConstraint>,
    uv_maps: Vec<Vec<usize>>,
    disable_polygon_for_collisions: bool,
    rigid_owner: bool,
    behavior: CollisionBehavior,
    min_polygon_angle: Real,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// An empty mesh.
    pub fn new() -> Self {
        Self {
            position: Vector::zeros(),
            rotation: 0.0,
            global_position: Point::origin(),
            global_rotation: 0.0,
            particles: Vec::new(),
            polygon: Vec::new(),
            sub_polygons: Vec::new(),
            springs: Vec::new(),
            angle_constraints: Vec::new(),
            corner_constraints: Vec::new(),
            uv_maps: Vec::new(),
            disable_polygon_for_collisions: false,
            rigid_owner: true,
            behavior: CollisionBehavior::Circles,
            min_polygon_angle: PI * 0.3,
        }
    }

    /// A mesh made of a single disk.
    pub fn circle(radius: Real, center: Point<Real>) -> Self {
        Self::build(&MeshData::circle(radius, center), MeshOptions::default())
    }

    /// A four-corner rectangle with springs and a polygon.
    pub fn rectangle(size: Vector<Real>, center: Point<Real>) -> Self {
        Self::build(
            &MeshData::rectangle(size, center, [0, 0], 0.5),
            MeshOptions::default(),
        )
    }

    /// A regular polygon. See [`MeshData::regular_polygon`].
    pub fn regular_polygon(
        radius: Real,
        sides: usize,
        center: Point<Real>,
        polar_grid: i32,
    ) -> Self {
        Self::build(
            &MeshData::regular_polygon(radius, sides, center, polar_grid, 0.5),
            MeshOptions::default(),
        )
    }

    /// Builds a mesh from authoring data, after checking its consistency.
    pub fn from_mesh_data(data: &MeshData, options: MeshOptions) -> Result<Self, MeshDataError> {
        data.validate()?;
        Ok(Self::build(data, options))
    }

    fn build(data: &MeshData, options: MeshOptions) -> Self {
        let mut mesh = Self::new();

        for (i, pos) in data.particle_positions.iter().enumerate() {
            let mut particle = Particle::new(*pos, data.particle_radii[i]);
            particle.internal = data.particle_internal.get(i).copied().unwrap_or(false);
            particle.enabled = data.particle_enabled.get(i).copied().unwrap_or(true);
            particle.lazy = data.particle_lazy.get(i).copied().unwrap_or(false);
            mesh.particles.push(particle);
        }

        if options.polygon {
            mesh.polygon = data.polygon.clone();
        }

        if options.springs {
            for [a, b] in &data.springs {
                mesh.springs.push(Spring::new(&mesh.particles, *a, *b, false));
            }
            for [a, b] in &data.internal_springs {
                mesh.springs.push(Spring::new(&mesh.particles, *a, *b, true));
            }
        }

        mesh.uv_maps = data.uv_maps.clone();
        mesh.position = data.position;
        mesh.rotation = data.rotation;
        mesh.topology_changed();
        mesh
    }

    fn topology_changed(&mut self) {
        self.update_sub_polygons();
        self.update_collision_behavior();

        let n = self.polygon.len();
        self.corner_constraints = (0..n)
            .map(|i| {
                let corner = [
                    self.polygon[(i + n - 1) % n],
                    self.polygon[i],
                    self.polygon[(i + 1) % n],
                ];
                AngleConstraint::with_limits(
                    corner,
                    self.min_polygon_angle,
                    TAU - self.min_polygon_angle,
                )
            })
            .collect();
    }

    /*
     * Transform.
     */
    /// The world-space position of the mesh.
    pub fn global_position(&self) -> Point<Real> {
        self.global_position
    }

    /// The world-space rotation of the mesh.
    pub fn global_rotation(&self) -> Real {
        self.global_rotation
    }

    /// Places the mesh and its particles according to the pose of its body.
    ///
    /// For rigid bodies the previous particle positions keep the old ones, so
    /// they carry the implicit velocity. Otherwise the particles are teleported.
    pub fn update_transform(
        &mut self,
        body_position: &Point<Real>,
        body_rotation: Real,
        rigid: bool,
    ) {
        self.global_rotation = body_rotation + self.rotation;
        self.global_position = body_position + rotated(&self.position, body_rotation);

        for particle in &mut self.particles {
            let local = rotated(&particle.local_position.coords, self.global_rotation);
            let new_pos = self.global_position + local;
            particle.prev_position = if rigid { particle.position } else { new_pos };
            particle.position = new_pos;
        }
    }

    /*
     * Particles.
     */
    /// The particles of this mesh.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles of this mesh.
    ///
    /// Call [`Mesh::update_sub_polygons`] after moving local positions of
    /// polygon particles.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// The `i`-th particle.
    pub fn particle(&self, i: usize) -> Option<&Particle> {
        self.particles.get(i)
    }

    /// The `i`-th particle, mutably.
    pub fn particle_mut(&mut self, i: usize) -> Option<&mut Particle> {
        self.particles.get_mut(i)
    }

    /// Splits `force`, applied at `from`, between the particles `a` and `b`.
    ///
    /// See [`segment_force_split`](crate::shape::segment_force_split).
    pub fn apply_force_to_segment(
        &mut self,
        a: usize,
        b: usize,
        force: Vector<Real>,
        from: &Point<Real>,
    ) {
        let (ka, kb) =
            segment_force_split(&self.particles[a].position, &self.particles[b].position, from);
        self.particles[a].apply_force(force * ka);
        self.particles[b].apply_force(force * kb);
    }

    /// The number of particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Appends a particle and returns its index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.update_collision_behavior();
        self.particles.len() - 1
    }

    /// Removes the `i`-th particle, along with every spring, angle constraint and
    /// UV map using it. The particle is also dropped from the polygon, which is
    /// removed entirely if fewer than three particles remain.
    ///
    /// Indices above `i` shift down by one.
    pub fn remove_particle_at(&mut self, i: usize) -> Option<Particle> {
        if i >= self.particles.len() {
            return None;
        }

        let particle = self.particles.remove(i);
        let shift = |j: &mut usize| {
            if *j > i {
                *j -= 1
            }
        };

        self.polygon.retain(|j| *j != i);
        if self.polygon.len() < 3 {
            self.polygon.clear();
        }
        self.polygon.iter_mut().for_each(shift);

        self.springs.retain(|s| !s.involves(&i));
        for spring in &mut self.springs {
            shift(&mut spring.a);
            shift(&mut spring.b);
        }

        self.angle_constraints.retain(|c| !c.involves(i));
        for constraint in &mut self.angle_constraints {
            constraint.particles.iter_mut().for_each(shift);
        }

        self.uv_maps.retain(|map| !map.contains(&i));
        for map in &mut self.uv_maps {
            map.iter_mut().for_each(shift);
        }

        self.topology_changed();
        Some(particle)
    }

    /*
     * Polygon.
     */
    /// The indices of the particles forming the closed polygon. Empty if there is none.
    pub fn polygon(&self) -> &[usize] {
        &self.polygon
    }

    /// Replaces the polygon.
    pub fn set_polygon(&mut self, polygon: Vec<usize>) -> Result<(), MeshDataError> {
        if polygon.len() < 3 {
            return Err(MeshDataError::DegeneratePolygon(polygon.len()));
        }
        if let Some(index) = polygon.iter().find(|i| **i >= self.particles.len()) {
            return Err(MeshDataError::IndexOutOfRange {
                index: *index,
                count: self.particles.len(),
            });
        }

        self.polygon = polygon;
        self.topology_changed();
        Ok(())
    }

    /// Removes the polygon. The mesh then collides as a set of circles.
    pub fn remove_polygon(&mut self) {
        self.polygon.clear();
        self.topology_changed();
    }

    /// The world-space positions of the polygon particles.
    pub fn polygon_positions(&self) -> Vec<Point<Real>> {
        self.polygon.iter().map(|i| self.particles[*i].position).collect()
    }

    /// The convex pieces of the polygon, as particle indices.
    ///
    /// Empty if the polygon is missing or could not be decomposed.
    pub fn sub_polygons(&self) -> &[Vec<usize>] {
        &self.sub_polygons
    }

    /// Recomputes the convex pieces of the polygon from the local particle positions.
    pub fn update_sub_polygons(&mut self) {
        self.sub_polygons.clear();
        if self.polygon.is_empty() {
            return;
        }

        let points: Vec<_> = self
            .polygon
            .iter()
            .map(|i| self.particles[*i].local_position)
            .collect();

        match convex_decomposition(&points) {
            Some(pieces) => {
                self.sub_polygons = pieces
                    .into_iter()
                    .map(|piece| piece.into_iter().map(|k| self.polygon[k]).collect())
                    .collect();
            }
            None => log::warn!(
                "Decomposing a {}-sided polygon failed: it will not collide as a polygon.",
                points.len()
            ),
        }
    }

    /// Polygon corner angles below this value, or above `2π` minus this value,
    /// are pushed back by soft bodies.
    pub fn min_polygon_angle(&self) -> Real {
        self.min_polygon_angle
    }

    /// Sets the minimum polygon corner angle.
    pub fn set_min_polygon_angle(&mut self, angle: Real) {
        self.min_polygon_angle = angle;
        self.topology_changed();
    }

    pub(crate) fn corner_constraints_mut(&mut self) -> (&mut [Particle], &mut [AngleConstraint]) {
        (&mut self.particles, &mut self.corner_constraints)
    }

    /*
     * Collision behavior.
     */
    /// How this mesh collides.
    pub fn collision_behavior(&self) -> CollisionBehavior {
        self.behavior
    }

    /// Is the polygon ignored by collisions?
    pub fn polygon_for_collisions_disabled(&self) -> bool {
        self.disable_polygon_for_collisions
    }

    /// Makes the mesh collide as a set of circles even if it has a polygon.
    pub fn set_polygon_for_collisions_disabled(&mut self, disabled: bool) {
        self.disable_polygon_for_collisions = disabled;
        self.update_collision_behavior();
    }

    pub(crate) fn set_rigid_owner(&mut self, rigid: bool) {
        self.rigid_owner = rigid;
        self.update_collision_behavior();
    }

    fn update_collision_behavior(&mut self) {
        self.behavior = if self.polygon.is_empty() || self.disable_polygon_for_collisions {
            CollisionBehavior::Circles
        } else if self.rigid_owner {
            CollisionBehavior::Polygons
        } else {
            CollisionBehavior::Polyline
        };
    }

    /// Do the behaviors of `a` and `b` match `first` and `second`, in any order?
    pub fn check_collision_behaviors(
        a: &Mesh,
        b: &Mesh,
        first: CollisionBehavior,
        second: CollisionBehavior,
    ) -> bool {
        (a.behavior == first && b.behavior == second)
            || (b.behavior == first && a.behavior == second)
    }

    /*
     * Springs and constraints.
     */
    /// The springs of this mesh.
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Adds a spring between two particles of this mesh.
    pub fn add_spring(&mut self, spring: Spring) -> Result<(), MeshDataError> {
        self.check_indices(&[spring.a, spring.b])?;
        self.springs.push(spring);
        Ok(())
    }

    /// Removes the `i`-th spring.
    pub fn remove_spring_at(&mut self, i: usize) -> Option<Spring> {
        (i < self.springs.len()).then(|| self.springs.remove(i))
    }

    /// Removes every spring attached to the given particle.
    pub fn remove_matching_springs(&mut self, particle: usize) {
        self.springs.retain(|s| !s.involves(&particle));
    }

    /// Are the two particles directly linked by a spring?
    pub fn is_connected_with_spring(&self, a: usize, b: usize) -> bool {
        self.springs
            .iter()
            .any(|s| (s.a == a && s.b == b) || (s.a == b && s.b == a))
    }

    pub(crate) fn springs_and_particles_mut(&mut self) -> (&mut [Particle], &[Spring]) {
        (&mut self.particles, &self.springs)
    }

    /// The angle constraints of this mesh.
    pub fn angle_constraints(&self) -> &[AngleConstraint] {
        &self.angle_constraints
    }

    /// Adds an angle constraint between three particles of this mesh.
    pub fn add_angle_constraint(
        &mut self,
        constraint: AngleConstraint,
    ) -> Result<(), MeshDataError> {
        self.check_indices(&constraint.particles)?;
        self.angle_constraints.push(constraint);
        Ok(())
    }

    /// Removes the `i`-th angle constraint.
    pub fn remove_angle_constraint_at(&mut self, i: usize) -> Option<AngleConstraint> {
        (i < self.angle_constraints.len()).then(|| self.angle_constraints.remove(i))
    }

    /// Removes every angle constraint using the given particle.
    pub fn remove_matching_angle_constraints(&mut self, particle: usize) {
        self.angle_constraints.retain(|c| !c.involves(particle));
    }

    pub(crate) fn angle_constraints_and_particles_mut(
        &mut self,
    ) -> (&mut [Particle], &mut [AngleConstraint]) {
        (&mut self.particles, &mut self.angle_constraints)
    }

    fn check_indices(&self, indices: &[usize]) -> Result<(), MeshDataError> {
        match indices.iter().find(|i| **i >= self.particles.len()) {
            Some(index) => Err(MeshDataError::IndexOutOfRange {
                index: *index,
                count: self.particles.len(),
            }),
            None => Ok(()),
        }
    }

    /*
     * UV maps.
     */
    /// The texture mapping groups.
    pub fn uv_maps(&self) -> &[Vec<usize>] {
        &self.uv_maps
    }

    /// Adds a texture mapping group.
    pub fn add_uv_map(&mut self, map: Vec<usize>) -> Result<(), MeshDataError> {
        self.check_indices(&map)?;
        self.uv_maps.push(map);
        Ok(())
    }

    /// Removes the `i`-th texture mapping group.
    pub fn remove_uv_map_at(&mut self, i: usize) -> Option<Vec<usize>> {
        (i < self.uv_maps.len()).then(|| self.uv_maps.remove(i))
    }

    /// Removes every texture mapping group.
    pub fn clear_uv_maps(&mut self) {
        self.uv_maps.clear();
    }

    /*
     * Measures.
     */
    /// The area enclosed by the given particles, using their local or global positions.
    pub fn polygon_area_of(&self, indices: &[usize], local: bool) -> Real {
        let n = indices.len();
        let mut area = 0.0;
        for i in 0..n {
            let (a, b) = (&self.particles[indices[i]], &self.particles[indices[(i + 1) % n]]);
            let (a, b) = if local {
                (a.local_position, b.local_position)
            } else {
                (a.position, b.position)
            };
            area += (a.y + b.y) * (b.x - a.x) * 0.5;
        }
        area.abs()
    }

    fn disks_area(&self) -> Real {
        self.particles
            .iter()
            .filter(|p| p.has_volume())
            .map(|p| p.radius * p.radius)
            .sum()
    }

    /// The area of the polygon at rest.
    pub fn initial_polygons_area(&self) -> Real {
        self.polygon_area_of(&self.polygon, true)
    }

    /// The current area of the polygon.
    pub fn polygons_area(&self) -> Real {
        self.polygon_area_of(&self.polygon, false)
    }

    /// The area of the mesh at rest, counting the polygon and the disks of
    /// particles with a volume.
    pub fn initial_area(&self) -> Real {
        self.initial_polygons_area() + self.disks_area()
    }

    /// The current area of the mesh.
    pub fn area(&self) -> Real {
        self.polygons_area() + self.disks_area()
    }

    /// The perimeter of the polygon at rest.
    pub fn circumference(&self) -> Real {
        let n = self.polygon.len();
        (0..n)
            .map(|i| {
                let a = self.particles[self.polygon[i]].local_position;
                let b = self.particles[self.polygon[(i + 1) % n]].local_position;
                (b - a).norm()
            })
            .sum()
    }

    /// The bounding box of the particles. Radii only count for particles with a volume.
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for particle in &self.particles {
            if particle.has_volume() {
                aabb.merge(&particle.aabb());
            } else {
                aabb.take_point(particle.position);
            }
        }
        aabb
    }

    /// The best-fit position and rotation of the given particles, compared to
    /// their local layout.
    ///
    /// The position is the average of the global positions. The rotation is the
    /// average angle between each particle's local offset from the local center
    /// and its global offset from the average position.
    pub fn average_position_and_rotation(&self, indices: &[usize]) -> (Point<Real>, Real) {
        if indices.len() == 1 {
            return (self.particles[indices[0]].position, 0.0);
        }

        let count = indices.len() as Real;
        let mut average = Vector::zeros();
        let mut local_center = Vector::zeros();
        for i in indices {
            average += self.particles[*i].position.coords;
            local_center += self.particles[*i].local_position.coords;
        }
        average /= count;
        local_center /= count;

        let (mut cos, mut sin) = (0.0, 0.0);
        for i in indices {
            let particle = &self.particles[*i];
            let original = particle.local_position.coords - local_center;
            let relative = particle.position.coords - average;
            let lengths = original.norm() * relative.norm();
            if lengths != 0.0 {
                cos += original.dot(&relative) / lengths;
                sin += original.perp(&relative) / lengths;
            }
        }

        (Point::from(average), sin.atan2(cos))
    }

    /// Where the given particles would be if their local layout were centered
    /// on `position` and rotated by `rotation`.
    pub fn matching_positions(
        &self,
        indices: &[usize],
        position: &Point<Real>,
        rotation: Real,
    ) -> Vec<Point<Real>> {
        let local_center = indices
            .iter()
            .map(|i| self.particles[*i].local_position.coords)
            .sum::<Vector<Real>>()
            / indices.len().max(1) as Real;

        indices
            .iter()
            .map(|i| {
                let offset = self.particles[*i].local_position.coords - local_center;
                position + rotated(&offset, rotation)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_measures() {
        let mesh = Mesh::rectangle(Vector::new(4.0, 2.0), Point::origin());
        assert_eq!(mesh.collision_behavior(), CollisionBehavior::Polygons);
        assert_eq!(mesh.sub_polygons(), &[vec![0, 1, 2, 3]]);
        assert_relative_eq!(mesh.initial_area(), 8.0);
        assert_relative_eq!(mesh.circumference(), 12.0);
        assert_eq!(mesh.springs().len(), 6);
    }

    #[test]
    fn removing_a_particle_cascades() {
        let mut mesh = Mesh::rectangle(Vector::new(2.0, 2.0), Point::origin());
        mesh.add_uv_map(vec![0, 1, 2]).unwrap();
        mesh.add_uv_map(vec![2, 3]).unwrap();
        let _ = mesh.remove_particle_at(1);

        assert_eq!(mesh.polygon(), &[0, 1, 2]);
        assert_eq!(mesh.uv_maps(), &[vec![1, 2]]);
        assert!(mesh.springs().iter().all(|s| s.a < 3 && s.b < 3));
        assert!(mesh.is_connected_with_spring(1, 2));

        let _ = mesh.remove_particle_at(0);
        assert!(mesh.polygon().is_empty());
        assert_eq!(mesh.collision_behavior(), CollisionBehavior::Circles);
    }

    #[test]
    fn soft_owner_makes_polylines() {
        let mut mesh = Mesh::regular_polygon(10.0, 8, Point::origin(), -1);
        mesh.set_rigid_owner(false);
        assert_eq!(mesh.collision_behavior(), CollisionBehavior::Polyline);
        mesh.set_polygon_for_collisions_disabled(true);
        assert_eq!(mesh.collision_behavior(), CollisionBehavior::Circles);
    }

    #[test]
    fn best_fit_rotation() {
        let mut mesh = Mesh::rectangle(Vector::new(2.0, 2.0), Point::origin());
        mesh.update_transform(&Point::new(5.0, 3.0), 0.3, true);
        let indices: Vec<_> = (0..4).collect();
        let (pos, rot) = mesh.average_position_and_rotation(&indices);
        assert_relative_eq!(pos, Point::new(5.0, 3.0), epsilon = 1.0e-5);
        assert_relative_eq!(rot, 0.3, epsilon = 1.0e-5);

        let targets = mesh.matching_positions(&indices, &pos, rot);
        for (target, particle) in targets.iter().zip(mesh.particles()) {
            assert_relative_eq!(*target, particle.position, epsilon = 1.0e-5);
        }
    }
}
