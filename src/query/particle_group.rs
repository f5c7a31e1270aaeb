use crate::bounding_volume::Aabb;
use crate::dynamics::{BodyHandle, ParticleId};
use crate::math::{Point, Real};
use crate::shape::{Mesh, Particle};

/// An ordered set of particles of one mesh, as seen by the narrow phase.
///
/// A group is either every particle of the mesh, or the particles listed by an
/// index slice of the mesh (its polygon or one of its convex pieces). Closed
/// shapes wrap around: the last particle is followed by the first.
#[derive(Copy, Clone, Debug)]
pub struct ParticleGroup<'a> {
    body: BodyHandle,
    mesh_index: usize,
    mesh: &'a Mesh,
    indices: Option<&'a [usize]>,
}

impl<'a> ParticleGroup<'a> {
    /// Every particle of `mesh`.
    pub fn all(body: BodyHandle, mesh_index: usize, mesh: &'a Mesh) -> Self {
        Self {
            body,
            mesh_index,
            mesh,
            indices: None,
        }
    }

    /// The particles of `mesh` listed by `indices`, in that order.
    pub fn indexed(
        body: BodyHandle,
        mesh_index: usize,
        mesh: &'a Mesh,
        indices: &'a [usize],
    ) -> Self {
        Self {
            body,
            mesh_index,
            mesh,
            indices: Some(indices),
        }
    }

    /// The polygon of `mesh`.
    pub fn polygon(body: BodyHandle, mesh_index: usize, mesh: &'a Mesh) -> Self {
        Self::indexed(body, mesh_index, mesh, mesh.polygon())
    }

    /// The number of particles of this group.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.map_or(self.mesh.particle_count(), <[usize]>::len)
    }

    /// Is this group empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The mesh index of the `k`-th particle of this group.
    #[inline]
    pub fn mesh_particle_index(&self, k: usize) -> usize {
        self.indices.map_or(k, |indices| indices[k])
    }

    /// The `k`-th particle of this group.
    #[inline]
    pub fn particle(&self, k: usize) -> &'a Particle {
        &self.mesh.particles()[self.mesh_particle_index(k)]
    }

    /// The world-space position of the `k`-th particle.
    #[inline]
    pub fn position(&self, k: usize) -> Point<Real> {
        self.particle(k).position
    }

    /// The identifier of the `k`-th particle.
    #[inline]
    pub fn id(&self, k: usize) -> ParticleId {
        ParticleId::new(self.body, self.mesh_index, self.mesh_particle_index(k))
    }

    /// The index preceding `k`, wrapping around.
    #[inline]
    pub fn prev(&self, k: usize) -> usize {
        (k + self.len() - 1) % self.len()
    }

    /// The index following `k`, wrapping around.
    #[inline]
    pub fn next(&self, k: usize) -> usize {
        (k + 1) % self.len()
    }

    /// The world-space positions of every particle, in group order.
    pub fn positions(&self) -> Vec<Point<Real>> {
        (0..self.len()).map(|k| self.position(k)).collect()
    }

    /// Are both groups the same particles of the same mesh?
    pub fn same_as(&self, other: &ParticleGroup) -> bool {
        self.body == other.body
            && self.mesh_index == other.mesh_index
            && self.indices == other.indices
    }

    /// Are the `i`-th and `j`-th particles of this group directly linked by a spring?
    pub fn connected_with_spring(&self, i: usize, j: usize) -> bool {
        self.mesh
            .is_connected_with_spring(self.mesh_particle_index(i), self.mesh_particle_index(j))
    }

    /// The bounding box of the particle disks of this group.
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::new_invalid();
        for k in 0..self.len() {
            aabb.take_disk(self.position(k), self.particle(k).radius);
        }
        aabb
    }
}
