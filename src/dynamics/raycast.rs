use crate::dynamics::{BodyHandle, World};
use crate::math::{Point, Real, Vector};
use crate::query::{cast_ray_on_circles, cast_ray_on_polygon, ParticleGroup, Ray};
use crate::shape::CollisionBehavior;
use crate::utils::rotated;

/// A ray hitting a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastContact {
    /// The body hit.
    pub body: BodyHandle,
    /// The hit point.
    pub position: Point<Real>,
    /// The normal of the surface at the hit point.
    pub normal: Vector<Real>,
    /// The distance from the ray origin to the hit, along the ray.
    pub distance: Real,
}

/// A ray cast again at the end of every step.
///
/// Only meshes colliding as circles or as rigid polygons are hit. Soft-body
/// polylines are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Raycast {
    /// The origin of the ray.
    pub position: Point<Real>,
    /// Report bodies containing the origin, with a hit at the origin itself.
    pub containing: bool,
    /// The layers hit by this ray.
    pub layers_bit: u32,
    ray: Vector<Real>,
    ray_original: Vector<Real>,
    rotation: Real,
    contacts: Vec<RaycastContact>,
}

impl Raycast {
    /// A ray going from `position` to `position + ray`.
    pub fn new(position: Point<Real>, ray: Vector<Real>, containing: bool) -> Self {
        Self {
            position,
            containing,
            layers_bit: 1,
            ray,
            ray_original: ray,
            rotation: 0.0,
            contacts: Vec::new(),
        }
    }

    /// The ray, rotated.
    pub fn ray(&self) -> Vector<Real> {
        self.ray
    }

    /// Sets the ray before rotation.
    pub fn set_ray(&mut self, ray: Vector<Real>) {
        self.ray_original = ray;
        self.ray = rotated(&ray, self.rotation);
    }

    /// The rotation applied to the ray.
    pub fn rotation(&self) -> Real {
        self.rotation
    }

    /// Rotates the ray.
    pub fn set_rotation(&mut self, rotation: Real) {
        self.rotation = rotation;
        self.ray = rotated(&self.ray_original, rotation);
    }

    /// The hits of the last step, nearest first.
    pub fn contacts(&self) -> &[RaycastContact] {
        &self.contacts
    }
}

impl World {
    /// Casts a ray from `origin` to `origin + ray` and returns the bodies it
    /// hits, nearest first.
    ///
    /// Each body reports at most one hit per mesh. With `containing`, bodies
    /// containing the origin are hit at the origin.
    pub fn raycast_to(
        &self,
        origin: Point<Real>,
        ray: Vector<Real>,
        layers_bit: u32,
        containing: bool,
    ) -> Vec<RaycastContact> {
        let query = Ray::new(origin, ray);
        let mut result = Vec::new();

        for (i, body) in self.bodies.iter() {
            if !body.enabled || !body.overlaps_layers(layers_bit) || !query.may_hit(body.aabb()) {
                continue;
            }

            let handle = BodyHandle(i);
            for (m, mesh) in body.meshes().iter().enumerate() {
                let hit = match mesh.collision_behavior() {
                    CollisionBehavior::Circles => {
                        let group = ParticleGroup::all(handle, m, mesh);
                        cast_ray_on_circles(&query, &group, containing)
                    }
                    CollisionBehavior::Polygons => {
                        let group = ParticleGroup::polygon(handle, m, mesh);
                        cast_ray_on_polygon(&query, &group, containing)
                    }
                    CollisionBehavior::Polyline => None,
                };

                if let Some(hit) = hit {
                    result.push(RaycastContact {
                        body: handle,
                        position: hit.position,
                        normal: hit.normal,
                        distance: hit.distance,
                    });
                }
            }
        }

        result.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        result
    }

    pub(crate) fn update_raycasts(&mut self) {
        let keys: Vec<usize> = self.raycasts.iter().map(|(i, _)| i).collect();
        for i in keys {
            let Raycast {
                position,
                ray,
                layers_bit,
                containing,
                ..
            } = self.raycasts[i];
            let contacts = self.raycast_to(position, ray, layers_bit, containing);
            self.raycasts[i].contacts = contacts;
        }
    }
}
