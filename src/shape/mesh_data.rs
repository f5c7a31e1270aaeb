use crate::math::{Point, Real, Vector};
use core::f32::consts::TAU;

/// Indicates an inconsistency in mesh authoring data.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshDataError {
    /// A per-particle attribute array does not have one entry per particle.
    #[error("the {attribute} array has {found} entries but there are {expected} particles.")]
    AttributeCountMismatch {
        /// The name of the offending attribute.
        attribute: &'static str,
        /// The number of particle positions.
        expected: usize,
        /// The number of entries found.
        found: usize,
    },
    /// A spring, polygon or UV map refers to a particle that does not exist.
    #[error("the particle index {index} is out of range (the mesh has {count} particles).")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of particles.
        count: usize,
    },
    /// A polygon needs at least three particles.
    #[error("a polygon needs at least 3 particles, found {0}.")]
    DegeneratePolygon(usize),
}

/// Authoring data of a mesh, usually produced by an external editor or by one
/// of the generators below.
///
/// Particle attributes are stored as parallel arrays. Empty optional arrays
/// (`particle_enabled`, `particle_lazy`, `particle_internal`) mean the default
/// value for every particle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshData {
    /// The local particle positions.
    pub particle_positions: Vec<Point<Real>>,
    /// One radius per particle.
    pub particle_radii: Vec<Real>,
    /// Optional internal flags.
    pub particle_internal: Vec<bool>,
    /// Optional enabled flags.
    pub particle_enabled: Vec<bool>,
    /// Optional lazy flags.
    pub particle_lazy: Vec<bool>,
    /// Boundary springs, as pairs of particle indices.
    pub springs: Vec<[usize; 2]>,
    /// Springs holding the inner structure of the mesh.
    pub internal_springs: Vec<[usize; 2]>,
    /// The closed polygon, as particle indices. Empty if the mesh has none.
    pub polygon: Vec<usize>,
    /// Texture mapping groups, as particle indices.
    pub uv_maps: Vec<Vec<usize>>,
    /// The position of the mesh relative to its body.
    pub position: Vector<Real>,
    /// The rotation of the mesh relative to its body.
    pub rotation: Real,
}

impl MeshData {
    /// A single particle of the given radius.
    pub fn circle(radius: Real, center: Point<Real>) -> Self {
        Self {
            particle_positions: vec![center],
            particle_radii: vec![radius],
            ..Default::default()
        }
    }

    /// A rectangle of the given size.
    ///
    /// Without a grid (both grid components `<= 1`) this is four corner
    /// particles, four boundary springs and two cross springs. Otherwise the
    /// rectangle is filled with a `grid.x` by `grid.y` cell lattice of
    /// particles; the polygon follows the boundary and the inner particles are
    /// internal.
    pub fn rectangle(
        size: Vector<Real>,
        center: Point<Real>,
        grid: [usize; 2],
        particle_radius: Real,
    ) -> Self {
        let half = size * 0.5;
        let mut res = Self::default();

        if grid[0] <= 1 && grid[1] <= 1 {
            res.particle_positions = vec![
                center + Vector::new(-half.x, -half.y),
                center + Vector::new(half.x, -half.y),
                center + Vector::new(half.x, half.y),
                center + Vector::new(-half.x, half.y),
            ];
            res.particle_radii = vec![particle_radius; 4];
            res.particle_internal = vec![false; 4];
            res.polygon = vec![0, 1, 2, 3];
            res.springs = vec![[0, 1], [1, 2], [2, 3], [3, 0]];
            res.internal_springs = vec![[0, 2], [1, 3]];
            return res;
        }

        let [gx, gy] = grid.map(|g| g.max(1));
        let cell = Vector::new(size.x / gx as Real, size.y / gy as Real);
        let row = gx + 1;

        for iy in 0..=gy {
            for ix in 0..=gx {
                let offset = Vector::new(ix as Real * cell.x, iy as Real * cell.y);
                res.particle_positions.push(center - half + offset);
                res.particle_radii.push(particle_radius);
                res.particle_internal
                    .push(!(ix == 0 || ix == gx || iy == 0 || iy == gy));
            }
        }

        let mut boundary = Vec::new();
        for i in 0..res.particle_positions.len() {
            let (ix, iy) = (i % row, i / row);

            if ix != gx {
                // Boundary springs run clockwise on screen: left to right on top,
                // right to left at the bottom.
                let spring = if iy == 0 { [i, i + 1] } else { [i + 1, i] };
                if iy == 0 || iy == gy {
                    boundary.push(spring);
                } else {
                    res.internal_springs.push(spring);
                }
            }
            if ix != gx && iy != gy {
                res.internal_springs.push([i, i + row + 1]);
            }
            if ix != 0 && iy != gy {
                res.internal_springs.push([i, i + row - 1]);
            }
            if iy != gy {
                let spring = if ix == 0 { [i + row, i] } else { [i, i + row] };
                if ix == 0 || ix == gx {
                    boundary.push(spring);
                } else {
                    res.internal_springs.push(spring);
                }
            }
        }

        res.springs = chain_springs(boundary);
        res.polygon = res.springs.iter().map(|s| s[0]).collect();
        res
    }

    /// A regular polygon with `sides` particles on a circle of radius `radius`.
    ///
    /// With `polar_grid >= 0`, construction springs link every boundary particle
    /// to its neighbors two steps away. With `polar_grid > 0`, `polar_grid - 1`
    /// inner rings and a center particle are added, all internal.
    pub fn regular_polygon(
        radius: Real,
        sides: usize,
        center: Point<Real>,
        polar_grid: i32,
        particle_radius: Real,
    ) -> Self {
        let mut res = Self::default();
        let angle_step = TAU / sides as Real;

        for i in 0..sides {
            let dir = Vector::new((angle_step * i as Real).cos(), (angle_step * i as Real).sin());
            res.particle_positions.push(center + dir * radius);
            res.particle_radii.push(particle_radius);
            res.particle_internal.push(false);
            res.polygon.push(i);
            res.springs.push([i, (i + 1) % sides]);
        }

        if polar_grid < 0 {
            return res;
        }

        for i in 0..sides {
            res.internal_springs.push([(i + sides - 2) % sides, i]);
            res.internal_springs.push([i, (i + 2) % sides]);
        }

        if polar_grid == 0 {
            return res;
        }

        let ring_step = radius / polar_grid as Real;
        for ring in (1..polar_grid).rev() {
            let ring_radius = ring_step * ring as Real;
            for n in 0..sides {
                let angle = angle_step * n as Real;
                let dir = Vector::new(angle.cos(), angle.sin());
                res.particle_positions.push(center + dir * ring_radius);
                res.particle_radii.push(particle_radius);
                res.particle_internal.push(true);

                let last = res.particle_positions.len() - 1;
                if n != 0 {
                    res.internal_springs.push([last - 1, last]);
                }
            }

            let count = res.particle_positions.len();
            res.internal_springs.push([count - 1, count - sides]);

            // Lattice between this ring and the outer one.
            for n in count - sides..count {
                let outer = n - sides;
                let (outer_next, next) = if n == count - 1 {
                    (count - sides * 2, count - sides)
                } else {
                    (n - (sides - 1), n + 1)
                };
                res.internal_springs.push([n, outer]);
                res.internal_springs.push([n, outer_next]);
                res.internal_springs.push([next, outer]);
                res.internal_springs.push([next, outer_next]);
            }
        }

        res.particle_positions.push(center);
        res.particle_radii.push(particle_radius);
        res.particle_internal.push(true);
        let center_id = res.particle_positions.len() - 1;
        for i in center_id - sides..center_id {
            res.internal_springs.push([center_id, i]);
        }

        res
    }

    /// Checks that every array and index of this data is consistent.
    pub fn validate(&self) -> Result<(), MeshDataError> {
        let count = self.particle_positions.len();

        let attributes = [
            ("particle_radii", self.particle_radii.len(), false),
            ("particle_internal", self.particle_internal.len(), true),
            ("particle_enabled", self.particle_enabled.len(), true),
            ("particle_lazy", self.particle_lazy.len(), true),
        ];
        for (attribute, found, optional) in attributes {
            if found != count && !(optional && found == 0) {
                return Err(MeshDataError::AttributeCountMismatch {
                    attribute,
                    expected: count,
                    found,
                });
            }
        }

        let indices = self
            .springs
            .iter()
            .chain(&self.internal_springs)
            .flatten()
            .chain(&self.polygon)
            .chain(self.uv_maps.iter().flatten());
        for index in indices {
            if *index >= count {
                return Err(MeshDataError::IndexOutOfRange {
                    index: *index,
                    count,
                });
            }
        }

        if !self.polygon.is_empty() && self.polygon.len() < 3 {
            return Err(MeshDataError::DegeneratePolygon(self.polygon.len()));
        }

        Ok(())
    }
}

/// Reorders boundary springs so that each one starts where the previous one ends.
fn chain_springs(mut springs: Vec<[usize; 2]>) -> Vec<[usize; 2]> {
    if springs.is_empty() {
        return springs;
    }

    let mut ordered = vec![springs.remove(0)];
    while !springs.is_empty() {
        let end = ordered[ordered.len() - 1][1];
        match springs.iter().position(|s| s[0] == end) {
            Some(i) => ordered.push(springs.remove(i)),
            None => {
                log::debug!("Boundary springs do not form a closed chain.");
                ordered.append(&mut springs);
            }
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rectangle_boundary() {
        let data = MeshData::rectangle(Vector::new(2.0, 2.0), Point::origin(), [2, 2], 0.5);
        assert_eq!(data.particle_positions.len(), 9);
        assert_eq!(data.polygon, vec![0, 1, 2, 5, 8, 7, 6, 3]);
        assert_eq!(data.particle_internal.iter().filter(|i| **i).count(), 1);
        assert!(data.particle_internal[4]);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn polar_polygon() {
        let data = MeshData::regular_polygon(10.0, 6, Point::origin(), 2, 0.5);
        // One boundary ring, one inner ring, and the center.
        assert_eq!(data.particle_positions.len(), 13);
        assert_eq!(data.polygon.len(), 6);
        assert_eq!(data.particle_positions[12], Point::origin());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn invalid_data_is_rejected() {
        let mut data = MeshData::circle(4.0, Point::origin());
        data.springs.push([0, 3]);
        assert_eq!(
            data.validate(),
            Err(MeshDataError::IndexOutOfRange { index: 3, count: 1 })
        );

        let mut data = MeshData::circle(4.0, Point::origin());
        data.particle_radii.clear();
        assert!(matches!(
            data.validate(),
            Err(MeshDataError::AttributeCountMismatch { .. })
        ));
    }
}
