use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::partitioning::sweep_and_prune::sort_by_min_x;
use crate::partitioning::BroadPhase;
use crate::utils::SortedPair;
use hashbrown::{HashMap, HashSet};

/// How much the boxes are enlarged before being bucketed.
///
/// The spatial hash runs once per step while bodies keep moving during the
/// solver iterations.
const FAT_RATE: Real = 1.2;

/// A uniform-grid broad phase.
///
/// Every box is inserted in all the cells it touches. Boxes sharing a cell are
/// then swept against each other, and pairs found in several cells are
/// reported once.
#[derive(Clone, Debug)]
pub struct SpatialHash {
    cell_size: Real,
    cells: HashMap<(i32, i32), Vec<usize>>,
    seen: HashSet<SortedPair<usize>>,
    fat: Vec<Aabb>,
}

impl SpatialHash {
    /// Creates an empty spatial hash. Non-positive cell sizes are replaced by 1.
    pub fn new(cell_size: Real) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: HashMap::new(),
            seen: HashSet::new(),
            fat: Vec::new(),
        }
    }

    /// The side length of a cell.
    pub fn cell_size(&self) -> Real {
        self.cell_size
    }

    fn cell_of(&self, x: Real, y: Real) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    fn insert(&mut self, index: usize, aabb: &Aabb) {
        let min = self.cell_of(aabb.mins.x, aabb.mins.y);
        let max = self.cell_of(aabb.maxs.x, aabb.maxs.y);
        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                self.cells.entry((x, y)).or_default().push(index);
            }
        }
    }
}

impl BroadPhase for SpatialHash {
    fn find_pairs(&mut self, aabbs: &[Aabb], pairs: &mut Vec<(usize, usize)>) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.seen.clear();
        self.fat.clear();
        self.fat.extend(aabbs.iter().map(|aabb| aabb.fattened(FAT_RATE)));

        for i in 0..self.fat.len() {
            let aabb = self.fat[i];
            self.insert(i, &aabb);
        }

        let start = pairs.len();
        for bucket in self.cells.values_mut() {
            if bucket.len() < 2 {
                continue;
            }
            sort_by_min_x(&self.fat, bucket);
            for (k, i) in bucket.iter().enumerate() {
                let a = &self.fat[*i];
                for j in &bucket[k + 1..] {
                    let b = &self.fat[*j];
                    if a.maxs.x < b.mins.x {
                        break;
                    }
                    if a.overlaps_y(b) && self.seen.insert(SortedPair::new(*i, *j)) {
                        pairs.push((*i.min(j), *i.max(j)));
                    }
                }
            }
        }

        // Hash map iteration order is arbitrary.
        pairs[start..].sort_unstable();

        self.cells.retain(|_, bucket| !bucket.is_empty());
    }
}
