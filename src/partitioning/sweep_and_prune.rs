use crate::bounding_volume::Aabb;
use crate::partitioning::BroadPhase;

/// Sorts `indices` by the left side of their box.
///
/// Ties put the box reaching lower on screen (largest `maxs.y`) first. The
/// sort is stable, so boxes already in order keep their order.
pub(crate) fn sort_by_min_x(aabbs: &[Aabb], indices: &mut [usize]) {
    indices.sort_by(|a, b| {
        let (a, b) = (&aabbs[*a], &aabbs[*b]);
        a.mins
            .x
            .total_cmp(&b.mins.x)
            .then_with(|| b.maxs.y.total_cmp(&a.maxs.y))
    });
}

/// Sweep-and-prune along the `x` axis.
///
/// Boxes are visited by increasing `mins.x`. For each box, the following ones
/// are tested until one starts right of its end, at which point no later box
/// can overlap it either.
#[derive(Clone, Debug, Default)]
pub struct SweepAndPrune {
    order: Vec<usize>,
}

impl SweepAndPrune {
    /// Creates an empty sweep-and-prune.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for SweepAndPrune {
    fn find_pairs(&mut self, aabbs: &[Aabb], pairs: &mut Vec<(usize, usize)>) {
        self.order.clear();
        self.order.extend(0..aabbs.len());
        sort_by_min_x(aabbs, &mut self.order);

        for (k, i) in self.order.iter().enumerate() {
            let a = &aabbs[*i];
            for j in &self.order[k + 1..] {
                let b = &aabbs[*j];
                if a.maxs.x < b.mins.x {
                    break;
                }
                if a.overlaps_y(b) {
                    pairs.push((*i.min(j), *i.max(j)));
                }
            }
        }
    }
}
