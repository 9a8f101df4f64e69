//! R-tree based spatial index using the rstar crate.
//!
//! Finds every pair of particles closer than a threshold without the
//! all-pairs scan.

use glam::Vec3;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::ParticleId;

/// A point in the spatial index with associated particle ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePoint {
    /// The particle identifier.
    pub id: ParticleId,
    /// World position.
    pub position: [f32; 3],
}

impl ParticlePoint {
    pub fn new(id: ParticleId, position: Vec3) -> Self {
        Self {
            id,
            position: position.to_array(),
        }
    }
}

impl RTreeObject for ParticlePoint {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for ParticlePoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }

    fn contains_point(&self, point: &[f32; 3]) -> bool {
        self.distance_2(point) <= f32::EPSILON * f32::EPSILON
    }
}

/// Spatial index over a snapshot of particle positions.
///
/// Uses an R*-tree. The index does not track later movement; bulk-load it
/// again for a new snapshot.
pub struct SpatialIndex {
    tree: RTree<ParticlePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load positions; slot `i` gets `ParticleId(i)`.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let points: Vec<ParticlePoint> = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| ParticlePoint::new(ParticleId(i as u32), p))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Every unordered pair strictly closer than `threshold`, as
    /// `(lower id, higher id, distance)` sorted by ids.
    pub fn pairs_within(&self, threshold: f32) -> Vec<(ParticleId, ParticleId, f32)> {
        let threshold_sq = threshold * threshold;
        let mut pairs = Vec::new();
        for a in self.tree.iter() {
            for b in self.tree.locate_within_distance(a.position, threshold_sq) {
                if b.id <= a.id {
                    continue;
                }
                let d2 = a.distance_2(&b.position);
                if d2 < threshold_sq {
                    pairs.push((a.id, b.id, d2.sqrt()));
                }
            }
        }
        pairs.sort_unstable_by_key(|&(a, b, _)| (a, b));
        pairs
    }

    /// Get the number of particles in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(n: usize, step: f32) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * step, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_pairs_within_is_strict() {
        let index = SpatialIndex::from_positions(&line_of(4, 3.0));
        let pairs = index.pairs_within(6.0);
        let ids: Vec<_> = pairs.iter().map(|&(a, b, _)| (a.raw(), b.raw())).collect();
        // 0-2 and 1-3 sit exactly at 6.0 and are excluded.
        assert_eq!(ids, vec![(0, 1), (1, 2), (2, 3)]);
        assert!(pairs.iter().all(|&(_, _, d)| (d - 3.0).abs() < 1e-6));
    }

    #[test]
    fn test_empty() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(index.pairs_within(1.0).is_empty());
    }
}
