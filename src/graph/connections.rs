//! ConnectionGraph - static edge set between nearby particles.
//!
//! Topology is decided once, from the initial layout: every unordered pair
//! closer than the threshold becomes an edge. Afterwards only the live
//! distance and opacity stored on each edge are refreshed. Edges are never
//! added or removed, however far the particles drift; a far-apart pair
//! just renders at alpha 0.

use glam::Vec3;
use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use super::edge::{EdgeId, Link};
use super::node::ParticleId;
use crate::spatial::SpatialIndex;

/// The connection graph.
///
/// Node `i` of the petgraph graph is particle `i`, so node indices double
/// as arena slots and no id map is needed.
pub struct ConnectionGraph {
    /// Nodes store their ParticleId, edges store the Link payload.
    graph: StableGraph<ParticleId, Link, Undirected>,

    /// Construction threshold, reused as the opacity falloff distance.
    max_distance: f32,
}

impl ConnectionGraph {
    /// Build the edge set for `positions` (the initial layout).
    pub fn build(positions: &[Vec3], threshold: f32) -> Self {
        let index = SpatialIndex::from_positions(positions);
        let pairs = index.pairs_within(threshold);

        let mut graph = StableGraph::with_capacity(positions.len(), pairs.len());
        for i in 0..positions.len() {
            graph.add_node(ParticleId(i as u32));
        }
        for (a, b, distance) in pairs {
            graph.add_edge(
                NodeIndex::new(a.index()),
                NodeIndex::new(b.index()),
                Link::new(distance, threshold),
            );
        }

        Self {
            graph,
            max_distance: threshold,
        }
    }

    /// Refresh live distance and opacity of every edge from `positions`.
    ///
    /// `positions` must be the same arena the graph was built from.
    pub fn update(&mut self, positions: &[Vec3]) {
        let max_distance = self.max_distance;
        for edge in self.graph.edge_indices().collect::<Vec<_>>() {
            let Some((a, b)) = self.graph.edge_endpoints(edge) else {
                continue;
            };
            let (Some(&pa), Some(&pb)) = (positions.get(a.index()), positions.get(b.index()))
            else {
                continue;
            };
            if let Some(link) = self.graph.edge_weight_mut(edge) {
                link.update(pa.distance(pb), max_distance);
            }
        }
    }

    /// Get the number of particles (nodes).
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// All edges as `(lower, higher)` particle pairs, sorted.
    pub fn pairs(&self) -> Vec<(ParticleId, ParticleId)> {
        let mut pairs: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                let a = self.graph[e.source()];
                let b = self.graph[e.target()];
                if a < b { (a, b) } else { (b, a) }
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Iterate edges with their endpoints and payload.
    pub fn links(&self) -> impl Iterator<Item = (EdgeId, ParticleId, ParticleId, &Link)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                EdgeId(e.id().index() as u32),
                self.graph[e.source()],
                self.graph[e.target()],
                e.weight(),
            )
        })
    }

    /// Get neighbors of a particle.
    pub fn neighbors(&self, id: ParticleId) -> Vec<ParticleId> {
        let index = NodeIndex::new(id.index());
        if !self.graph.contains_node(index) {
            return Vec::new();
        }
        self.graph
            .neighbors(index)
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect()
    }
}
