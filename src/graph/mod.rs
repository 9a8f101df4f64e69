//! Connection graph between particles.
//!
//! Uses petgraph's StableGraph with one node per particle slot and edges
//! stored as index pairs, so the graph never holds references into the
//! particle arena.

mod connections;
mod edge;
mod node;

pub use connections::ConnectionGraph;
pub use edge::{BASE_OPACITY, EdgeId, Link};
pub use node::ParticleId;
