//! Particle identifiers.
//!
//! Particles live in a flat arena and are addressed by index. A
//! `ParticleId` is only meaningful for the store (and the connection graph)
//! it was issued by; a resize rebuilds both and restarts numbering at 0.

use std::fmt;

/// Index of a particle in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// Create a new ParticleId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Slot in the store's buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Particle({})", self.0)
    }
}

impl From<u32> for ParticleId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ParticleId> for u32 {
    #[inline]
    fn from(id: ParticleId) -> Self {
        id.0
    }
}
