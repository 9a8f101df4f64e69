//! ParticleStore - flat arena of particle state.
//!
//! Per-particle fields are kept in parallel buffers (SoA layout) indexed by
//! `ParticleId`. The store is built once per scene and discarded on resize;
//! particles are never removed individually. Morph particles are eased
//! toward their targets rather than integrated, so there is no velocity
//! buffer here; the dot field keeps its own.

use glam::Vec3;

use crate::graph::ParticleId;

/// Palette slot a particle is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorClass {
    #[default]
    Base,
    Accent,
}

/// Every seventh particle is drawn in the accent color.
pub const ACCENT_EVERY: usize = 7;

impl ColorClass {
    pub fn for_index(i: usize) -> Self {
        if i % ACCENT_EVERY == ACCENT_EVERY - 1 {
            Self::Accent
        } else {
            Self::Base
        }
    }
}

/// Read-only snapshot of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec3,
    pub origin: Vec3,
    pub opacity: f32,
    pub fade: f32,
    pub color: ColorClass,
    pub phase: f32,
}

/// The particle arena.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    /// Current positions
    position: Vec<Vec3>,

    /// Rest/origin positions
    origin: Vec<Vec3>,

    /// Rendered opacity from the last update
    opacity: Vec<f32>,

    /// Edge fade factor from the last update
    fade: Vec<f32>,

    color: Vec<ColorClass>,

    /// Pulse phase offset
    phase: Vec<f32>,
}

impl ParticleStore {
    /// Create an empty store with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            position: Vec::with_capacity(capacity),
            origin: Vec::with_capacity(capacity),
            opacity: Vec::with_capacity(capacity),
            fade: Vec::with_capacity(capacity),
            color: Vec::with_capacity(capacity),
            phase: Vec::with_capacity(capacity),
        }
    }

    /// Add a particle resting (and starting) at `origin`.
    pub fn push(&mut self, origin: Vec3, color: ColorClass, phase: f32) -> ParticleId {
        let id = ParticleId(self.position.len() as u32);
        self.position.push(origin);
        self.origin.push(origin);
        self.opacity.push(0.0);
        self.fade.push(1.0);
        self.color.push(color);
        self.phase.push(phase);
        id
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Snapshot of one particle.
    pub fn get(&self, id: ParticleId) -> Option<Particle> {
        let i = id.index();
        Some(Particle {
            id,
            position: *self.position.get(i)?,
            origin: self.origin[i],
            opacity: self.opacity[i],
            fade: self.fade[i],
            color: self.color[i],
            phase: self.phase[i],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).filter_map(|i| self.get(ParticleId(i as u32)))
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.position
    }

    pub fn origins(&self) -> &[Vec3] {
        &self.origin
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacity
    }

    pub fn fades(&self) -> &[f32] {
        &self.fade
    }

    /// Set the rendered opacity and fade of one slot.
    #[inline]
    pub fn set_visibility(&mut self, id: ParticleId, opacity: f32, fade: f32) {
        let i = id.index();
        if i < self.opacity.len() {
            self.opacity[i] = opacity;
            self.fade[i] = fade;
        }
    }

    pub fn phase(&self, id: ParticleId) -> f32 {
        self.phase.get(id.index()).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut store = ParticleStore::with_capacity(2);
        let a = store.push(Vec3::new(1.0, 2.0, 3.0), ColorClass::Base, 0.0);
        let b = store.push(Vec3::new(4.0, 5.0, 6.0), ColorClass::Accent, 0.1);

        assert_eq!(store.len(), 2);
        assert_eq!((a, b), (ParticleId(0), ParticleId(1)));

        let p = store.get(b).unwrap();
        assert_eq!(p.position, p.origin);
        assert_eq!(p.color, ColorClass::Accent);
        assert_eq!(p.phase, 0.1);
        assert!(store.get(ParticleId(2)).is_none());
    }

    #[test]
    fn test_color_classes() {
        let accents = (0..21).filter(|&i| ColorClass::for_index(i) == ColorClass::Accent);
        assert_eq!(accents.collect::<Vec<_>>(), vec![6, 13, 20]);
    }

    #[test]
    fn test_set_visibility_ignores_unknown_slot() {
        let mut store = ParticleStore::default();
        store.push(Vec3::ZERO, ColorClass::Base, 0.0);
        store.set_visibility(ParticleId(0), 0.4, 0.8);
        store.set_visibility(ParticleId(5), 1.0, 1.0);
        assert_eq!(store.opacities(), &[0.4]);
        assert_eq!(store.fades(), &[0.8]);
    }
}
