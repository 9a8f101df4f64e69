//! ParticleSimulator - the ambient morphing particle field.
//!
//! Each step eases every particle toward a blend of two formations:
//!
//! 1. travel x: `origin.x + ((t * speed) mod 2) * span`, wrapped into the field
//! 2. formation targets for grid (with the travelled x), sphere and helix
//! 3. blend by the morph phase
//! 4. `pos += (target - pos) * SMOOTHING` (first-order low-pass, not a spring)
//! 5. edge fade from the new horizontal position
//! 6. `opacity = (0.3 + 0.2 * sin(t * 0.3 + i * 0.1)) * fade`

use glam::Vec3;

use crate::graph::ParticleId;
use crate::layout::{FormationLayout, MorphScheduler};

use super::store::{ColorClass, ParticleStore};

/// Fraction of the remaining distance covered per step.
pub const SMOOTHING: f32 = 0.05;

/// Per-index offset of the pulse phase.
pub const PULSE_PHASE_STEP: f32 = 0.1;

const PULSE_BASE: f32 = 0.3;
const PULSE_AMPLITUDE: f32 = 0.2;
const PULSE_RATE: f32 = 0.3;

/// Owns the morph particles and advances them once per frame.
#[derive(Debug, Clone)]
pub struct ParticleSimulator {
    layout: FormationLayout,
    morph: MorphScheduler,
    store: ParticleStore,
}

impl ParticleSimulator {
    /// Place `count` particles at their lattice slots.
    pub fn new(count: usize, spacing: f32, cycle_seconds: f32) -> Self {
        let layout = FormationLayout::new(count, spacing);
        let mut store = ParticleStore::with_capacity(layout.count());
        for i in 0..layout.count() {
            store.push(
                layout.lattice(i),
                ColorClass::for_index(i),
                i as f32 * PULSE_PHASE_STEP,
            );
        }
        Self {
            layout,
            morph: MorphScheduler::new(cycle_seconds),
            store,
        }
    }

    pub fn layout(&self) -> &FormationLayout {
        &self.layout
    }

    pub fn morph(&self) -> &MorphScheduler {
        &self.morph
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Blended formation target of particle `i` at time `t` (seconds).
    pub fn target(&self, i: usize, t: f32) -> Vec3 {
        let origin = self.store.origins()[i];
        let travel_x = self.layout.travel_x(origin.x, t);
        self.morph.phase(t).apply(
            self.layout.grid(i, travel_x),
            self.layout.sphere(i, t),
            self.layout.helix(i, t),
        )
    }

    /// Pulsing opacity before edge fade.
    #[inline]
    pub fn pulse(t: f32, phase: f32) -> f32 {
        PULSE_BASE + PULSE_AMPLITUDE * (t * PULSE_RATE + phase).sin()
    }

    /// Advance every particle to time `t` (seconds since mount).
    pub fn step(&mut self, t: f32) {
        let phase = self.morph.phase(t);
        for i in 0..self.store.len() {
            let id = ParticleId(i as u32);
            let origin = self.store.origins()[i];
            let travel_x = self.layout.travel_x(origin.x, t);
            let target = phase.apply(
                self.layout.grid(i, travel_x),
                self.layout.sphere(i, t),
                self.layout.helix(i, t),
            );

            let position = &mut self.store.positions_mut()[i];
            *position += (target - *position) * SMOOTHING;
            let x = position.x;

            let fade = self.layout.edge_fade(x);
            let opacity = Self::pulse(t, self.store.phase(id)) * fade;
            self.store.set_visibility(id, opacity, fade);
        }
    }
}
