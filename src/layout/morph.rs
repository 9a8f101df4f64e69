//! Morph cycle scheduling between formations.
//!
//! The cycle value `c = (sin(t * omega) + 1) / 2` sweeps `[0, 1]` and is cut
//! into three segments:
//!
//! | segment        | blends          |
//! |----------------|-----------------|
//! | `[0.00, 0.33)` | grid -> sphere  |
//! | `[0.33, 0.66)` | sphere -> helix |
//! | `[0.66, 1.00]` | helix -> grid   |
//!
//! The last segment is 0.34 wide. Every boundary lands on a pure formation
//! from both sides, so the blended position is continuous.

use std::f32::consts::TAU;

use glam::Vec3;

use super::formation::Formation;

/// Cycle value at which grid->sphere hands over to sphere->helix.
pub const FIRST_BOUNDARY: f32 = 0.33;
/// Cycle value at which sphere->helix hands over to helix->grid.
pub const SECOND_BOUNDARY: f32 = 0.66;

/// Where the cycle currently is: blending `from` toward `to` by `blend`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphPhase {
    pub from: Formation,
    pub to: Formation,
    /// Interpolation weight in `[0, 1]`; 0 is pure `from`.
    pub blend: f32,
}

impl MorphPhase {
    /// Resolve the phase for a raw cycle value in `[0, 1]`.
    pub fn at(cycle: f32) -> Self {
        let c = cycle.clamp(0.0, 1.0);
        if c < FIRST_BOUNDARY {
            Self {
                from: Formation::Grid,
                to: Formation::Sphere,
                blend: c / FIRST_BOUNDARY,
            }
        } else if c < SECOND_BOUNDARY {
            Self {
                from: Formation::Sphere,
                to: Formation::Helix,
                blend: (c - FIRST_BOUNDARY) / (SECOND_BOUNDARY - FIRST_BOUNDARY),
            }
        } else {
            Self {
                from: Formation::Helix,
                to: Formation::Grid,
                blend: ((c - SECOND_BOUNDARY) / (1.0 - SECOND_BOUNDARY)).min(1.0),
            }
        }
    }

    /// Interpolate between the two formation positions of this phase.
    pub fn apply(&self, grid: Vec3, sphere: Vec3, helix: Vec3) -> Vec3 {
        let pick = |formation| match formation {
            Formation::Grid => grid,
            Formation::Sphere => sphere,
            Formation::Helix => helix,
        };
        pick(self.from).lerp(pick(self.to), self.blend)
    }
}

/// Maps elapsed seconds to the cyclic morph phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphScheduler {
    omega: f32,
}

impl MorphScheduler {
    /// One full sine period lasts `period_seconds`.
    pub fn new(period_seconds: f32) -> Self {
        Self {
            omega: TAU / period_seconds,
        }
    }

    /// Raw cycle value `(sin(t * omega) + 1) / 2`.
    pub fn cycle(&self, t: f32) -> f32 {
        ((t * self.omega).sin() + 1.0) * 0.5
    }

    pub fn phase(&self, t: f32) -> MorphPhase {
        MorphPhase::at(self.cycle(t))
    }
}
