//! Formation layouts for the morphing particle field.
//!
//! This module provides closed-form target positions for particles. The
//! simulator eases each particle toward a blend of two formations chosen by
//! the morph scheduler.

pub mod formation;
pub mod morph;

pub use formation::{Formation, FormationLayout};
pub use morph::{MorphPhase, MorphScheduler};
