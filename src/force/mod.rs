//! Pointer-interactive force simulation.

mod field;

pub use field::{Dot, ForceField, ForceParams, MAX_DOTS, emphasis};
