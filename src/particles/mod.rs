//! Particle state and the morphing particle simulator.

mod simulator;
mod store;

pub use simulator::{ParticleSimulator, SMOOTHING};
pub use store::{ColorClass, Particle, ParticleStore};
