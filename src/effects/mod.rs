//! Cosmetic effects driven by the game tick.
//!
//! None of these influence gameplay. They live next to the game state
//! because the order in which they advance within a tick is observable.

pub mod particles;
pub mod screen;

pub use particles::{Particle, ParticleSystem};
pub use screen::{Rainbow, ScreenShake};
