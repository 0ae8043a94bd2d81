//! Snake Arcade - a terminal Snake game with power-ups and obstacles
//!
//! This library provides:
//! - Core game rules and the mode machine (game module)
//! - Cosmetic particles, screen shake and rainbow timing (effects module)
//! - Procedural sound effects (audio module)
//! - Keyboard mapping (input module) and TUI rendering (render module)
//! - The interactive terminal driver (modes module)

pub mod audio;
pub mod effects;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
