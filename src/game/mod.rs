//! Core game logic module for Snake
//!
//! This module contains all the game rules without any I/O or rendering
//! dependencies: the snake, food, power-ups, obstacles, and the mode machine
//! (menu, playing, paused, game over) that ties them together.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod placement;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, GameInput};
pub use config::GameConfig;
pub use engine::{GameEngine, GameEvent, TickOutcome};
pub use grid::Grid;
pub use state::{GameMode, GameOverReason, GameState, Position, PowerUp, PowerUpKind, Snake};
