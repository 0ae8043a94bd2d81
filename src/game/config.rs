use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest grid side; keeps the board drawable in terminal cell units
pub const MAX_GRID_SIDE: usize = 1000;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,

    /// Fewest obstacles generated per session
    pub min_obstacles: usize,
    /// Most obstacles generated per session
    pub max_obstacles: usize,

    /// How long a rainbow power-up lasts, in ticks
    pub rainbow_duration_ticks: u32,
    /// How many ticks the board shakes after eating
    pub shake_ticks: u32,
    /// Largest camera offset (in cells) while shaking
    pub shake_magnitude: i32,
    /// Particles emitted per burst
    pub particle_count: usize,
    /// Ticks a particle stays alive
    pub particle_lifetime: u32,

    /// Random samples tried before falling back to a free-cell scan
    pub max_placement_attempts: u32,
    /// Fixed RNG seed, for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            tick_rate_hz: 30,
            min_obstacles: 4,
            max_obstacles: 9,
            rainbow_duration_ticks: 300,
            shake_ticks: 5,
            shake_magnitude: 1,
            particle_count: 10,
            particle_lifetime: 30,
            max_placement_attempts: 1000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Check that a session can always be started with this configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= 2 && self.grid_height >= 2,
            "grid must be at least 2x2, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width <= MAX_GRID_SIDE && self.grid_height <= MAX_GRID_SIDE,
            "grid must be at most {0}x{0}, got {1}x{2}",
            MAX_GRID_SIDE,
            self.grid_width,
            self.grid_height
        );
        ensure!(self.tick_rate_hz > 0, "tick rate must be positive");
        ensure!(
            self.min_obstacles <= self.max_obstacles,
            "min_obstacles ({}) exceeds max_obstacles ({})",
            self.min_obstacles,
            self.max_obstacles
        );
        ensure!(self.shake_magnitude >= 0, "shake magnitude must not be negative");
        Ok(())
    }
}
