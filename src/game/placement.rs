//! Random placement of food, power-ups and obstacles.
//!
//! Cells are sampled uniformly and rejected while they sit on the snake.
//! Sampling gives up after a fixed number of attempts and falls back to a
//! uniform pick among the free cells, so a crowded board cannot stall a tick.

use log::debug;
use rand::{Rng, seq::SliceRandom};

use super::{grid::Grid, state::Position};

/// Pick a cell that is not in `occupied`, or `None` if every cell is taken
pub fn place_avoiding<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    occupied: &[Position],
    max_attempts: u32,
) -> Option<Position> {
    for _ in 0..max_attempts {
        let pos = grid.random_cell(rng);
        if !occupied.contains(&pos) {
            return Some(pos);
        }
    }

    debug!(
        "random placement gave up after {} attempts, scanning free cells",
        max_attempts
    );
    let free: Vec<Position> = grid.cells().filter(|pos| !occupied.contains(pos)).collect();
    free.choose(rng).copied()
}

/// Generate between `min` and `max` obstacles (inclusive) that avoid the
/// snake as it is right now. Obstacles may land on each other, on food, or
/// on power-ups.
pub fn place_obstacles<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    snake_body: &[Position],
    min: usize,
    max: usize,
    max_attempts: u32,
) -> Vec<Position> {
    let count = rng.gen_range(min..=max);
    (0..count)
        .filter_map(|_| place_avoiding(rng, grid, snake_body, max_attempts))
        .collect()
}
