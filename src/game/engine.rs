use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use super::{
    action::{Direction, GameInput},
    config::GameConfig,
    grid::Grid,
    placement::{place_avoiding, place_obstacles},
    state::{GameMode, GameOverReason, GameState, Position, PowerUp, PowerUpKind, Snake},
};

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The snake ate the food
    Eat,
    /// The session ended
    Death(GameOverReason),
    /// A power-up was picked up
    PowerUp(PowerUpKind),
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Events in the order they occurred
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    pub fn ate_food(&self) -> bool {
        self.events.contains(&GameEvent::Eat)
    }

    pub fn died(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::Death(_)))
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration.
    ///
    /// Fails if the configuration does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = Grid::from(&config);

        Ok(Self { config, grid, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the state shown on the menu before the first session
    pub fn new_game(&mut self) -> GameState {
        let snake = self.spawn_snake();
        let food = self
            .spawn_food(&snake)
            .expect("a validated grid is at least 2x2, so a one-cell snake leaves a free cell");
        let obstacles = self.spawn_obstacles(&snake);
        let power_up = self.spawn_power_up(&snake).unwrap_or(PowerUp {
            position: self.grid.center(),
            kind: PowerUpKind::Speed,
            active: false,
        });

        GameState::new(self.grid, snake, food, power_up, obstacles)
    }

    /// Start a fresh session, keeping the high score
    pub fn reset(&mut self, state: &mut GameState) {
        let high_score = state.high_score;
        *state = self.new_game();
        state.high_score = high_score;
        state.mode = GameMode::Playing;

        info!(
            "new session: {} obstacles, power-up {:?} at ({}, {})",
            state.obstacles.len(),
            state.power_up.kind,
            state.power_up.position.x,
            state.power_up.position.y
        );
    }

    /// Apply one player input. Inputs that make no sense in the current mode
    /// are ignored.
    pub fn apply_input(&mut self, state: &mut GameState, input: GameInput) {
        match (state.mode, input) {
            (GameMode::Menu, GameInput::Start) => {
                info!("starting game from menu");
                state.mode = GameMode::Playing;
            }
            (GameMode::Playing, GameInput::Pause) => state.mode = GameMode::Paused,
            (GameMode::Paused, GameInput::Resume) => state.mode = GameMode::Playing,
            (GameMode::GameOver, GameInput::Restart) => self.reset(state),
            (GameMode::Playing, GameInput::Turn(direction)) => {
                state.snake.change_direction(direction)
            }
            _ => {}
        }
    }

    /// Advance the game by one tick. Does nothing unless the game is playing.
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !state.is_playing() {
            return outcome;
        }

        state.snake.advance();
        state.steps += 1;
        state.particles.update();
        state.rainbow.tick_duration();

        let head = state.snake.head();

        // A dying snake does not eat, but still collects a power-up
        if let Some(reason) = self.fatal_collision(state) {
            self.end_game(state, reason, &mut outcome);
        } else if head == state.food {
            state.snake.grow = true;
            state.score += 1;
            state.high_score = state.high_score.max(state.score);
            outcome.events.push(GameEvent::Eat);
            debug!("ate food at ({}, {}), score {}", head.x, head.y, state.score);

            state.particles.emit(
                &mut self.rng,
                head,
                self.config.particle_count,
                self.config.particle_lifetime,
            );
            state.shake.start(self.config.shake_ticks);

            match self.spawn_food(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    warn!("no free cell left for food");
                    self.end_game(state, GameOverReason::BoardFull, &mut outcome);
                }
            }
        }

        if head == state.power_up.position && state.power_up.active {
            let kind = state.power_up.kind;
            self.apply_power_up(state, kind);
            state.power_up.active = false;
            outcome.events.push(GameEvent::PowerUp(kind));
            info!("picked up {} power-up", kind.label());

            // Without a free cell the spent power-up simply stays inactive
            if let Some(power_up) = self.spawn_power_up(&state.snake) {
                state.power_up = power_up;
            }
        }

        state.shake.update(&mut self.rng, self.config.shake_magnitude);
        state.rainbow.advance_hue();

        outcome
    }

    /// Effect dispatch for each power-up kind
    fn apply_power_up(&self, state: &mut GameState, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => state.snake.increase_speed(),
            PowerUpKind::Length => {
                // The flag is a bool: setting it twice still yields one
                // extra segment.
                state.snake.grow = true;
                state.snake.grow = true;
            }
            PowerUpKind::Rainbow => state.rainbow.activate(self.config.rainbow_duration_ticks),
        }
    }

    fn fatal_collision(&self, state: &GameState) -> Option<GameOverReason> {
        state.snake.collision(&state.grid).or_else(|| {
            state
                .is_obstacle(state.snake.head())
                .then_some(GameOverReason::Obstacle)
        })
    }

    fn end_game(&self, state: &mut GameState, reason: GameOverReason, outcome: &mut TickOutcome) {
        state.mode = GameMode::GameOver;
        state.game_over_reason = Some(reason);
        outcome.events.push(GameEvent::Death(reason));
        info!(
            "game over ({:?}): score {}, high score {}",
            reason, state.score, state.high_score
        );
    }

    fn spawn_snake(&self) -> Snake {
        Snake::new(self.grid.center(), Direction::Right)
    }

    fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        place_avoiding(
            &mut self.rng,
            &self.grid,
            &snake.body,
            self.config.max_placement_attempts,
        )
    }

    fn spawn_power_up(&mut self, snake: &Snake) -> Option<PowerUp> {
        let position = place_avoiding(
            &mut self.rng,
            &self.grid,
            &snake.body,
            self.config.max_placement_attempts,
        )?;
        Some(PowerUp::new(position, PowerUpKind::random(&mut self.rng)))
    }

    fn spawn_obstacles(&mut self, snake: &Snake) -> Vec<Position> {
        place_obstacles(
            &mut self.rng,
            &self.grid,
            &snake.body,
            self.config.min_obstacles,
            self.config.max_obstacles,
            self.config.max_placement_attempts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::default().with_seed(7)).unwrap()
    }

    /// A playing state with nothing on the board but the snake
    fn clear_board(engine: &mut GameEngine, snake: Snake) -> GameState {
        let mut state = engine.new_game();
        state.mode = GameMode::Playing;
        state.snake = snake;
        state.obstacles.clear();
        state.food = Position::new(0, 0);
        state.power_up.position = Position::new(39, 29);
        state
    }

    #[test]
    fn test_new_game_starts_on_menu() {
        let mut engine = engine();
        let state = engine.new_game();

        assert_eq!(state.mode, GameMode::Menu);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 0);
        assert_eq!(state.difficulty, 1);
        assert_eq!(state.snake.body, vec![Position::new(20, 15)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert!((4..=9).contains(&state.obstacles.len()));
        assert!(!state.obstacles.contains(&state.snake.head()));
        assert!(!state.snake.occupies(state.food));
        assert!(!state.snake.occupies(state.power_up.position));
        assert!(state.power_up.active);
    }

    #[test]
    fn test_start_from_menu() {
        let mut engine = engine();
        let mut state = engine.new_game();

        engine.apply_input(&mut state, GameInput::Restart);
        assert_eq!(state.mode, GameMode::Menu);

        engine.apply_input(&mut state, GameInput::Start);
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine();
        let mut state = engine.new_game();
        engine.apply_input(&mut state, GameInput::Start);

        engine.apply_input(&mut state, GameInput::Resume);
        assert_eq!(state.mode, GameMode::Playing);

        engine.apply_input(&mut state, GameInput::Pause);
        assert_eq!(state.mode, GameMode::Paused);

        // Turns are not applied while paused
        engine.apply_input(&mut state, GameInput::Turn(Direction::Up));
        assert_eq!(state.snake.direction, Direction::Right);

        engine.apply_input(&mut state, GameInput::Start);
        assert_eq!(state.mode, GameMode::Paused);

        engine.apply_input(&mut state, GameInput::Resume);
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut engine = engine();
        let mut state = engine.new_game();
        let before = state.clone();

        let outcome = engine.tick(&mut state);
        assert!(outcome.events.is_empty());
        assert_eq!(state, before);

        engine.apply_input(&mut state, GameInput::Start);
        engine.apply_input(&mut state, GameInput::Pause);
        let paused = state.clone();
        engine.tick(&mut state);
        assert_eq!(state, paused);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(10, 10), Direction::Right));

        for _ in 0..3 {
            let outcome = engine.tick(&mut state);
            assert!(outcome.events.is_empty());
        }

        assert_eq!(state.snake.body, vec![Position::new(13, 10)]);
        assert_eq!(state.steps, 3);
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(0, 5), Direction::Left));

        let outcome = engine.tick(&mut state);

        assert_eq!(state.snake.head(), Position::new(-1, 5));
        assert!(state.snake.check_collision(&state.grid));
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.game_over_reason, Some(GameOverReason::Wall));
        assert_eq!(outcome.events, vec![GameEvent::Death(GameOverReason::Wall)]);
        assert!(outcome.died());
    }

    #[test]
    fn test_obstacle_ends_game() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Down));
        state.obstacles = vec![Position::new(5, 6)];

        let outcome = engine.tick(&mut state);

        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(
            outcome.events,
            vec![GameEvent::Death(GameOverReason::Obstacle)]
        );
    }

    #[test]
    fn test_death_on_power_up_still_collects_it() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.obstacles = vec![Position::new(6, 5)];
        state.power_up = PowerUp::new(Position::new(6, 5), PowerUpKind::Speed);
        state.food = Position::new(6, 5);

        let outcome = engine.tick(&mut state);

        assert_eq!(
            outcome.events,
            vec![
                GameEvent::Death(GameOverReason::Obstacle),
                GameEvent::PowerUp(PowerUpKind::Speed)
            ]
        );
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.snake.speed_level, 2);
        // Food under the obstacle is not eaten
        assert_eq!(state.score, 0);
        assert!(!state.snake.grow);
        assert!(state.power_up.active);
        assert_ne!(state.power_up.position, Position::new(6, 5));
    }

    #[test]
    fn test_death_tick_still_runs_effects() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(0, 5), Direction::Left));
        state.rainbow.activate(10);
        state.shake.start(3);

        engine.tick(&mut state);

        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.rainbow.offset, 1);
        assert_eq!(state.shake.frames_left, 2);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut engine = engine();
        let snake = Snake::with_length(Position::new(5, 5), Direction::Right, 5);
        let mut state = clear_board(&mut engine, snake);

        engine.apply_input(&mut state, GameInput::Turn(Direction::Down));
        engine.tick(&mut state);
        engine.apply_input(&mut state, GameInput::Turn(Direction::Left));
        engine.tick(&mut state);
        engine.apply_input(&mut state, GameInput::Turn(Direction::Up));
        let outcome = engine.tick(&mut state);

        assert_eq!(state.game_over_reason, Some(GameOverReason::SelfCollision));
        assert!(outcome.died());
    }

    #[test]
    fn test_food_consumption_grows_on_next_move() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.food = Position::new(6, 5);
        state.high_score = 0;

        let outcome = engine.tick(&mut state);

        assert!(outcome.ate_food());
        assert_eq!(outcome.events, vec![GameEvent::Eat]);
        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 1);
        assert!(state.snake.grow);
        // Growth is delayed until the next move
        assert_eq!(state.snake.len(), 1);
        assert_ne!(state.food, Position::new(6, 5));
        assert!(!state.snake.occupies(state.food));
        assert_eq!(state.particles.len(), engine.config().particle_count);

        // Keep the replacement food out of the snake's way
        state.food = Position::new(0, 0);
        engine.tick(&mut state);
        assert_eq!(state.snake.body, vec![Position::new(7, 5), Position::new(6, 5)]);
        assert!(!state.snake.grow);
    }

    #[test]
    fn test_high_score_not_lowered() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.high_score = 10;
        state.food = Position::new(6, 5);

        engine.tick(&mut state);

        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 10);
    }

    #[test]
    fn test_eating_starts_screen_shake() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.food = Position::new(6, 5);

        engine.tick(&mut state);
        // One frame of the shake is used up in the same tick
        assert_eq!(state.shake.frames_left, engine.config().shake_ticks - 1);

        state.food = Position::new(0, 0);
        for _ in 0..10 {
            engine.tick(&mut state);
        }
        assert_eq!(state.shake.offset, (0, 0));
    }

    #[test]
    fn test_length_power_up_grows_once() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.power_up = PowerUp::new(Position::new(6, 5), PowerUpKind::Length);

        let outcome = engine.tick(&mut state);
        assert_eq!(
            outcome.events,
            vec![GameEvent::PowerUp(PowerUpKind::Length)]
        );
        assert!(state.snake.grow);

        state.power_up.active = false;
        engine.tick(&mut state);
        engine.tick(&mut state);
        // A single extra segment, not two
        assert_eq!(state.snake.len(), 2);
    }

    #[test]
    fn test_speed_power_up_toggles_level() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.power_up = PowerUp::new(Position::new(6, 5), PowerUpKind::Speed);

        engine.tick(&mut state);

        assert_eq!(state.snake.speed_level, 2);
        assert!(!state.snake.occupies(state.power_up.position));
        assert!(state.power_up.active);
    }

    #[test]
    fn test_rainbow_power_up_runs_out() {
        let mut engine = GameEngine::new(GameConfig {
            rainbow_duration_ticks: 3,
            ..GameConfig::default().with_seed(1)
        })
        .unwrap();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.power_up = PowerUp::new(Position::new(6, 5), PowerUpKind::Rainbow);

        engine.tick(&mut state);
        assert!(state.rainbow.enabled);
        assert_eq!(state.rainbow.remaining_ticks, 3);
        assert_eq!(state.rainbow.offset, 1);

        // Keep the replacement power-up out of the way
        state.power_up.position = Position::new(0, 29);
        engine.tick(&mut state);
        engine.tick(&mut state);
        assert!(state.rainbow.enabled);
        engine.tick(&mut state);
        assert!(!state.rainbow.enabled);
        assert_eq!(state.rainbow.offset, 3);
    }

    #[test]
    fn test_inactive_power_up_ignored() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(5, 5), Direction::Right));
        state.power_up = PowerUp {
            active: false,
            ..PowerUp::new(Position::new(6, 5), PowerUpKind::Speed)
        };

        let outcome = engine.tick(&mut state);

        assert!(outcome.events.is_empty());
        assert_eq!(state.snake.speed_level, 1);
    }

    #[test]
    fn test_board_full_ends_game() {
        let mut engine = GameEngine::new(GameConfig::new(2, 2).with_seed(2)).unwrap();
        let mut state = engine.new_game();
        state.mode = GameMode::Playing;
        state.obstacles.clear();
        // Three of the four cells taken, heading for the last one
        state.snake = Snake::with_length(Position::new(1, 1), Direction::Right, 2);
        state.snake.body.push(Position::new(0, 0));
        state.snake.change_direction(Direction::Up);
        state.snake.grow = true;
        state.food = Position::new(1, 0);
        state.power_up.active = false;

        let outcome = engine.tick(&mut state);

        assert_eq!(
            outcome.events,
            vec![
                GameEvent::Eat,
                GameEvent::Death(GameOverReason::BoardFull)
            ]
        );
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameEngine::new(GameConfig::new(1, 1)).is_err());
        assert!(GameEngine::new(GameConfig::new(40_000, 30)).is_err());
    }

    #[test]
    fn test_tiny_grid_food_avoids_snake() {
        for seed in 0..20 {
            let mut engine = GameEngine::new(GameConfig::new(2, 2).with_seed(seed)).unwrap();
            let state = engine.new_game();
            assert!(!state.snake.occupies(state.food));
            assert!(state.grid.contains(state.food));
        }
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(0, 5), Direction::Left));
        state.score = 4;
        state.high_score = 6;

        engine.apply_input(&mut state, GameInput::Restart);
        assert_eq!(state.score, 4);

        engine.tick(&mut state);
        assert_eq!(state.mode, GameMode::GameOver);

        engine.apply_input(&mut state, GameInput::Restart);
        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 6);
        assert_eq!(state.snake.body, vec![Position::new(20, 15)]);
        assert_eq!(state.game_over_reason, None);
        assert!(!state.rainbow.enabled);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_turns_in_one_tick_apply_in_order() {
        let mut engine = engine();
        let mut state = clear_board(&mut engine, Snake::new(Position::new(10, 10), Direction::Right));

        // Up is accepted, then Left is accepted relative to Up
        engine.apply_input(&mut state, GameInput::Turn(Direction::Up));
        engine.apply_input(&mut state, GameInput::Turn(Direction::Left));
        assert_eq!(state.snake.direction, Direction::Left);

        // Right is the reverse of Left and is dropped
        engine.apply_input(&mut state, GameInput::Turn(Direction::Right));
        assert_eq!(state.snake.direction, Direction::Left);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::new(GameConfig::default().with_seed(99)).unwrap();
        let mut b = GameEngine::new(GameConfig::default().with_seed(99)).unwrap();
        assert_eq!(a.new_game(), b.new_game());
    }
}
