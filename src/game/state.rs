use rand::Rng;

use super::{action::Direction, grid::Grid};
use crate::effects::{ParticleSystem, Rainbow, ScreenShake};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// One-shot flag: the next move keeps the tail
    pub grow: bool,
    /// Either 1 or 2; toggled by the speed power-up
    pub speed_level: u8,
}

impl Snake {
    /// A single-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self::with_length(head, direction, 1)
    }

    /// Create a snake with given head, direction and length, body trailing behind
    pub fn with_length(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            body,
            direction,
            grow: false,
            speed_level: 1,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Step one cell in the current direction. A pending grow flag is used up
    /// here and keeps the tail in place.
    pub fn advance(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if self.grow {
            self.grow = false;
        } else {
            self.body.pop();
        }
    }

    /// Turn, unless the turn would reverse the snake onto itself
    pub fn change_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.direction = direction;
        }
    }

    /// Head outside the grid, or head on its own body
    pub fn check_collision(&self, grid: &Grid) -> bool {
        self.collision(grid).is_some()
    }

    pub fn collision(&self, grid: &Grid) -> Option<GameOverReason> {
        let head = self.head();
        if !grid.contains(head) {
            Some(GameOverReason::Wall)
        } else if self.collides_with_body(head) {
            Some(GameOverReason::SelfCollision)
        } else {
            None
        }
    }

    /// Toggle between speed levels 1 and 2
    pub fn increase_speed(&mut self) {
        self.speed_level = if self.speed_level < 2 {
            self.speed_level + 1
        } else {
            1
        };
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran into an obstacle
    Obstacle,
    /// No free cell was left to put food on
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Speed,
    Length,
    Rainbow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Length,
        PowerUpKind::Rainbow,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Length => "length",
            PowerUpKind::Rainbow => "rainbow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
    /// Only an active power-up can be picked up
    pub active: bool,
}

impl PowerUp {
    pub fn new(position: Position, kind: PowerUpKind) -> Self {
        Self {
            position,
            kind,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub mode: GameMode,
    pub grid: Grid,
    pub snake: Snake,
    pub food: Position,
    pub power_up: PowerUp,
    pub obstacles: Vec<Position>,
    pub score: u32,
    /// Best score seen by this process; survives resets
    pub high_score: u32,
    /// Shown on the menu, never changes
    pub difficulty: u32,
    pub steps: u32,
    pub game_over_reason: Option<GameOverReason>,
    pub rainbow: Rainbow,
    pub shake: ScreenShake,
    pub particles: ParticleSystem,
}

impl GameState {
    /// Create a new game state sitting on the menu
    pub fn new(
        grid: Grid,
        snake: Snake,
        food: Position,
        power_up: PowerUp,
        obstacles: Vec<Position>,
    ) -> Self {
        Self {
            mode: GameMode::Menu,
            grid,
            snake,
            food,
            power_up,
            obstacles,
            score: 0,
            high_score: 0,
            difficulty: 1,
            steps: 0,
            game_over_reason: None,
            rainbow: Rainbow::default(),
            shake: ScreenShake::default(),
            particles: ParticleSystem::default(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }
}
