use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, GameInput, GameMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(GameInput),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key to an action. `mode` decides what Space means: start on the
    /// menu, restart after a game over.
    pub fn handle_key_event(&self, key: KeyEvent, mode: GameMode) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Game(GameInput::Turn(Direction::Up)),
            KeyCode::Down => KeyAction::Game(GameInput::Turn(Direction::Down)),
            KeyCode::Left => KeyAction::Game(GameInput::Turn(Direction::Left)),
            KeyCode::Right => KeyAction::Game(GameInput::Turn(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Game(GameInput::Turn(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Game(GameInput::Turn(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Game(GameInput::Turn(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Game(GameInput::Turn(Direction::Right))
            }

            // Mode changes
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Game(GameInput::Pause),
            KeyCode::Char('u') | KeyCode::Char('U') => KeyAction::Game(GameInput::Resume),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(GameInput::Restart),
            KeyCode::Char(' ') | KeyCode::Enter => match mode {
                GameMode::GameOver => KeyAction::Game(GameInput::Restart),
                _ => KeyAction::Game(GameInput::Start),
            },

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
