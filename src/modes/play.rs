use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::audio::{SoundEffect, SoundSink};
use crate::game::{GameConfig, GameEngine, GameInput, GameMode, GameState, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Interactive play in the terminal
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    sound: Box<dyn SoundSink>,
    tick_interval: Duration,
    /// Inputs received since the last tick, oldest first
    pending_inputs: Vec<GameInput>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig, sound: Box<dyn SoundSink>) -> Result<Self> {
        let tick_interval = Duration::from_secs_f64(1.0 / config.tick_rate_hz.max(1) as f64);
        let renderer = Renderer::new(config.tick_rate_hz);
        let mut engine = GameEngine::new(config)?;
        let state = engine.new_game();

        Ok(Self {
            engine,
            state,
            stats: SessionStats::new(),
            renderer,
            input_handler: InputHandler::new(),
            sound,
            tick_interval,
            pending_inputs: Vec::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            "quit after {} games, high score {}",
            self.stats.games_played, self.state.high_score
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Input, update, render
                _ = tick_timer.tick() => {
                    self.step();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.input_handler.handle_key_event(key, self.state.mode) {
            KeyAction::Game(input) => self.pending_inputs.push(input),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// One tick: drain queued inputs in arrival order, advance the game, and
    /// hand its events to the sound sink
    fn step(&mut self) -> TickOutcome {
        for input in std::mem::take(&mut self.pending_inputs) {
            let before = self.state.mode;
            self.engine.apply_input(&mut self.state, input);
            if matches!(before, GameMode::Menu | GameMode::GameOver) && self.state.is_playing() {
                self.stats.on_game_start();
            }
        }

        if self.state.is_playing() {
            self.stats.on_tick(self.tick_interval);
        }

        let outcome = self.engine.tick(&mut self.state);
        for event in &outcome.events {
            self.sound.play(SoundEffect::from(event));
        }
        if outcome.died() {
            self.stats.on_game_over();
        }

        outcome
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
