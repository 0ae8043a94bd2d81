use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::collections::HashMap;

use crate::game::{GameMode, GameOverReason, GameState, Position, PowerUpKind};
use crate::metrics::SessionStats;

/// Terminal columns per grid cell
const CELL_WIDTH: i32 = 2;

pub struct Renderer {
    tick_rate_hz: u32,
}

impl Renderer {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self { tick_rate_hz }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let header = self.render_stats(state, stats);
        frame.render_widget(header, chunks[0]);

        let game_area = chunks[1];
        match state.mode {
            GameMode::Menu => frame.render_widget(self.render_menu(state), game_area),
            GameMode::Playing => {
                let board = board_area(game_area, state);
                let board = shifted(board, state.shake.offset, game_area);
                frame.render_widget(self.render_grid(state), board);
            }
            GameMode::Paused => {
                let board = board_area(game_area, state);
                frame.render_widget(self.render_grid(state), board);
                let popup = centered(game_area, 30, 6);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_pause(), popup);
            }
            GameMode::GameOver => frame.render_widget(self.render_game_over(state), game_area),
        }

        let controls = self.render_controls(state.mode);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut particles: HashMap<Position, f32> = HashMap::new();
        for particle in state.particles.iter() {
            let entry = particles.entry(particle.cell()).or_insert(0.0);
            *entry = entry.max(particle.intensity());
        }

        let mut lines = Vec::with_capacity(state.grid.height);

        for y in 0..state.grid.height {
            let mut spans = Vec::with_capacity(state.grid.width);

            for x in 0..state.grid.width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if let Some(index) = state.snake.body.iter().position(|p| *p == pos) {
                    let color = if state.rainbow.enabled {
                        hue_to_rgb(state.rainbow.hue_for_segment(index))
                    } else {
                        Color::Green
                    };
                    let (symbol, style) = if index == 0 {
                        ("■ ", Style::default().fg(color).add_modifier(Modifier::BOLD))
                    } else {
                        ("□ ", Style::default().fg(color))
                    };
                    Span::styled(symbol, style)
                } else if state.is_obstacle(pos) {
                    Span::styled("# ", Style::default().fg(Color::Blue))
                } else if state.power_up.active && pos == state.power_up.position {
                    Span::styled(
                        "◆ ",
                        Style::default()
                            .fg(power_up_color(state.power_up.kind))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if let Some(intensity) = particles.get(&pos) {
                    let level = (255.0 * intensity) as u8;
                    Span::styled("· ", Style::default().fg(Color::Rgb(level, level / 4, 0)))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, stats: &SessionStats) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}x", state.snake.speed_level),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(stats.format_time(), Style::default().fg(Color::White)),
        ];

        if state.rainbow.enabled {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("Rainbow: {}s", state.rainbow.seconds_left(self.tick_rate_hz)),
                Style::default()
                    .fg(hue_to_rgb(state.rainbow.offset % 360))
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_menu(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Snake Game - Extended",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(format!("Difficulty: {}", state.difficulty)),
            Line::from("Arrow keys / WASD to move, P to pause"),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_pause(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Press U to resume"),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let reason = match state.game_over_reason {
            Some(GameOverReason::Wall) => "You hit the wall",
            Some(GameOverReason::SelfCollision) => "You bit yourself",
            Some(GameOverReason::Obstacle) => "You hit an obstacle",
            Some(GameOverReason::BoardFull) => "The board is full!",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.high_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "SPACE",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, mode: GameMode) -> Paragraph<'_> {
        let hint = match mode {
            GameMode::Menu => " to start | ",
            GameMode::Playing => " pause | ",
            GameMode::Paused => " resume | ",
            GameMode::GameOver => " to restart | ",
        };
        let key = match mode {
            GameMode::Menu | GameMode::GameOver => "SPACE",
            GameMode::Playing => "P",
            GameMode::Paused => "U",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled(key, Style::default().fg(Color::Cyan)),
            Span::raw(hint),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Speed => Color::LightBlue,
        PowerUpKind::Length => Color::Yellow,
        PowerUpKind::Rainbow => Color::Magenta,
    }
}

/// Fully saturated, full brightness colour for a hue in degrees
fn hue_to_rgb(hue: u32) -> Color {
    let h = (hue % 360) as f32 / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |c: f32| (c * 255.0).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// The bordered board, centred in `area`
fn board_area(area: Rect, state: &GameState) -> Rect {
    // Two border cells around the grid
    let width = u16::try_from(state.grid.width)
        .unwrap_or(u16::MAX)
        .saturating_mul(CELL_WIDTH as u16)
        .saturating_add(2);
    let height = u16::try_from(state.grid.height)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    centered(area, width, height)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Move `rect` by a camera offset given in cells, staying inside `bounds`
fn shifted(rect: Rect, offset: (i32, i32), bounds: Rect) -> Rect {
    let max_x = (bounds.x + bounds.width).saturating_sub(rect.width) as i32;
    let max_y = (bounds.y + bounds.height).saturating_sub(rect.height) as i32;
    let x = (rect.x as i32 + offset.0 * CELL_WIDTH).clamp(bounds.x as i32, max_x.max(bounds.x as i32));
    let y = (rect.y as i32 + offset.1).clamp(bounds.y as i32, max_y.max(bounds.y as i32));
    Rect::new(x as u16, y as u16, rect.width, rect.height)
}
