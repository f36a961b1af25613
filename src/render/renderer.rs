use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Direction, GameState, Position};
use crate::metrics::GameMetrics;
use crate::modes::Screen;
use crate::score::ScoreRecord;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &Screen, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match screen {
            Screen::Menu { high_score } => {
                frame.render_widget(self.render_menu(high_score.as_ref()), game_area);
            }
            Screen::Leaderboard { records } => {
                frame.render_widget(self.render_leaderboard(records), game_area);
            }
            Screen::Completed { final_score } => {
                frame.render_widget(self.render_completed(*final_score), game_area);
            }
            Screen::Playing(engine) => {
                let state = engine.state();
                frame.render_widget(self.render_stats(state, metrics), chunks[0]);

                if state.is_game_over() {
                    frame.render_widget(self.render_game_over(state), game_area);
                } else {
                    frame.render_widget(self.render_grid(state), game_area);
                }

                frame.render_widget(self.render_status(state), chunks[2]);
            }
        }
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::new();
        let head = state.snake.head();

        for y in 0..state.grid.columns() as i32 {
            let mut spans = Vec::new();

            for x in 0..state.grid.rows() as i32 {
                let pos = Position::new(x, y);

                let cell = if pos == head {
                    Span::styled(
                        head_glyph(state.snake.direction),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if state.food == Some(pos) {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if state.grid.is_obstacle(pos) {
                    Span::styled("█ ", Style::default().fg(Color::Magenta))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        // Walls get a solid double border, open edges a faint one
        let (border_type, border_color) = if state.grid.is_walled() {
            (BorderType::Double, Color::White)
        } else {
            (BorderType::Plain, Color::DarkGray)
        };

        let title = if state.is_leveling_up() {
            " We're going up! ".to_string()
        } else {
            format!(" Level {} ", state.config.level)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.config.level.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}/{}", state.score, state.config.score_threshold),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Food: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.food_eaten.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, state: &GameState) -> Paragraph<'_> {
        let line = if state.is_paused() {
            Line::from(vec![
                Span::styled(
                    "[ PAUSED ]",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" SPACE to resume | "),
                Span::styled("ESC", Style::default().fg(Color::Red)),
                Span::raw(" back to menu"),
            ])
        } else if state.is_leveling_up() {
            Line::from(Span::styled(
                "Level cleared!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("SPACE", Style::default().fg(Color::Cyan)),
                Span::raw(" to pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}/{}", state.score, state.config.score_threshold),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            back_to_menu_hint(),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_completed(&self, final_score: u32) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from("Impossible! You are officially a"),
            Line::from(vec![Span::styled(
                "SUPER SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            back_to_menu_hint(),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_menu(&self, high_score: Option<&ScoreRecord>) -> Paragraph<'_> {
        let best = high_score
            .map(|record| format!("{} ({})", record.value, record.user))
            .unwrap_or_else(|| "none yet".to_string());

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SUPER SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(best, Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("ENTER", Style::default().fg(Color::Green)),
                Span::raw(" play | "),
                Span::styled("L", Style::default().fg(Color::Cyan)),
                Span::raw(" leaderboard | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_leaderboard(&self, records: &[ScoreRecord]) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "LEADERBOARD",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        if records.is_empty() {
            text.push(Line::from("No scores yet"));
        }
        for (rank, record) in records.iter().enumerate() {
            text.push(Line::from(format!(
                "{:>2}. {:<16} {:>6}",
                rank + 1,
                record.user,
                record.value
            )));
        }

        text.push(Line::from(""));
        text.push(back_to_menu_hint());

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "▲ ",
        Direction::Down => "▼ ",
        Direction::Left => "◀ ",
        Direction::Right => "▶ ",
    }
}

fn back_to_menu_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            "ENTER",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" or ", Style::default().fg(Color::Gray)),
        Span::styled(
            "ESC",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to go back to the menu", Style::default().fg(Color::Gray)),
    ])
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
