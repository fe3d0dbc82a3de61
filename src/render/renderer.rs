use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, CollisionType, GameState, Position, TickOutcome};
use crate::metrics::GameMetrics;

/// Driver-side details shown next to the game state
#[derive(Debug, Clone, Copy, Default)]
pub struct HudInfo {
    pub paused: bool,
    pub autopilot: bool,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics, hud: HudInfo) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics, hud), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.game_over {
            frame.render_widget(self.render_game_over(state, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(state), game_area);
        }

        frame.render_widget(self.render_controls(metrics), chunks[2]);
    }

    /// Glyph and style for one classified cell
    pub fn cell_span(cell: Cell) -> Span<'static> {
        match cell {
            Cell::SnakeHead => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::SnakeBody => Span::styled("□ ", Style::default().fg(Color::Green)),
            Cell::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::Obstacle => Span::styled("▓ ", Style::default().fg(Color::Gray)),
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    /// Short message for outcomes the player should notice
    pub fn event_message(outcome: TickOutcome) -> Option<&'static str> {
        match outcome {
            TickOutcome::Ate => Some("Yum!"),
            TickOutcome::Collided(CollisionType::Wall) => Some("Hit the wall"),
            TickOutcome::Collided(CollisionType::SelfCollision) => Some("Bit your own tail"),
            TickOutcome::Collided(CollisionType::Obstacle) => Some("Crashed into an obstacle"),
            TickOutcome::BoardFull => Some("Board full - nowhere left for food"),
            TickOutcome::Moved | TickOutcome::Frozen => None,
        }
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let size = state.grid_size as i32;
        let lines: Vec<Line> = (0..size)
            .map(|y| {
                let spans: Vec<Span> = (0..size)
                    .map(|x| Self::cell_span(state.cell_at(Position::new(x, y))))
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics, hud: HudInfo) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if hud.autopilot {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("AUTOPILOT", Style::default().fg(Color::Magenta)));
        }
        if hud.paused {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let cause = metrics
            .last_event
            .and_then(Self::event_message)
            .unwrap_or("");

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::raw(metrics.games_played.to_string()),
                Span::raw("  "),
                Span::styled("Walls/Self/Obstacles: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!(
                    "{}/{}/{}",
                    metrics.wall_deaths, metrics.self_deaths, metrics.obstacle_deaths
                )),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
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

    fn render_controls(&self, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ];

        if let Some(message) = metrics.last_event.and_then(Self::event_message) {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message, Style::default().fg(Color::Yellow)));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::game::{GameConfig, GameEngine};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_each_cell_kind_has_distinct_glyph() {
        let cells = [
            Cell::SnakeHead,
            Cell::SnakeBody,
            Cell::Food,
            Cell::Obstacle,
            Cell::Empty,
        ];
        let glyphs: Vec<String> = cells
            .iter()
            .map(|&cell| Renderer::cell_span(cell).content.to_string())
            .collect();

        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_render_active_game() {
        let engine = GameEngine::new(GameConfig::new(10).with_seed(1));
        let metrics = GameMetrics::new();
        let renderer = Renderer::new();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                renderer.render(frame, engine.state(), &metrics, HudInfo::default());
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Score"));
        assert!(text.contains("Snake"));
        assert!(text.contains("■"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_render_game_over() {
        let mut engine = GameEngine::new(
            GameConfig::open(10, 1).with_snake(vec![Position::new(0, 5)], crate::game::Direction::Left),
        );
        let mut metrics = GameMetrics::new();
        let result = engine.tick();
        metrics.on_step(&result, engine.state().score);

        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                let hud = HudInfo {
                    paused: true,
                    autopilot: false,
                };
                renderer.render(frame, engine.state(), &metrics, hud);
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Hit the wall"));
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn test_quiet_outcomes_have_no_message() {
        assert_eq!(Renderer::event_message(TickOutcome::Moved), None);
        assert_eq!(Renderer::event_message(TickOutcome::Frozen), None);
        assert!(Renderer::event_message(TickOutcome::Ate).is_some());
    }
}
