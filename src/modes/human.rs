use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::game::{GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::modes::autopilot::Autopilot;
use crate::modes::terminal::{self, Tui};
use crate::render::{HudInfo, Renderer};

/// Ticks the autopilot waits on the game-over screen before restarting
const AUTOPILOT_RESTART_TICKS: u32 = 20;

pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    autopilot: bool,
    paused: bool,
    should_quit: bool,
    ticks_since_game_over: u32,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let tick_interval = Duration::from_millis(config.tick_ms.max(1));

        Self {
            engine: GameEngine::new(config),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_interval,
            autopilot: false,
            paused: false,
            should_quit: false,
            ticks_since_game_over: 0,
        }
    }

    /// Let the bot steer instead of the keyboard
    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = terminal::setup()?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        let restored = terminal::restore(&mut terminal);

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session finished"
        );
        session_result(result, restored)
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.tick_interval);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics, hud);
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

    fn hud(&self) -> HudInfo {
        HudInfo {
            paused: self.paused,
            autopilot: self.autopilot,
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(dir) => {
                // Turns go straight into the engine's queue; the engine
                // resolves them against the heading at the next tick.
                if !self.autopilot && !self.paused {
                    self.engine.queue_direction(dir);
                }
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        if self.paused {
            return;
        }

        if self.engine.state().game_over {
            if self.autopilot {
                self.ticks_since_game_over += 1;
                if self.ticks_since_game_over >= AUTOPILOT_RESTART_TICKS {
                    self.reset_game();
                }
            }
            return;
        }

        if self.autopilot
            && let Some(dir) = Autopilot::choose(self.engine.state())
        {
            self.engine.queue_direction(dir);
        }

        let result = self.engine.tick();
        self.metrics.on_step(&result, self.engine.state().score);
    }

    fn reset_game(&mut self) {
        let state = self.engine.state();
        if !state.game_over {
            // Abandoned mid-game; it still counts
            self.metrics.on_game_over(state.score);
        }

        self.engine.restart();
        self.metrics.on_game_start();
        self.ticks_since_game_over = 0;
        info!("game restarted");
    }
}

/// Combine the game loop's result with the terminal teardown's.
///
/// A failure inside the loop is the one reported; a teardown failure is
/// logged and only surfaces when the loop itself succeeded.
fn session_result(result: Result<()>, restored: Result<()>) -> Result<()> {
    if let Err(err) = &restored {
        error!(%err, "failed to restore terminal");
    }
    result.and(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};

    fn corner_config() -> GameConfig {
        GameConfig::open(10, 3).with_snake(vec![Position::new(0, 5)], Direction::Left)
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default());
        assert!(!mode.engine.state().game_over);
        assert_eq!(mode.engine.state().score, 0);
        assert_eq!(mode.tick_interval, Duration::from_millis(100));
        assert!(!mode.autopilot);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = HumanMode::new(corner_config());
        mode.update_game();
        assert!(mode.engine.state().game_over);
        assert_eq!(mode.metrics.games_played, 1);

        mode.apply_action(KeyAction::Restart);
        assert!(!mode.engine.state().game_over);
        assert_eq!(mode.engine.state().steps, 0);
    }

    #[test]
    fn test_restart_mid_game_counts_the_game() {
        let mut mode = HumanMode::new(
            GameConfig::open(10, 3)
                .with_snake(vec![Position::new(5, 5)], Direction::Right)
                .with_food(Position::new(6, 5)),
        );
        mode.update_game();
        assert_eq!(mode.engine.state().score, 1);
        assert!(!mode.engine.state().game_over);

        mode.apply_action(KeyAction::Restart);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 1);
        assert_eq!(mode.engine.state().score, 0);

        // Restarting from the game-over screen does not count twice
        let mut mode = HumanMode::new(corner_config());
        mode.update_game();
        mode.apply_action(KeyAction::Restart);
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_loop_error_survives_teardown_error() {
        let err = session_result(
            Err(anyhow::anyhow!("draw failed")),
            Err(anyhow::anyhow!("restore failed")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "draw failed");

        let err = session_result(Ok(()), Err(anyhow::anyhow!("restore failed"))).unwrap_err();
        assert_eq!(err.to_string(), "restore failed");

        assert!(session_result(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_turn_is_queued_in_engine() {
        let mut mode = HumanMode::new(GameConfig::open(10, 3));
        mode.apply_action(KeyAction::Turn(Direction::Down));
        assert_eq!(
            mode.engine.state().pending_direction,
            Some(Direction::Down)
        );

        mode.update_game();
        assert_eq!(mode.engine.state().direction, Direction::Down);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut mode = HumanMode::new(GameConfig::open(10, 3));
        mode.apply_action(KeyAction::TogglePause);
        mode.update_game();
        assert_eq!(mode.engine.state().steps, 0);
        assert!(mode.hud().paused);

        mode.apply_action(KeyAction::TogglePause);
        mode.update_game();
        assert_eq!(mode.engine.state().steps, 1);
    }

    #[test]
    fn test_quit() {
        let mut mode = HumanMode::new(GameConfig::default());
        mode.apply_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_autopilot_restarts_after_game_over() {
        let mut mode = HumanMode::new(corner_config()).with_autopilot(true);
        // Boxed against the left wall heading Left: the bot turns away
        mode.update_game();
        assert!(!mode.engine.state().game_over);

        let mut human = HumanMode::new(corner_config());
        human.update_game();
        assert!(human.engine.state().game_over);

        // Autopilot driver waits, then starts a new game
        let mut mode = HumanMode::new(corner_config()).with_autopilot(true);
        mode.engine.tick();
        assert!(mode.engine.state().game_over);
        for _ in 0..AUTOPILOT_RESTART_TICKS {
            mode.update_game();
        }
        assert!(!mode.engine.state().game_over);
    }

    #[test]
    fn test_autopilot_ignores_keyboard_turns() {
        let mut mode = HumanMode::new(GameConfig::open(10, 3)).with_autopilot(true);
        mode.apply_action(KeyAction::Turn(Direction::Up));
        assert_eq!(mode.engine.state().pending_direction, None);
    }
}
