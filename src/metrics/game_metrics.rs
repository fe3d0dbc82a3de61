use std::time::{Duration, Instant};

use crate::game::{CollisionType, StepResult, TickOutcome};

/// Per-session statistics shown alongside the board
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub food_eaten: u32,
    pub wall_deaths: u32,
    pub self_deaths: u32,
    pub obstacle_deaths: u32,
    /// Last outcome that is worth showing to the player
    pub last_event: Option<TickOutcome>,
    /// Frozen once the current game ends
    game_running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            food_eaten: 0,
            wall_deaths: 0,
            self_deaths: 0,
            obstacle_deaths: 0,
            last_event: None,
            game_running: true,
        }
    }

    pub fn update(&mut self) {
        if self.game_running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.last_event = None;
        self.game_running = true;
    }

    /// Record the result of a tick; `score` is the score after it.
    pub fn on_step(&mut self, result: &StepResult, score: u32) {
        match result.outcome {
            TickOutcome::Moved | TickOutcome::Frozen => return,
            TickOutcome::Ate => self.food_eaten += 1,
            TickOutcome::Collided(CollisionType::Wall) => self.wall_deaths += 1,
            TickOutcome::Collided(CollisionType::SelfCollision) => self.self_deaths += 1,
            TickOutcome::Collided(CollisionType::Obstacle) => self.obstacle_deaths += 1,
            TickOutcome::BoardFull => {}
        }
        self.last_event = Some(result.outcome);

        if result.terminated {
            self.on_game_over(score);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.game_running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
