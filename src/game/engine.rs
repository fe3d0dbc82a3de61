use tracing::{debug, error, info, warn};

use super::{
    config::GameConfig,
    direction::Direction,
    food::FoodPlacer,
    state::{CollisionType, GameState, Position},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snake advanced one cell
    Moved,
    /// Snake advanced onto the food and grew
    Ate,
    /// Snake hit something; the game is over
    Collided(CollisionType),
    /// Snake ate the last food and no free cell remains; the game is over
    BoardFull,
    /// Game was already over, nothing changed
    Frozen,
}

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub outcome: TickOutcome,
    /// Whether the game is over after this step
    pub terminated: bool,
}

impl StepResult {
    fn running(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            terminated: false,
        }
    }

    fn terminal(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            terminated: true,
        }
    }
}

/// The game engine, the only thing that mutates [`GameState`]
///
/// It has no clock: a driver calls [`tick`](Self::tick) on its own cadence
/// and [`queue_direction`](Self::queue_direction) whenever input arrives.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    food: FoodPlacer,
}

impl GameEngine {
    /// Create a new game engine and start the first game
    pub fn new(config: GameConfig) -> Self {
        let mut food = FoodPlacer::new(config.food_seed);
        let state = Self::fresh_state(&config, &mut food);
        Self {
            config,
            state,
            food,
        }
    }

    /// Replace the current game with a fresh one built from `config`
    pub fn reset(&mut self, config: GameConfig) -> &GameState {
        self.food = FoodPlacer::new(config.food_seed);
        self.state = Self::fresh_state(&config, &mut self.food);
        self.config = config;
        &self.state
    }

    /// Start over with the configuration of the current game
    pub fn restart(&mut self) -> &GameState {
        self.reset(self.config.clone())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Request a turn for the next tick.
    ///
    /// Reversals of the current heading are dropped, and so is any input
    /// while the game is over. A later request replaces an earlier one.
    pub fn queue_direction(&mut self, requested: Direction) {
        if self.state.game_over {
            return;
        }

        if self.state.direction.is_opposite(requested) {
            debug!(?requested, current = ?self.state.direction, "reversal ignored");
            return;
        }

        self.state.pending_direction = Some(requested);
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> StepResult {
        let state = &mut self.state;

        if state.game_over {
            return StepResult::terminal(TickOutcome::Frozen);
        }

        // Resolve the queued turn against the heading as of now; a stale
        // reversal is dropped rather than kept for later.
        if let Some(pending) = state.pending_direction.take()
            && !state.direction.is_opposite(pending)
        {
            state.direction = pending;
        }

        let new_head = state.head().moved_in_direction(state.direction);
        state.steps += 1;

        if let Some(collision) = Self::check_collision(state, new_head) {
            state.game_over = true;
            info!(
                ?collision,
                score = state.score,
                steps = state.steps,
                "game over"
            );
            return StepResult::terminal(TickOutcome::Collided(collision));
        }

        state.snake.insert(0, new_head);

        if new_head != state.food {
            state.snake.pop();
            return StepResult::running(TickOutcome::Moved);
        }

        state.score += 1;
        debug!(score = state.score, len = state.snake.len(), "food eaten");

        match self
            .food
            .place(state.grid_size, &state.snake, &state.obstacles)
        {
            Some(food) => {
                state.food = food;
                StepResult::running(TickOutcome::Ate)
            }
            None => {
                error!(
                    grid_size = state.grid_size,
                    len = state.snake.len(),
                    "no free cell left for food"
                );
                state.game_over = true;
                StepResult::terminal(TickOutcome::BoardFull)
            }
        }
    }

    /// Check if the new head position causes a collision.
    ///
    /// The whole pre-move body counts, tail included.
    fn check_collision(state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.is_occupied_by_snake(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    /// Build the opening state. A config whose layout cannot hold a valid
    /// game is replaced by the default layout.
    fn fresh_state(config: &GameConfig, food: &mut FoodPlacer) -> GameState {
        let fallback;
        let config = match config.validate_layout() {
            Ok(()) => config,
            Err(err) => {
                warn!(%err, "unusable layout, starting from the default board");
                fallback = config.default_layout();
                &fallback
            }
        };

        let snake = config.initial_snake.clone();
        let obstacles = config.obstacle_set();

        let is_free = |pos: &Position| {
            pos.is_within(config.grid_size) && !snake.contains(pos) && !obstacles.contains(pos)
        };

        let food_pos = config
            .initial_food
            .filter(is_free)
            .or_else(|| food.place(config.grid_size, &snake, &obstacles))
            // Unreachable: a valid layout always leaves a free cell
            .unwrap_or(snake[0]);

        info!(
            grid_size = config.grid_size,
            len = snake.len(),
            obstacles = obstacles.len(),
            seed = ?config.food_seed,
            "new game"
        );

        GameState::new(
            snake,
            config.initial_direction,
            food_pos,
            obstacles,
            config.grid_size,
        )
    }
}
