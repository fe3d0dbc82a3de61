use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::Position;

/// Configuration for a game
///
/// Every field has a default, so a TOML file only needs the keys it wants
/// to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Initial snake body, head first
    pub initial_snake: Vec<Position>,
    pub initial_direction: Direction,
    /// Impassable cells, fixed for the whole game
    pub obstacles: Vec<Position>,
    /// Seed for food placement; system entropy when absent
    pub food_seed: Option<u64>,
    /// Cell for the first food item, used only if it is in bounds and free
    pub initial_food: Option<Position>,
    /// Driver cadence in milliseconds per tick
    pub tick_ms: u64,
}

pub const DEFAULT_GRID_SIZE: usize = 30;
pub const DEFAULT_START: Position = Position { x: 5, y: 5 };
pub const DEFAULT_TICK_MS: u64 = 100;

/// Fixed obstacle layout used when the config does not provide one
pub fn default_obstacles() -> Vec<Position> {
    [
        (10, 10),
        (11, 10),
        (12, 10),
        (13, 10),
        (20, 18),
        (20, 19),
        (20, 20),
        (20, 21),
        (8, 24),
        (9, 24),
        (10, 24),
    ]
    .into_iter()
    .map(Position::from)
    .collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_snake: vec![DEFAULT_START],
            initial_direction: Direction::Right,
            obstacles: default_obstacles(),
            food_seed: None,
            initial_food: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size, keeping the
    /// default obstacles that fit on it
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            obstacles: default_obstacles()
                .into_iter()
                .filter(|pos| pos.is_within(grid_size))
                .collect(),
            ..Default::default()
        }
    }

    /// An open board: no obstacles, seeded food
    pub fn open(grid_size: usize, seed: u64) -> Self {
        Self {
            grid_size,
            obstacles: Vec::new(),
            food_seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_snake(mut self, snake: Vec<Position>, direction: Direction) -> Self {
        self.initial_snake = snake;
        self.initial_direction = direction;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Position>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_food(mut self, food: Position) -> Self {
        self.initial_food = Some(food);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.food_seed = Some(seed);
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn obstacle_set(&self) -> HashSet<Position> {
        self.obstacles.iter().copied().collect()
    }

    /// Check everything the binary needs before starting a game: the
    /// layout, the tick rate and that the snake is not aimed at its own neck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidTickRate);
        }

        self.validate_layout()?;

        if let [head, neck, ..] = self.initial_snake.as_slice()
            && head.moved_in_direction(self.initial_direction) == *neck
        {
            return Err(ConfigError::HeadingIntoBody(self.initial_direction));
        }

        Ok(())
    }

    /// Check that the board this config describes can hold a valid game:
    /// every cell in bounds, a connected snake with no repeats, no snake on
    /// an obstacle and at least one free cell for food.
    ///
    /// The engine falls back to the default layout when this fails. A
    /// heading into the neck passes here; it is a legal (if short) game
    /// that ends in a self-collision on the first tick.
    pub fn validate_layout(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > i32::MAX as usize {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if self.initial_snake.is_empty() {
            return Err(ConfigError::EmptySnake);
        }

        for &pos in self.initial_snake.iter().chain(self.obstacles.iter()) {
            if !pos.is_within(self.grid_size) {
                return Err(ConfigError::OutOfBounds(pos));
            }
        }

        let mut seen = HashSet::new();
        for &pos in &self.initial_snake {
            if !seen.insert(pos) {
                return Err(ConfigError::DuplicateSnakeCell(pos));
            }
        }

        for pair in self.initial_snake.windows(2) {
            if pair[0].manhattan_distance(pair[1]) != 1 {
                return Err(ConfigError::DisjointSnake(pair[0], pair[1]));
            }
        }

        let obstacles = self.obstacle_set();
        if let Some(&pos) = self.initial_snake.iter().find(|p| obstacles.contains(p)) {
            return Err(ConfigError::SnakeOnObstacle(pos));
        }

        let occupied = seen.len() + obstacles.len();
        if occupied >= self.grid_size * self.grid_size {
            return Err(ConfigError::NoFreeCell {
                grid_size: self.grid_size,
                occupied,
            });
        }

        Ok(())
    }

    /// The default layout, keeping this config's seed and cadence
    pub fn default_layout(&self) -> Self {
        Self {
            food_seed: self.food_seed,
            tick_ms: self.tick_ms,
            ..Self::default()
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Grid size must be positive and fit in i32, got {0}")]
    InvalidGridSize(usize),

    #[error("Tick interval must be at least 1ms")]
    InvalidTickRate,

    #[error("Initial snake must have at least one segment")]
    EmptySnake,

    #[error("Position ({}, {}) lies outside the grid", .0.x, .0.y)]
    OutOfBounds(Position),

    #[error("Snake occupies ({}, {}) more than once", .0.x, .0.y)]
    DuplicateSnakeCell(Position),

    #[error("Snake segments ({}, {}) and ({}, {}) are not adjacent", .0.x, .0.y, .1.x, .1.y)]
    DisjointSnake(Position, Position),

    #[error("Snake segment ({}, {}) overlaps an obstacle", .0.x, .0.y)]
    SnakeOnObstacle(Position),

    #[error("Initial direction {0:?} points back into the snake's body")]
    HeadingIntoBody(Direction),

    #[error("No free cell for food: {occupied} of {grid_size}x{grid_size} cells occupied")]
    NoFreeCell { grid_size: usize, occupied: usize },
}
