use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    pub fn manhattan_distance(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Check if the position lies inside a square grid of the given size
    pub fn is_within(&self, grid_size: usize) -> bool {
        let size = grid_size as i64;
        (0..size).contains(&(self.x as i64)) && (0..size).contains(&(self.y as i64))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Snake ran into an obstacle
    Obstacle,
}

/// What occupies a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    SnakeHead,
    SnakeBody,
    Food,
    Obstacle,
    Empty,
}

/// Complete game state
///
/// Only [`GameEngine`](super::GameEngine) mutates it; everyone else reads
/// the snapshot returned by `GameEngine::state`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Body segments, with head at index 0
    pub snake: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    pub food: Position,
    /// Fixed for the lifetime of a game
    pub obstacles: HashSet<Position>,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
    pub game_over: bool,
    /// Turn requested since the last tick, applied on the next one
    pub pending_direction: Option<Direction>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Vec<Position>,
        direction: Direction,
        food: Position,
        obstacles: HashSet<Position>,
        grid_size: usize,
    ) -> Self {
        Self {
            snake,
            direction,
            food,
            obstacles,
            grid_size,
            score: 0,
            steps: 0,
            game_over: false,
            pending_direction: None,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.snake[1..]
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.grid_size)
    }

    /// Check if a position is occupied by the snake, head included
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Classify a cell for rendering. Out-of-bounds cells are `Empty`.
    pub fn cell_at(&self, pos: Position) -> Cell {
        if pos == self.head() {
            Cell::SnakeHead
        } else if self.body_segments().contains(&pos) {
            Cell::SnakeBody
        } else if pos == self.food {
            Cell::Food
        } else if self.is_obstacle(pos) {
            Cell::Obstacle
        } else {
            Cell::Empty
        }
    }

    /// Number of cells not taken by the snake or an obstacle
    pub fn free_cells(&self) -> usize {
        let occupied: HashSet<Position> = self
            .snake
            .iter()
            .chain(self.obstacles.iter())
            .copied()
            .collect();
        (self.grid_size * self.grid_size).saturating_sub(occupied.len())
    }
}
