//! Food placement
//!
//! Food goes on a uniformly random cell that is neither snake nor obstacle.
//! Sampling is tried first; after enough misses the free cells are
//! enumerated instead, which keeps the distribution uniform and makes
//! placement terminate on crowded boards.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::state::Position;

/// Random samples tried per cell of the grid before enumerating
const SAMPLES_PER_CELL: usize = 4;

pub struct FoodPlacer {
    rng: StdRng,
}

impl FoodPlacer {
    /// Seeded placers produce the same sequence of positions for the same
    /// sequence of boards.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Pick a free cell, or `None` if snake and obstacles cover the grid.
    pub fn place(
        &mut self,
        grid_size: usize,
        snake: &[Position],
        obstacles: &HashSet<Position>,
    ) -> Option<Position> {
        let attempts = grid_size.saturating_mul(grid_size).saturating_mul(SAMPLES_PER_CELL);
        self.place_with_attempts(grid_size, snake, obstacles, attempts)
    }

    /// Like [`place`](Self::place), with an explicit sampling budget before
    /// falling back to enumerating the free cells.
    pub fn place_with_attempts(
        &mut self,
        grid_size: usize,
        snake: &[Position],
        obstacles: &HashSet<Position>,
        attempts: usize,
    ) -> Option<Position> {
        if grid_size == 0 {
            return None;
        }

        let is_free = |pos: &Position| !snake.contains(pos) && !obstacles.contains(pos);

        for _ in 0..attempts {
            let pos = self.sample(grid_size);
            if is_free(&pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..grid_size as i32)
            .flat_map(|y| (0..grid_size as i32).map(move |x| Position::new(x, y)))
            .filter(is_free)
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn sample(&mut self, grid_size: usize) -> Position {
        let x = self.rng.gen_range(0..grid_size) as i32;
        let y = self.rng.gen_range(0..grid_size) as i32;
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_avoids_snake_and_obstacles() {
        let mut placer = FoodPlacer::new(Some(3));
        let snake = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
        let obstacles = HashSet::from([Position::new(0, 1), Position::new(1, 1)]);

        for _ in 0..500 {
            let food = placer.place(4, &snake, &obstacles).unwrap();
            assert!(food.is_within(4));
            assert!(!snake.contains(&food));
            assert!(!obstacles.contains(&food));
        }
    }

    #[test]
    fn test_seeded_placement_is_reproducible() {
        let snake = vec![Position::new(5, 5)];
        let obstacles = HashSet::new();

        let mut a = FoodPlacer::new(Some(42));
        let mut b = FoodPlacer::new(Some(42));
        let seq_a: Vec<_> = (0..20).map(|_| a.place(30, &snake, &obstacles)).collect();
        let seq_b: Vec<_> = (0..20).map(|_| b.place(30, &snake, &obstacles)).collect();

        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_single_free_cell_is_found() {
        // 3x3 board with only (2, 2) free
        let snake = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
        let obstacles: HashSet<Position> = [(0, 1), (1, 1), (2, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(Position::from)
            .collect();

        let mut placer = FoodPlacer::new(Some(9));
        assert_eq!(
            placer.place(3, &snake, &obstacles),
            Some(Position::new(2, 2))
        );
    }

    #[test]
    fn test_enumeration_finds_single_free_cell() {
        let snake = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
        let obstacles: HashSet<Position> = [(0, 1), (1, 1), (2, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(Position::from)
            .collect();

        let mut placer = FoodPlacer::new(Some(5));
        for _ in 0..20 {
            assert_eq!(
                placer.place_with_attempts(3, &snake, &obstacles, 0),
                Some(Position::new(2, 2))
            );
        }
    }

    #[test]
    fn test_enumeration_spreads_over_free_cells() {
        // 3x3 board, free cells: (0, 2), (1, 2), (2, 2)
        let snake = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)];
        let obstacles: HashSet<Position> = [(0, 1), (1, 1), (2, 1)]
            .into_iter()
            .map(Position::from)
            .collect();

        let mut placer = FoodPlacer::new(Some(17));
        let mut seen = HashSet::new();
        for _ in 0..300 {
            let food = placer.place_with_attempts(3, &snake, &obstacles, 0).unwrap();
            assert_eq!(food.y, 2);
            seen.insert(food);
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_full_board_yields_none() {
        let snake = vec![Position::new(0, 0), Position::new(1, 0)];
        let obstacles = HashSet::from([Position::new(0, 1), Position::new(1, 1)]);

        let mut placer = FoodPlacer::new(Some(1));
        assert_eq!(placer.place(2, &snake, &obstacles), None);
        assert_eq!(placer.place(0, &[], &HashSet::new()), None);
    }
}
