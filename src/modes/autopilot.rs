//! Greedy bot that steers the snake while nobody is at the keyboard
//!
//! Each tick it looks at the three headings that are not a reversal, keeps
//! the ones whose next cell is free, and heads for the food by Manhattan
//! distance. Ties go to the move with more open neighbours, then to the
//! current heading.

use crate::game::{Direction, GameState, Position};

pub struct Autopilot;

impl Autopilot {
    /// Pick the heading to queue for the next tick, or `None` when no safe
    /// move exists (the snake is boxed in and will crash regardless).
    pub fn choose(state: &GameState) -> Option<Direction> {
        if state.game_over {
            return None;
        }

        let head = state.head();
        Direction::ALL
            .into_iter()
            .filter(|dir| !state.direction.is_opposite(*dir))
            .map(|dir| (dir, head.moved_in_direction(dir)))
            .filter(|&(_, next)| Self::is_safe(state, next))
            .min_by_key(|&(dir, next)| {
                (
                    next.manhattan_distance(state.food),
                    std::cmp::Reverse(Self::open_neighbours(state, next)),
                    dir != state.direction,
                )
            })
            .map(|(dir, _)| dir)
    }

    fn is_safe(state: &GameState, pos: Position) -> bool {
        state.is_in_bounds(pos) && !state.is_occupied_by_snake(pos) && !state.is_obstacle(pos)
    }

    fn open_neighbours(state: &GameState, pos: Position) -> usize {
        Direction::ALL
            .into_iter()
            .map(|dir| pos.moved_in_direction(dir))
            .filter(|&next| Self::is_safe(state, next))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine, TickOutcome};

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_heads_for_food() {
        let engine = GameEngine::new(
            GameConfig::open(10, 1)
                .with_snake(vec![p(5, 5)], Direction::Right)
                .with_food(p(5, 1)),
        );
        assert_eq!(Autopilot::choose(engine.state()), Some(Direction::Up));
    }

    #[test]
    fn test_never_reverses() {
        // Food directly behind the head
        let engine = GameEngine::new(
            GameConfig::open(10, 1)
                .with_snake(vec![p(5, 5)], Direction::Right)
                .with_food(p(2, 5)),
        );
        let choice = Autopilot::choose(engine.state());
        assert!(choice.is_some());
        assert_ne!(choice, Some(Direction::Left));
    }

    #[test]
    fn test_avoids_obstacles_and_walls() {
        // Food straight ahead but an obstacle in between; wall above
        let engine = GameEngine::new(
            GameConfig::open(10, 1)
                .with_snake(vec![p(5, 0)], Direction::Right)
                .with_obstacles(vec![p(6, 0)])
                .with_food(p(8, 0)),
        );
        assert_eq!(Autopilot::choose(engine.state()), Some(Direction::Down));
    }

    #[test]
    fn test_boxed_in_returns_none() {
        // Corner, body below, obstacle to the right
        let engine = GameEngine::new(
            GameConfig::open(10, 1)
                .with_snake(vec![p(0, 0), p(0, 1)], Direction::Up)
                .with_obstacles(vec![p(1, 0)]),
        );
        assert_eq!(Autopilot::choose(engine.state()), None);
    }

    #[test]
    fn test_autopilot_eats_on_open_board() {
        let mut engine = GameEngine::new(GameConfig::open(15, 77));

        for _ in 0..300 {
            if let Some(dir) = Autopilot::choose(engine.state()) {
                engine.queue_direction(dir);
            }
            if engine.tick().terminated {
                break;
            }
        }

        assert!(engine.state().score >= 3);
    }

    #[test]
    fn test_game_over_has_no_choice() {
        let mut engine = GameEngine::new(
            GameConfig::open(10, 1).with_snake(vec![p(0, 5)], Direction::Left),
        );
        assert!(matches!(engine.tick().outcome, TickOutcome::Collided(_)));
        assert_eq!(Autopilot::choose(engine.state()), None);
    }
}
