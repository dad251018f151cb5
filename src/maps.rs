// Game maps: board effects applied around the ruleset
//
// A map edits a copy of the board before and after moves are resolved. The
// orchestration functions here own the copy, so a failing map never leaves a
// half-edited board behind.

use rand::Rng;
use std::collections::HashSet;

use crate::board::{BoardState, Direction, Point};
use crate::error::{Failure, MapError};
use crate::rules::Settings;

pub const STANDARD: &str = "standard";
pub const EMPTY: &str = "empty";
pub const ROYALE: &str = "royale";

/// Names accepted by [`get_map`]
pub const MAP_NAMES: [&str; 3] = [STANDARD, EMPTY, ROYALE];

/// A board-effect provider
///
/// `last` is the board as it was handed to the phase; edits go to `next`,
/// which starts as a copy of `last`.
pub trait GameMap: Send + Sync {
    fn id(&self) -> &'static str;

    fn pre_update_board(
        &self,
        last: &BoardState,
        settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError>;

    fn post_update_board(
        &self,
        last: &BoardState,
        settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError>;
}

/// Looks up a built-in map by name
pub fn get_map(id: &str) -> Result<&'static dyn GameMap, MapError> {
    match id {
        STANDARD => Ok(&StandardMap),
        EMPTY => Ok(&EmptyMap),
        ROYALE => Ok(&RoyaleMap),
        _ => Err(MapError::NotFound(id.to_string())),
    }
}

/// Runs the map's pre-update hook. On failure the input board comes back
/// untouched.
pub fn pre_update_board(
    map: &dyn GameMap,
    state: BoardState,
    settings: &Settings,
) -> Result<BoardState, Failure<MapError>> {
    let mut next = state.clone();
    map.pre_update_board(&state, settings, &mut next)
        .map(|()| next)
        .map_err(|error| Failure { state, error })
}

/// Runs the map's post-update hook. On failure the input board comes back
/// untouched.
pub fn post_update_board(
    map: &dyn GameMap,
    state: BoardState,
    settings: &Settings,
) -> Result<BoardState, Failure<MapError>> {
    let mut next = state.clone();
    map.post_update_board(&state, settings, &mut next)
        .map(|()| next)
        .map_err(|error| Failure { state, error })
}

/// Keeps food topped up; nothing else
pub struct StandardMap;

impl GameMap for StandardMap {
    fn id(&self) -> &'static str {
        STANDARD
    }

    fn pre_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        _next: &mut BoardState,
    ) -> Result<(), MapError> {
        Ok(())
    }

    fn post_update_board(
        &self,
        last: &BoardState,
        settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError> {
        spawn_food(last, settings, next);
        Ok(())
    }
}

/// Never changes the board
pub struct EmptyMap;

impl GameMap for EmptyMap {
    fn id(&self) -> &'static str {
        EMPTY
    }

    fn pre_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        _next: &mut BoardState,
    ) -> Result<(), MapError> {
        Ok(())
    }

    fn post_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        _next: &mut BoardState,
    ) -> Result<(), MapError> {
        Ok(())
    }
}

/// Standard food plus a hazard border that closes in every
/// `shrink_every_n_turns` turns
pub struct RoyaleMap;

impl GameMap for RoyaleMap {
    fn id(&self) -> &'static str {
        ROYALE
    }

    fn pre_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        _next: &mut BoardState,
    ) -> Result<(), MapError> {
        Ok(())
    }

    fn post_update_board(
        &self,
        last: &BoardState,
        settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError> {
        if settings.shrink_every_n_turns < 1 {
            return Err(MapError::InvalidShrinkInterval);
        }

        spawn_food(last, settings, next);

        // Hazards describe the turn being produced, not the one handed in
        let turn = last.turn.saturating_add(1);
        if turn < settings.shrink_every_n_turns {
            return Ok(());
        }

        // Seeded without the turn so every turn replays the same edge sequence
        let mut rng = settings.rng(0);
        let (mut min_x, mut max_x) = (0, last.width.saturating_sub(1));
        let (mut min_y, mut max_y) = (0, last.height.saturating_sub(1));
        for _ in 0..turn / settings.shrink_every_n_turns {
            // Once the box is empty every cell is a hazard
            if min_x > max_x || min_y > max_y {
                break;
            }
            match rng.random_range(0..4) {
                0 => min_x += 1,
                1 => max_x -= 1,
                2 => min_y += 1,
                _ => max_y -= 1,
            }
        }

        next.hazards = grid(last)
            .filter(|p| p.x < min_x || p.x > max_x || p.y < min_y || p.y > max_y)
            .collect();
        Ok(())
    }
}

fn spawn_food(last: &BoardState, settings: &Settings, next: &mut BoardState) {
    let mut rng = settings.rng(last.turn);

    let current = last.food.len() as i32;
    let needed = if current < settings.minimum_food {
        settings.minimum_food - current
    } else if settings.food_spawn_chance > 0
        && 100 - rng.random_range(0..100) < settings.food_spawn_chance
    {
        1
    } else {
        0
    };

    if needed <= 0 {
        return;
    }

    let mut free = unoccupied_points(next);
    for _ in 0..needed {
        if free.is_empty() {
            break;
        }
        let food = free.remove(rng.random_range(0..free.len()));
        next.food.push(food);
    }
}

/// Cells with no snake, food or hazard, and out of reach of every alive head
pub fn unoccupied_points(board: &BoardState) -> Vec<Point> {
    let mut occupied: HashSet<Point> = board
        .food
        .iter()
        .chain(board.hazards.iter())
        .chain(board.snakes.iter().flat_map(|s| s.body.iter()))
        .copied()
        .collect();

    for head in board.alive_snakes().filter_map(|s| s.head()) {
        occupied.extend(Direction::all().iter().filter_map(|d| d.apply(head)));
    }

    grid(board).filter(|p| !occupied.contains(p)).collect()
}

/// Every cell, row by row from the bottom
fn grid(board: &BoardState) -> impl Iterator<Item = Point> {
    let (width, height) = (board.width, board.height);
    (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Snake;

    #[test]
    fn test_unoccupied_points_excludes_bodies_and_head_neighbours() {
        let board = BoardState::new(3, 3)
            .with_food(vec![Point::new(2, 2)])
            .with_snakes(vec![Snake::new("a", 100, vec![Point::new(0, 0)])]);

        let free = unoccupied_points(&board);
        assert_eq!(
            free,
            vec![
                Point::new(2, 0),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(0, 2),
                Point::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_every_listed_map_resolves() {
        for name in MAP_NAMES {
            assert_eq!(get_map(name).map(|m| m.id()), Ok(name));
        }
    }
}
