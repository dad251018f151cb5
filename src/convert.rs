// Conversion between the wire board and the simulation board
//
// Decoding ignores every presentation-only field. Encoding drops eliminated
// snakes and fills presentation fields with fixed values.

use crate::board::{BoardState, Point, Snake};
use crate::types::{Battlesnake, Board, Coord, Customizations, GameState};

/// Name reported for every snake in simulated boards
pub const SNAKE_NAME: &str = "fuzzer";

/// Builds a simulation board from a wire board. Turn starts at 0.
pub fn board_to_state(board: &Board) -> BoardState {
    BoardState::new(board.width, board.height)
        .with_food(coords_to_points(&board.food))
        .with_hazards(coords_to_points(&board.hazards))
        .with_snakes(board.snakes.iter().map(battlesnake_to_snake).collect())
}

/// Builds a simulation board from a full snapshot, keeping its turn number
pub fn game_to_state(game: &GameState) -> BoardState {
    board_to_state(&game.board).with_turn(game.turn)
}

fn coords_to_points(coords: &[Coord]) -> Vec<Point> {
    coords.iter().map(|c| Point::new(c.x, c.y)).collect()
}

fn battlesnake_to_snake(snake: &Battlesnake) -> Snake {
    Snake::new(snake.id.clone(), snake.health, coords_to_points(&snake.body))
}

/// Projects a simulation board back onto the wire, skipping eliminated snakes
///
/// # Panics
/// If a snake that is still in the game has an empty body.
pub fn state_to_board(state: &BoardState) -> Board {
    Board {
        height: state.height,
        width: state.width,
        snakes: state.alive_snakes().map(snake_to_battlesnake).collect(),
        food: points_to_coords(&state.food),
        hazards: points_to_coords(&state.hazards),
    }
}

fn points_to_coords(points: &[Point]) -> Vec<Coord> {
    points.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

fn snake_to_battlesnake(snake: &Snake) -> Battlesnake {
    let head = snake
        .head()
        .unwrap_or_else(|| panic!("snake {} is alive with an empty body", snake.id));

    Battlesnake {
        id: snake.id.clone(),
        name: SNAKE_NAME.to_string(),
        latency: "0".to_string(),
        health: snake.health,
        body: points_to_coords(&snake.body),
        head: Coord { x: head.x, y: head.y },
        length: snake.body.len() as i32,
        shout: String::new(),
        squad: String::new(),
        customizations: Customizations::default(),
    }
}
