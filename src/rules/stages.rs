// Ruleset stages
//
// Each stage mutates the board in place and returns Ok(true) only when the
// game is already decided. Eliminated snakes are skipped by every stage.
//
// Turn 0 with no moves is the initial board: stages that move, hurt or remove
// snakes leave it alone.

use crate::board::{BoardState, Direction, EliminationCause, Point, Snake, SnakeMove};
use crate::error::RulesError;

use super::{Settings, SNAKE_MAX_HEALTH};

/// Every snake still in the game must have a body
pub fn require_bodies(
    board: &mut BoardState,
    _settings: &Settings,
    _moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    match board.alive_snakes().find(|s| s.body.is_empty()) {
        Some(snake) => Err(RulesError::ZeroLengthSnake(snake.id.clone())),
        None => Ok(false),
    }
}

/// Game ends once at most one snake remains
pub fn game_over_standard(
    board: &mut BoardState,
    _settings: &Settings,
    _moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    Ok(board.alive_snakes().count() <= 1)
}

/// Game ends once no snake remains
pub fn game_over_solo(
    board: &mut BoardState,
    _settings: &Settings,
    _moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    Ok(board.alive_snakes().count() == 0)
}

pub fn move_snakes_standard(
    board: &mut BoardState,
    _settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }

    for (index, head) in next_heads(board, moves)? {
        slither(&mut board.snakes[index], head);
    }
    Ok(false)
}

/// Same as the standard move, but heads leaving the board re-enter on the
/// opposite edge
pub fn move_snakes_wrapped(
    board: &mut BoardState,
    _settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }

    let (width, height) = (board.width, board.height);
    for (index, head) in next_heads(board, moves)? {
        slither(
            &mut board.snakes[index],
            Point::new(wrap(head.x, width), wrap(head.y, height)),
        );
    }
    Ok(false)
}

pub fn reduce_snake_health(
    board: &mut BoardState,
    _settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }

    for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
        snake.health = snake.health.saturating_sub(1);
    }
    Ok(false)
}

/// Every hazard under a snake's head costs `hazard_damage_per_turn`, unless
/// the head is also on food
pub fn damage_hazards(
    board: &mut BoardState,
    settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }
    let next_turn = board.turn.saturating_add(1);

    for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
        let head = match snake.head() {
            Some(head) => head,
            None => continue,
        };
        if board.food.contains(&head) {
            continue;
        }

        let hits = board.hazards.iter().filter(|&&h| h == head).count();
        if hits == 0 {
            continue;
        }

        let hits = i32::try_from(hits).unwrap_or(i32::MAX);
        let damage = hits.saturating_mul(settings.hazard_damage_per_turn);
        snake.health = snake.health.saturating_sub(damage).max(0);
        if snake.health == 0 {
            snake.eliminate(EliminationCause::Hazard, "", next_turn);
        }
    }
    Ok(false)
}

/// Snakes whose head lands on food grow by one and return to full health.
/// Food under several heads feeds all of them.
pub fn feed_snakes(
    board: &mut BoardState,
    _settings: &Settings,
    _moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    let mut remaining = Vec::with_capacity(board.food.len());

    for food in std::mem::take(&mut board.food) {
        let mut eaten = false;
        for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
            if snake.head() == Some(food) {
                grow(snake);
                snake.health = SNAKE_MAX_HEALTH;
                eaten = true;
            }
        }
        if !eaten {
            remaining.push(food);
        }
    }

    board.food = remaining;
    Ok(false)
}

/// Removes starved and out-of-bounds snakes, then resolves collisions.
///
/// A snake is out of bounds when any segment is off the board. Collisions are
/// detected against the board as it stands after the first pass and applied
/// together, so two snakes can take each other out.
pub fn eliminate_snakes(
    board: &mut BoardState,
    _settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }

    let next_turn = board.turn.saturating_add(1);
    let (width, height) = (board.width, board.height);
    let off_board = |p: &Point| p.x < 0 || p.x >= width || p.y < 0 || p.y >= height;

    for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
        if snake.body.is_empty() {
            return Err(RulesError::ZeroLengthSnake(snake.id.clone()));
        }

        if snake.health <= 0 {
            snake.eliminate(EliminationCause::OutOfHealth, "", next_turn);
        } else if snake.body.iter().any(off_board) {
            snake.eliminate(EliminationCause::OutOfBounds, "", next_turn);
        }
    }

    // Longest first, so a collision is credited to the longest snake involved
    let mut by_length: Vec<&Snake> = board.alive_snakes().collect();
    by_length.sort_by(|a, b| b.body.len().cmp(&a.body.len()));

    let mut collisions = Vec::new();
    for (index, snake) in board.snakes.iter().enumerate() {
        if !snake.is_alive() {
            continue;
        }
        let head = snake
            .head()
            .ok_or_else(|| RulesError::ZeroLengthSnake(snake.id.clone()))?;

        if has_body_collided(head, snake) {
            collisions.push((index, EliminationCause::SelfCollision, snake.id.clone()));
            continue;
        }

        if let Some(other) = by_length
            .iter()
            .find(|other| other.id != snake.id && has_body_collided(head, other))
        {
            collisions.push((index, EliminationCause::Collision, other.id.clone()));
            continue;
        }

        if let Some(other) = by_length
            .iter()
            .find(|other| other.id != snake.id && has_lost_head_to_head(snake, other))
        {
            collisions.push((index, EliminationCause::HeadToHeadCollision, other.id.clone()));
        }
    }

    for (index, cause, by) in collisions {
        board.snakes[index].eliminate(cause, &by, next_turn);
    }
    Ok(false)
}

/// Constrictor has no food: it is cleared and health stays full
pub fn remove_food_constrictor(
    board: &mut BoardState,
    _settings: &Settings,
    _moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    board.food.clear();
    for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
        snake.health = SNAKE_MAX_HEALTH;
    }
    Ok(false)
}

pub fn grow_snakes_constrictor(
    board: &mut BoardState,
    _settings: &Settings,
    moves: &[SnakeMove],
) -> Result<bool, RulesError> {
    if is_initialization(board, moves) {
        return Ok(false);
    }

    for snake in board.snakes.iter_mut().filter(|s| s.is_alive()) {
        grow(snake);
    }
    Ok(false)
}

fn is_initialization(board: &BoardState, moves: &[SnakeMove]) -> bool {
    board.turn == 0 && moves.is_empty()
}

/// New head for every alive snake, checked before any snake moves
fn next_heads(board: &BoardState, moves: &[SnakeMove]) -> Result<Vec<(usize, Point)>, RulesError> {
    plan_moves(board, moves)?
        .into_iter()
        .map(|(index, direction)| {
            let snake = &board.snakes[index];
            direction
                .apply(snake.body[0])
                .map(|head| (index, head))
                .ok_or_else(|| RulesError::CoordinateOverflow(snake.id.clone()))
        })
        .collect()
}

/// Checks every alive snake has a body and a move before anything moves.
/// The first move listed for a snake is the one applied.
fn plan_moves(
    board: &BoardState,
    moves: &[SnakeMove],
) -> Result<Vec<(usize, Direction)>, RulesError> {
    let mut planned = Vec::with_capacity(board.snakes.len());

    for (index, snake) in board.snakes.iter().enumerate() {
        if !snake.is_alive() {
            continue;
        }
        if snake.body.is_empty() {
            return Err(RulesError::ZeroLengthSnake(snake.id.clone()));
        }

        let requested = moves
            .iter()
            .find(|m| m.id == snake.id)
            .ok_or_else(|| RulesError::NoMoveFound(snake.id.clone()))?;

        let direction =
            Direction::parse(&requested.direction).unwrap_or_else(|| heading(&snake.body));
        planned.push((index, direction));
    }

    Ok(planned)
}

/// Direction the snake last moved in, or up when it can't be told
fn heading(body: &[Point]) -> Direction {
    if body.len() < 2 {
        return Direction::Up;
    }

    // A step longer than one cell means the snake wrapped around an edge
    let step = |from: i32, to: i32| match i64::from(to) - i64::from(from) {
        d if d > 1 => -1,
        d if d < -1 => 1,
        d => d,
    };

    match (step(body[1].x, body[0].x), step(body[1].y, body[0].y)) {
        (1, 0) => Direction::Right,
        (-1, 0) => Direction::Left,
        (0, -1) => Direction::Down,
        _ => Direction::Up,
    }
}

fn slither(snake: &mut Snake, head: Point) {
    snake.body.insert(0, head);
    snake.body.pop();
}

fn grow(snake: &mut Snake) {
    if let Some(&tail) = snake.body.last() {
        snake.body.push(tail);
    }
}

fn wrap(value: i32, size: i32) -> i32 {
    if size > 0 {
        value.rem_euclid(size)
    } else {
        value
    }
}

fn has_body_collided(head: Point, other: &Snake) -> bool {
    other.body.iter().skip(1).any(|&p| p == head)
}

fn has_lost_head_to_head(snake: &Snake, other: &Snake) -> bool {
    snake.head() == other.head() && snake.body.len() <= other.body.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Stage;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_heading_follows_neck_to_head() {
        assert_eq!(heading(&[p(5, 5), p(4, 5)]), Direction::Right);
        assert_eq!(heading(&[p(5, 5), p(5, 6)]), Direction::Down);
        assert_eq!(heading(&[p(5, 5), p(5, 5)]), Direction::Up);
        assert_eq!(heading(&[p(5, 5)]), Direction::Up);
    }

    #[test]
    fn test_heading_across_a_wrapped_edge() {
        // Head at x=0 with neck at x=10 means the snake moved right through the edge
        assert_eq!(heading(&[p(0, 5), p(10, 5)]), Direction::Right);
        assert_eq!(heading(&[p(5, 10), p(5, 0)]), Direction::Down);
    }

    #[test]
    fn test_heading_survives_extreme_coordinates() {
        assert_eq!(heading(&[p(i32::MAX, 0), p(i32::MIN, 0)]), Direction::Left);
        assert_eq!(heading(&[p(0, i32::MIN), p(0, i32::MAX)]), Direction::Up);
    }

    #[test]
    fn test_move_past_coordinate_limit_is_an_error() {
        let mut board = BoardState::new(11, 11).with_turn(3).with_snakes(vec![Snake::new(
            "a",
            100,
            vec![p(i32::MAX, 5), p(i32::MAX - 1, 5)],
        )]);
        let before = board.clone();

        let result = move_snakes_standard(
            &mut board,
            &Settings::default(),
            &[SnakeMove::new("a", Direction::Right)],
        );

        assert_eq!(result, Err(RulesError::CoordinateOverflow("a".to_string())));
        assert_eq!(board, before);
    }

    #[test]
    fn test_any_segment_off_board_is_out_of_bounds() {
        let mut board = BoardState::new(11, 11).with_turn(3).with_snakes(vec![
            Snake::new("a", 100, vec![p(0, 5), p(-1, 5)]),
            Snake::new("b", 100, vec![p(5, 5), p(5, 4)]),
        ]);

        eliminate_snakes(&mut board, &Settings::default(), &[]).unwrap();

        assert_eq!(board.snakes[0].eliminated_cause, EliminationCause::OutOfBounds);
        assert_eq!(board.snakes[0].eliminated_on_turn, 4);
        assert!(board.snakes[1].is_alive());
    }

    #[test]
    fn test_initial_board_is_left_alone() {
        let mut board = BoardState::new(11, 11).with_snakes(vec![Snake::new(
            "a",
            1,
            vec![p(-3, 5), p(-2, 5)],
        )]);
        let before = board.clone();
        let settings = Settings::default();

        let stages: [Stage; 6] = [
            move_snakes_standard,
            move_snakes_wrapped,
            reduce_snake_health,
            damage_hazards,
            eliminate_snakes,
            grow_snakes_constrictor,
        ];
        for stage in stages {
            assert_eq!(stage(&mut board, &settings, &[]), Ok(false));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_require_bodies_ignores_eliminated_snakes() {
        let mut gone = Snake::new("gone", 0, vec![]);
        gone.eliminate(EliminationCause::OutOfHealth, "", 2);
        let mut board = BoardState::new(5, 5).with_snakes(vec![gone]);
        assert_eq!(require_bodies(&mut board, &Settings::default(), &[]), Ok(false));

        board.snakes.push(Snake::new("empty", 100, vec![]));
        assert_eq!(
            require_bodies(&mut board, &Settings::default(), &[]),
            Err(RulesError::ZeroLengthSnake("empty".to_string()))
        );
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-1, 11), 10);
        assert_eq!(wrap(11, 11), 0);
        assert_eq!(wrap(4, 11), 4);
        assert_eq!(wrap(-1, 0), -1);
    }

    #[test]
    fn test_first_listed_move_wins() {
        let board = BoardState::new(11, 11).with_snakes(vec![Snake::new(
            "a",
            100,
            vec![p(5, 5), p(5, 4)],
        )]);
        let moves = vec![
            SnakeMove::new("a", Direction::Left),
            SnakeMove::new("a", Direction::Right),
        ];

        assert_eq!(plan_moves(&board, &moves), Ok(vec![(0, Direction::Left)]));
    }
}
