// Internal simulation model
//
// This is the representation rulesets and maps operate on. It carries
// elimination bookkeeping that never appears on the wire, and none of the
// presentation fields that do.

use serde::{Deserialize, Serialize};

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Parses a move string; anything but the four lowercase names is rejected
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Converts direction to string representation for API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Calculates the next point when moving in this direction, or `None` when
    /// the step leaves the `i32` range
    pub fn apply(&self, point: Point) -> Option<Point> {
        let Point { x, y } = point;
        match self {
            Direction::Up => y.checked_add(1).map(|y| Point { x, y }),
            Direction::Down => y.checked_sub(1).map(|y| Point { x, y }),
            Direction::Left => x.checked_sub(1).map(|x| Point { x, y }),
            Direction::Right => x.checked_add(1).map(|x| Point { x, y }),
        }
    }
}

/// Why a snake left the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EliminationCause {
    #[default]
    NotEliminated,
    Collision,
    SelfCollision,
    OutOfHealth,
    HeadToHeadCollision,
    OutOfBounds,
    Hazard,
}

impl EliminationCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationCause::NotEliminated => "",
            EliminationCause::Collision => "snake-collision",
            EliminationCause::SelfCollision => "snake-self-collision",
            EliminationCause::OutOfHealth => "out-of-health",
            EliminationCause::HeadToHeadCollision => "head-collision",
            EliminationCause::OutOfBounds => "wall-collision",
            EliminationCause::Hazard => "hazard",
        }
    }
}

/// A player on the board. The head is `body[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snake {
    pub id: String,
    pub health: i32,
    pub body: Vec<Point>,
    pub eliminated_cause: EliminationCause,
    pub eliminated_on_turn: i32,
    pub eliminated_by: String,
}

impl Snake {
    pub fn new(id: impl Into<String>, health: i32, body: Vec<Point>) -> Self {
        Snake {
            id: id.into(),
            health,
            body,
            ..Snake::default()
        }
    }

    pub fn is_alive(&self) -> bool {
        self.eliminated_cause == EliminationCause::NotEliminated
    }

    pub fn head(&self) -> Option<Point> {
        self.body.first().copied()
    }

    pub fn eliminate(&mut self, cause: EliminationCause, by: &str, turn: i32) {
        self.eliminated_cause = cause;
        self.eliminated_by = by.to_string();
        self.eliminated_on_turn = turn;
    }
}

/// Largest accepted width or height
pub const MAX_BOARD_SIZE: i32 = 1024;

/// Full board as seen by the simulation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardState {
    pub turn: i32,
    pub width: i32,
    pub height: i32,
    pub food: Vec<Point>,
    pub hazards: Vec<Point>,
    pub snakes: Vec<Snake>,
}

impl BoardState {
    pub fn new(width: i32, height: i32) -> Self {
        BoardState {
            width,
            height,
            ..BoardState::default()
        }
    }

    pub fn with_turn(mut self, turn: i32) -> Self {
        self.turn = turn;
        self
    }

    pub fn with_food(mut self, food: Vec<Point>) -> Self {
        self.food = food;
        self
    }

    pub fn with_hazards(mut self, hazards: Vec<Point>) -> Self {
        self.hazards = hazards;
        self
    }

    pub fn with_snakes(mut self, snakes: Vec<Snake>) -> Self {
        self.snakes = snakes;
        self
    }

    pub fn is_out_of_bounds(&self, point: Point) -> bool {
        point.x < 0 || point.x >= self.width || point.y < 0 || point.y >= self.height
    }

    pub fn alive_snakes(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.iter().filter(|s| s.is_alive())
    }
}

/// A requested move for one snake
///
/// `direction` stays a raw string: deciding what an unknown value means is the
/// ruleset's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeMove {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(rename = "move", alias = "Move")]
    pub direction: String,
}

impl SnakeMove {
    pub fn new(id: impl Into<String>, direction: Direction) -> Self {
        SnakeMove {
            id: id.into(),
            direction: direction.as_str().to_string(),
        }
    }
}
