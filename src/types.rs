// Battlesnake API Types
// See https://docs.battlesnake.com/api
//
// Every struct defaults missing fields so partially filled snapshots from a
// fuzzer still decode. Wrongly typed values are still rejected by serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::board::SnakeMove;

/// Ruleset metadata attached to a game
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RulesetInfo {
    pub name: String,
    pub version: String,
    pub settings: HashMap<String, Value>,
}

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Game {
    pub id: String,
    pub ruleset: RulesetInfo,
    pub map: String,
    pub timeout: i32,
    pub source: String,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub snakes: Vec<Battlesnake>,
    pub food: Vec<Coord>,
    pub hazards: Vec<Coord>,
}

/// Cosmetic settings a snake reports about itself
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Customizations {
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub latency: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    pub shout: String,
    pub squad: String,
    pub customizations: Customizations,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[serde(default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

/// Complete game state as a snake would receive it
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

/// Body of POST /simulate
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulateRequest {
    pub game: GameState,
    pub moves: Vec<SnakeMove>,
}
