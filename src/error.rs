//! Error types for rulesets, maps and the turn pipeline.

/// Errors reported by a ruleset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// No ruleset is registered under this name.
    #[error("unknown ruleset {0:?}")]
    UnknownRuleset(String),

    /// A snake still in the game has no move in the move list.
    #[error("move not provided for snake {0}")]
    NoMoveFound(String),

    /// A snake still in the game has no body segments.
    #[error("snake {0} is length zero")]
    ZeroLengthSnake(String),

    /// A snake's next head would leave the coordinate range.
    #[error("snake {0} moved past the coordinate limit")]
    CoordinateOverflow(String),
}

/// Errors reported by a game map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// No map is registered under this name.
    #[error("map not found: {0:?}")]
    NotFound(String),

    #[error("royale game can't shrink more frequently than every turn")]
    InvalidShrinkInterval,
}

/// A failure anywhere in the turn pipeline, tagged with the phase it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("Board {width}x{height} is outside the supported size of 0 to {max} per side")]
    BoardSize { width: i32, height: i32, max: i32 },

    #[error("Turn {0} can't be advanced")]
    TurnOverflow(i32),

    #[error("Failed to load ruleset {name:?}: {source}")]
    RulesetLoad { name: String, source: RulesError },

    #[error("Failed to load game map {name:?}: {source}")]
    MapLoad { name: String, source: MapError },

    #[error("Error pre-updating board with game map: {0}")]
    PreUpdate(#[source] MapError),

    #[error("Error updating board state from ruleset: {0}")]
    Execute(#[source] RulesError),

    #[error("Error post-updating board with game map: {0}")]
    PostUpdate(#[source] MapError),
}

/// A provider error together with the board it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<E> {
    pub state: crate::board::BoardState,
    pub error: E,
}
