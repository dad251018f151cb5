// Turn simulation
//
// `advance` sequences one tick: map pre-update, ruleset, map post-update,
// then the turn counter. `Simulator` wraps it with name resolution,
// conversion to and from the wire, and the journal.

use log::{debug, info, warn};
use rand::Rng;

use crate::board::{BoardState, SnakeMove, MAX_BOARD_SIZE};
use crate::config::Config;
use crate::convert;
use crate::error::SimulationError;
use crate::journal::Journal;
use crate::maps::{self, GameMap};
use crate::rules::{self, Ruleset, Settings};
use crate::types::{Board, SimulateRequest};

/// A failed turn, with the most recent board the pipeline produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct AdvanceFailure {
    pub state: BoardState,
    pub error: SimulationError,
}

/// Advances `state` by one turn.
///
/// The first failing phase ends the turn; later phases never run. Boards whose
/// size or turn can't be simulated fail before any phase.
pub fn advance(
    ruleset: &dyn Ruleset,
    map: &dyn GameMap,
    state: BoardState,
    moves: &[SnakeMove],
) -> Result<BoardState, AdvanceFailure> {
    let next_turn = match check_board(&state) {
        Ok(next_turn) => next_turn,
        Err(error) => return Err(AdvanceFailure { state, error }),
    };
    let settings = ruleset.settings();

    let state = maps::pre_update_board(map, state, settings).map_err(|f| AdvanceFailure {
        state: f.state,
        error: SimulationError::PreUpdate(f.error),
    })?;

    let outcome = ruleset.execute(&state, moves).map_err(|f| AdvanceFailure {
        state: f.state,
        error: SimulationError::Execute(f.error),
    })?;
    if outcome.game_over {
        debug!("Ruleset {} reports game over at turn {}", ruleset.name(), state.turn);
    }

    let mut state = maps::post_update_board(map, outcome.state, settings).map_err(|f| {
        AdvanceFailure {
            state: f.state,
            error: SimulationError::PostUpdate(f.error),
        }
    })?;

    state.turn = next_turn;
    Ok(state)
}

/// Returns the turn the board will advance to
fn check_board(state: &BoardState) -> Result<i32, SimulationError> {
    let size = 0..=MAX_BOARD_SIZE;
    if !size.contains(&state.width) || !size.contains(&state.height) {
        return Err(SimulationError::BoardSize {
            width: state.width,
            height: state.height,
            max: MAX_BOARD_SIZE,
        });
    }

    state
        .turn
        .checked_add(1)
        .ok_or(SimulationError::TurnOverflow(state.turn))
}

/// Simulation service with static configuration
/// Shared read-only between requests
pub struct Simulator {
    ruleset_name: String,
    map_name: String,
    settings: Settings,
    journal: Journal,
}

impl Simulator {
    /// Creates a simulator without a journal
    ///
    /// When the configuration has no seed, one is drawn now and used for the
    /// lifetime of the simulator.
    pub fn new(config: &Config) -> Self {
        let seed = config
            .simulation
            .seed
            .unwrap_or_else(|| rand::rng().random());
        info!(
            "Simulating ruleset '{}' on map '{}' with seed {}",
            config.simulation.ruleset, config.simulation.map, seed
        );

        Simulator {
            ruleset_name: config.simulation.ruleset.clone(),
            map_name: config.simulation.map.clone(),
            settings: config.settings.to_settings(seed),
            journal: Journal::disabled(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Advances an internal board with the configured ruleset and map
    pub fn advance(
        &self,
        state: BoardState,
        moves: &[SnakeMove],
    ) -> Result<BoardState, AdvanceFailure> {
        advance_named(&self.ruleset_name, &self.map_name, &self.settings, state, moves)
    }

    /// Runs one wire request through decode, advance and encode
    pub fn simulate(&self, request: &SimulateRequest) -> Result<Board, AdvanceFailure> {
        let state = convert::game_to_state(&request.game);
        info!(
            "Turn {}: simulating {} snakes with {} moves",
            state.turn,
            state.snakes.len(),
            request.moves.len()
        );

        let result = self.advance(state, &request.moves);
        match &result {
            Ok(next) => debug!("Turn {} simulated", next.turn),
            Err(failure) => warn!("Simulation failed: {}", failure),
        }

        let result = result.map(|next| convert::state_to_board(&next));
        self.journal.log_simulation(
            request.clone(),
            &self.ruleset_name,
            &self.map_name,
            &self.settings,
            result.as_ref().map_err(|f| f.to_string()),
        );
        result
    }
}

/// Resolves the ruleset and map by name, then advances
pub fn advance_named(
    ruleset_name: &str,
    map_name: &str,
    settings: &Settings,
    state: BoardState,
    moves: &[SnakeMove],
) -> Result<BoardState, AdvanceFailure> {
    let ruleset = match rules::named_ruleset(ruleset_name, settings.clone()) {
        Ok(ruleset) => ruleset,
        Err(source) => {
            return Err(AdvanceFailure {
                state,
                error: SimulationError::RulesetLoad {
                    name: ruleset_name.to_string(),
                    source,
                },
            })
        }
    };

    let map = match maps::get_map(map_name) {
        Ok(map) => map,
        Err(source) => {
            return Err(AdvanceFailure {
                state,
                error: SimulationError::MapLoad {
                    name: map_name.to_string(),
                    source,
                },
            })
        }
    };

    advance(ruleset.as_ref(), map, state, moves)
}
