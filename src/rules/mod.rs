// Rulesets: move resolution, health, feeding and elimination
//
// Every built-in ruleset is a pipeline of stages run against a copy of the
// input board. The first stage to fail or to report game over ends the turn.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{BoardState, SnakeMove};
use crate::error::{Failure, RulesError};

pub mod stages;

/// Health a snake is restored to when it eats
pub const SNAKE_MAX_HEALTH: i32 = 100;

pub const STANDARD: &str = "standard";
pub const SOLO: &str = "solo";
pub const WRAPPED: &str = "wrapped";
pub const CONSTRICTOR: &str = "constrictor";

/// Names accepted by [`named_ruleset`]
pub const RULESET_NAMES: [&str; 4] = [STANDARD, SOLO, WRAPPED, CONSTRICTOR];

/// Tunable game parameters shared by rulesets and maps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Percent chance per turn that a map spawns one extra food
    pub food_spawn_chance: i32,
    pub minimum_food: i32,
    pub hazard_damage_per_turn: i32,
    pub shrink_every_n_turns: i32,
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            food_spawn_chance: 15,
            minimum_food: 1,
            hazard_damage_per_turn: 14,
            shrink_every_n_turns: 25,
            seed: 0,
        }
    }
}

impl Settings {
    /// Random source for a given turn. The same seed and turn always yield
    /// the same sequence.
    pub fn rng(&self, turn: i32) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(turn as u64))
    }
}

/// Result of a ruleset run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub game_over: bool,
    pub state: BoardState,
}

/// A move-resolution provider
pub trait Ruleset: Send + Sync {
    fn name(&self) -> &str;

    fn settings(&self) -> &Settings;

    /// Resolves one turn of moves. On failure the returned state may be
    /// partially updated.
    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
    ) -> Result<Outcome, Failure<RulesError>>;
}

/// One step of a ruleset. Returns `Ok(true)` when the game is over.
pub type Stage = fn(&mut BoardState, &Settings, &[SnakeMove]) -> Result<bool, RulesError>;

const STANDARD_STAGES: &[Stage] = &[
    stages::require_bodies,
    stages::game_over_standard,
    stages::move_snakes_standard,
    stages::reduce_snake_health,
    stages::damage_hazards,
    stages::feed_snakes,
    stages::eliminate_snakes,
];

const SOLO_STAGES: &[Stage] = &[
    stages::require_bodies,
    stages::game_over_solo,
    stages::move_snakes_standard,
    stages::reduce_snake_health,
    stages::damage_hazards,
    stages::feed_snakes,
    stages::eliminate_snakes,
];

const WRAPPED_STAGES: &[Stage] = &[
    stages::require_bodies,
    stages::game_over_standard,
    stages::move_snakes_wrapped,
    stages::reduce_snake_health,
    stages::damage_hazards,
    stages::feed_snakes,
    stages::eliminate_snakes,
];

const CONSTRICTOR_STAGES: &[Stage] = &[
    stages::require_bodies,
    stages::game_over_standard,
    stages::move_snakes_standard,
    stages::remove_food_constrictor,
    stages::eliminate_snakes,
    stages::grow_snakes_constrictor,
];

/// A ruleset made of a fixed list of stages
pub struct PipelineRuleset {
    name: String,
    settings: Settings,
    stages: &'static [Stage],
}

impl Ruleset for PipelineRuleset {
    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn execute(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
    ) -> Result<Outcome, Failure<RulesError>> {
        let mut next = state.clone();

        for stage in self.stages {
            match stage(&mut next, &self.settings, moves) {
                Ok(false) => {}
                Ok(true) => {
                    return Ok(Outcome {
                        game_over: true,
                        state: next,
                    })
                }
                Err(error) => return Err(Failure { state: next, error }),
            }
        }

        Ok(Outcome {
            game_over: false,
            state: next,
        })
    }
}

/// Looks up a built-in ruleset by name
pub fn named_ruleset(name: &str, settings: Settings) -> Result<Box<dyn Ruleset>, RulesError> {
    let stages = match name {
        STANDARD => STANDARD_STAGES,
        SOLO => SOLO_STAGES,
        WRAPPED => WRAPPED_STAGES,
        CONSTRICTOR => CONSTRICTOR_STAGES,
        _ => return Err(RulesError::UnknownRuleset(name.to_string())),
    };

    Ok(Box::new(PipelineRuleset {
        name: name.to_string(),
        settings,
        stages,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_every_listed_name_resolves() {
        for name in RULESET_NAMES {
            let ruleset = named_ruleset(name, Settings::default()).unwrap();
            assert_eq!(ruleset.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert_eq!(
            named_ruleset("royale-deluxe", Settings::default()).err(),
            Some(RulesError::UnknownRuleset("royale-deluxe".to_string()))
        );
    }

    #[test]
    fn test_rng_is_deterministic_per_turn() {
        let settings = Settings {
            seed: 7,
            ..Settings::default()
        };
        let a: u32 = settings.rng(3).random();
        let b: u32 = settings.rng(3).random();
        assert_eq!(a, b);
    }
}
