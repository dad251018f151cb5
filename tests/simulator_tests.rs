// Integration tests for the turn pipeline
//
// Uses instrumented stub providers to check phase ordering, fail-fast
// behavior, error context and the board handed back on failure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use battlesnake_fuzzer::board::{BoardState, Direction, Point, Snake, SnakeMove};
use battlesnake_fuzzer::error::{Failure, MapError, RulesError, SimulationError};
use battlesnake_fuzzer::maps::GameMap;
use battlesnake_fuzzer::rules::{Outcome, Ruleset, Settings};
use battlesnake_fuzzer::simulator::advance;

/// Records which phases ran, in order
#[derive(Default)]
struct Trace {
    calls: Mutex<Vec<&'static str>>,
}

impl Trace {
    fn push(&self, phase: &'static str) {
        self.calls.lock().unwrap().push(phase);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

/// Moves every snake's head one cell up and costs one health
struct StepUpRuleset<'a> {
    settings: Settings,
    trace: &'a Trace,
    fail: bool,
}

impl Ruleset for StepUpRuleset<'_> {
    fn name(&self) -> &str {
        "step-up"
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn execute(
        &self,
        state: &BoardState,
        _moves: &[SnakeMove],
    ) -> Result<Outcome, Failure<RulesError>> {
        self.trace.push("execute");
        let mut next = state.clone();
        for snake in &mut next.snakes {
            let head = Direction::Up.apply(snake.body[0]).unwrap();
            snake.body.insert(0, head);
            snake.body.pop();
            snake.health -= 1;
        }

        if self.fail {
            return Err(Failure {
                state: next,
                error: RulesError::NoMoveFound("b".to_string()),
            });
        }
        Ok(Outcome {
            game_over: false,
            state: next,
        })
    }
}

/// Counts hook calls and can fail either hook. Successful hooks add one food.
#[derive(Default)]
struct CountingMap<'a> {
    trace: Option<&'a Trace>,
    pre_calls: AtomicUsize,
    post_calls: AtomicUsize,
    fail_pre: bool,
    fail_post: bool,
}

impl GameMap for CountingMap<'_> {
    fn id(&self) -> &'static str {
        "counting"
    }

    fn pre_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError> {
        self.pre_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(trace) = self.trace {
            trace.push("pre");
        }
        next.food.push(Point::new(0, 0));
        if self.fail_pre {
            return Err(MapError::NotFound("pre".to_string()));
        }
        Ok(())
    }

    fn post_update_board(
        &self,
        _last: &BoardState,
        _settings: &Settings,
        next: &mut BoardState,
    ) -> Result<(), MapError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(trace) = self.trace {
            trace.push("post");
        }
        next.food.push(Point::new(10, 10));
        if self.fail_post {
            return Err(MapError::InvalidShrinkInterval);
        }
        Ok(())
    }
}

fn one_snake_board() -> BoardState {
    BoardState::new(11, 11)
        .with_turn(7)
        .with_snakes(vec![Snake::new("a", 100, vec![Point::new(5, 5), Point::new(5, 4)])])
}

fn up_moves() -> Vec<SnakeMove> {
    vec![SnakeMove::new("a", Direction::Up)]
}

#[test]
fn test_single_snake_moves_up_and_turn_advances() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: false,
    };
    let map = CountingMap::default();

    let next = advance(&ruleset, &map, one_snake_board(), &up_moves()).unwrap();

    assert_eq!(next.turn, 8);
    assert_eq!(next.snakes[0].head(), Some(Point::new(5, 6)));
    assert_eq!(next.snakes[0].health, 99);
    assert_eq!(next.food, vec![Point::new(0, 0), Point::new(10, 10)]);
}

#[test]
fn test_phases_run_in_order() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: false,
    };
    let map = CountingMap {
        trace: Some(&trace),
        ..CountingMap::default()
    };

    advance(&ruleset, &map, one_snake_board(), &up_moves()).unwrap();

    assert_eq!(trace.calls(), vec!["pre", "execute", "post"]);
}

#[test]
fn test_pre_update_failure_stops_the_turn() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: false,
    };
    let map = CountingMap {
        fail_pre: true,
        ..CountingMap::default()
    };
    let input = one_snake_board();

    let failure = advance(&ruleset, &map, input.clone(), &up_moves()).unwrap_err();

    assert!(trace.calls().is_empty(), "ruleset must not run");
    assert_eq!(map.post_calls.load(Ordering::SeqCst), 0);
    assert_eq!(failure.state, input);
    assert_eq!(
        failure.error,
        SimulationError::PreUpdate(MapError::NotFound("pre".to_string()))
    );
    assert!(failure
        .to_string()
        .starts_with("Error pre-updating board with game map: "));
}

#[test]
fn test_ruleset_failure_skips_post_update_and_keeps_partial_state() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: true,
    };
    let map = CountingMap::default();

    let failure = advance(&ruleset, &map, one_snake_board(), &up_moves()).unwrap_err();

    assert_eq!(map.pre_calls.load(Ordering::SeqCst), 1);
    assert_eq!(map.post_calls.load(Ordering::SeqCst), 0);
    assert_eq!(failure.state.turn, 7, "turn only advances on success");
    assert_eq!(failure.state.snakes[0].head(), Some(Point::new(5, 6)));
    assert_eq!(
        failure.to_string(),
        "Error updating board state from ruleset: move not provided for snake b"
    );
}

#[test]
fn test_post_update_failure_returns_ruleset_output() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: false,
    };
    let map = CountingMap {
        fail_post: true,
        ..CountingMap::default()
    };

    let failure = advance(&ruleset, &map, one_snake_board(), &up_moves()).unwrap_err();

    assert_eq!(map.post_calls.load(Ordering::SeqCst), 1);
    assert_eq!(failure.state.turn, 7);
    assert_eq!(failure.state.food, vec![Point::new(0, 0)]);
    assert_eq!(failure.state.snakes[0].health, 99);
    assert_eq!(
        failure.to_string(),
        "Error post-updating board with game map: royale game can't shrink more frequently than every turn"
    );
}

#[test]
fn test_each_phase_is_called_exactly_once() {
    let trace = Trace::default();
    let ruleset = StepUpRuleset {
        settings: Settings::default(),
        trace: &trace,
        fail: false,
    };
    let map = CountingMap::default();

    advance(&ruleset, &map, one_snake_board(), &up_moves()).unwrap();

    assert_eq!(map.pre_calls.load(Ordering::SeqCst), 1);
    assert_eq!(map.post_calls.load(Ordering::SeqCst), 1);
    assert_eq!(trace.calls(), vec!["execute"]);
}
