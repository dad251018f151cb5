// Replay module for re-running journaled simulations
//
// This module provides functionality to:
// 1. Parse JSONL simulation journals
// 2. Re-run each recorded request with its recorded ruleset, map and settings
// 3. Compare the recorded outcome against the replayed one
// 4. Generate a summary report

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::convert;
use crate::journal::JournalEntry;
use crate::simulator;
use crate::types::Board;

/// A simulation outcome as the client saw it: a board or an error message
pub type SimulationOutcome = Result<Board, String>;

/// Result of replaying a single journal entry
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub recorded: SimulationOutcome,
    pub replayed: SimulationOutcome,
    pub matches: bool,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for journal files
pub struct ReplayEngine {
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(verbose: bool) -> Self {
        ReplayEngine { verbose }
    }

    /// Loads all entries from a JSONL journal
    pub fn load_journal<P: AsRef<Path>>(&self, path: P) -> Result<Vec<JournalEntry>, String> {
        let file = File::open(path.as_ref())
            .map_err(|e| format!("Failed to open journal file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} journal entries", entries.len());
        Ok(entries)
    }

    /// Re-runs one recorded simulation and compares outcomes
    pub fn replay_entry(&self, entry: &JournalEntry) -> ReplayResult {
        let start_time = Instant::now();

        let state = convert::game_to_state(&entry.request.game);
        let replayed = simulator::advance_named(
            &entry.ruleset,
            &entry.map,
            &entry.settings,
            state,
            &entry.request.moves,
        )
        .map(|next| convert::state_to_board(&next))
        .map_err(|failure| failure.to_string());

        let recorded = entry.outcome();
        let matches = recorded == replayed;

        if self.verbose {
            if matches {
                info!("Turn {}: ✓ MATCH", entry.turn);
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - {}",
                    entry.turn,
                    describe_difference(&recorded, &replayed)
                );
            }
        }

        ReplayResult {
            turn: entry.turn,
            recorded,
            replayed,
            matches,
            computation_time_us: start_time.elapsed().as_micros(),
        }
    }

    /// Replays all entries in parallel, keeping journal order
    pub fn replay_all(&self, entries: &[JournalEntry]) -> Vec<ReplayResult> {
        entries.par_iter().map(|entry| self.replay_entry(entry)).collect()
    }

    /// Replays the entries recorded for specific turns
    pub fn replay_turns(
        &self,
        entries: &[JournalEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let matching: Vec<&JournalEntry> =
                entries.iter().filter(|e| e.turn == *turn_num).collect();
            if matching.is_empty() {
                return Err(format!("Turn {} not found in journal", turn_num));
            }
            results.extend(matching.into_iter().map(|entry| self.replay_entry(entry)));
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Simulation Time:   {:.1}µs\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {}",
                    result.turn,
                    describe_difference(&result.recorded, &result.replayed)
                );
            }
            println!();
        }
    }
}

/// One-line summary of how two outcomes differ
pub fn describe_difference(recorded: &SimulationOutcome, replayed: &SimulationOutcome) -> String {
    match (recorded, replayed) {
        (Ok(a), Ok(b)) => {
            let mut parts = Vec::new();
            if (a.width, a.height) != (b.width, b.height) {
                parts.push(format!(
                    "size {}x{} → {}x{}",
                    a.width, a.height, b.width, b.height
                ));
            }
            if a.food != b.food {
                parts.push(format!("food {} → {}", a.food.len(), b.food.len()));
            }
            if a.hazards != b.hazards {
                parts.push(format!("hazards {} → {}", a.hazards.len(), b.hazards.len()));
            }
            if a.snakes != b.snakes {
                let ids = |board: &Board| {
                    board
                        .snakes
                        .iter()
                        .map(|s| s.id.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                };
                parts.push(format!("snakes [{}] → [{}]", ids(a), ids(b)));
            }
            if parts.is_empty() {
                "no difference".to_string()
            } else {
                parts.join("; ")
            }
        }
        (Ok(_), Err(e)) => format!("recorded a board, replay failed: {}", e),
        (Err(e), Ok(_)) => format!("recorded error '{}', replay produced a board", e),
        (Err(a), Err(b)) if a == b => "no difference".to_string(),
        (Err(a), Err(b)) => format!("error '{}' → '{}'", a, b),
    }
}
