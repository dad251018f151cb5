// Standalone replay tool for simulation journals
//
// Usage:
//   cargo run --bin replay -- <journal_file> [options]
//
// Options:
//   --all                  Replay every journaled simulation
//   --turns <turn1,turn2>  Replay simulations for specific turns (comma-separated)
//   --verbose              Show detailed output for each turn

use std::env;
use std::process;

use battlesnake_fuzzer::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Battlesnake Fuzzer Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <journal_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every entry in the journal");
    eprintln!("  --turns <T1,T2,...>     Replay entries for specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay the whole journal");
    eprintln!("  replay simulations.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific turns with per-turn output");
    eprintln!("  replay simulations.jsonl --turns 5,10,15 --verbose");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

enum Mode {
    All,
    Turns(Vec<i32>),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let journal_file = &args[1];
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some(Mode::All);
            }
            "--turns" => {
                let Some(turn_arg) = args.get(i + 1) else {
                    eprintln!("Error: --turns requires an argument");
                    process::exit(1);
                };
                match parse_turns(turn_arg) {
                    Ok(turns) => mode = Some(Mode::Turns(turns)),
                    Err(e) => {
                        eprintln!("Error parsing turns: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all or --turns");
        print_usage();
        process::exit(1);
    };

    println!("Replay journal: {}", journal_file);
    println!();

    let engine = ReplayEngine::new(verbose);

    let entries = match engine.load_journal(journal_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading journal: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Journal is empty");
        process::exit(1);
    }

    println!("Loaded {} journal entries\n", entries.len());

    let results = match mode {
        Mode::All => {
            println!("Replaying all {} simulations...\n", entries.len());
            engine.replay_all(&entries)
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            match engine.replay_turns(&entries, &turns) {
                Ok(results) => results,
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
    };

    engine.print_report(&results);

    if results.iter().any(|r| !r.matches) {
        process::exit(2);
    }
}
