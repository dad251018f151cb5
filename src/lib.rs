// Library exports for the Battlesnake fuzzer
// The server binary, the replay tool and the integration tests all build on these

pub mod board;
pub mod config;
pub mod convert;
pub mod error;
pub mod handler;
pub mod journal;
pub mod maps;
pub mod replay;
pub mod rules;
pub mod server;
pub mod simulator;
pub mod types;
