// Simulation journal for asynchronous request logging
//
// Fire-and-forget JSONL logging so the request/response cycle never waits on
// disk. Each line records one simulation with everything needed to replay it.

use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::rules::Settings;
use crate::types::{Board, SimulateRequest};

/// One simulated turn as written to the journal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub turn: i32,
    pub ruleset: String,
    pub map: String,
    pub settings: Settings,
    pub request: SimulateRequest,
    #[serde(default)]
    pub response: Option<Board>,
    #[serde(default)]
    pub error: Option<String>,
    pub timestamp: String,
}

impl JournalEntry {
    /// The outcome recorded when the entry was written
    pub fn outcome(&self) -> Result<Board, String> {
        match (&self.response, &self.error) {
            (Some(board), _) => Ok(board.clone()),
            (None, Some(error)) => Err(error.clone()),
            (None, None) => Err("entry records neither a board nor an error".to_string()),
        }
    }
}

/// Shared journal state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct Journal {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl Journal {
    /// Creates a new journal
    /// If enabled is true, initializes the journal file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Journal::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Simulation journal enabled: {}", log_file_path);
                Journal {
                    file: Arc::new(Mutex::new(Some(File::from_std(file)))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create journal file '{}': {}", log_file_path, e);
                Journal::disabled()
            }
        }
    }

    /// Creates a disabled journal (no-op)
    pub fn disabled() -> Self {
        Journal {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a simulation asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_simulation(
        &self,
        request: SimulateRequest,
        ruleset: &str,
        map: &str,
        settings: &Settings,
        outcome: Result<&Board, String>,
    ) {
        if !self.enabled {
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("Journal write skipped: no async runtime");
                return;
            }
        };

        let (response, error) = match outcome {
            Ok(board) => (Some(board.clone()), None),
            Err(message) => (None, Some(message)),
        };
        let entry = JournalEntry {
            turn: request.game.turn,
            ruleset: ruleset.to_string(),
            map: map.to_string(),
            settings: settings.clone(),
            request,
            response,
            error,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let file_handle = self.file.clone();
        runtime.spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Internal async function that performs the actual file write
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: JournalEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write journal entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush journal: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize journal entry: {}", e);
                }
            }
        }
    }
}
