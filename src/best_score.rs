//! Best-score persistence
//!
//! The simulation only reports a final score; whoever owns the store decides
//! where it lives. `JsonBestScore` keeps a small JSON document the host can
//! write to disk or local storage as-is.

use serde::{Deserialize, Serialize};

/// Read/write the best score across runs
pub trait BestScoreStore {
    fn get(&self) -> u64;
    fn set(&mut self, score: u64);
}

/// In-process store, forgotten on exit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryBestScore {
    best: u64,
}

impl MemoryBestScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }
}

impl BestScoreStore for MemoryBestScore {
    fn get(&self) -> u64 {
        self.best
    }

    fn set(&mut self, score: u64) {
        self.best = score;
    }
}

/// Persisted best-score record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    /// Highest score reported so far
    pub score: u64,
    /// Number of times a new best was recorded
    #[serde(default)]
    pub runs: u32,
}

/// Store backed by a serde_json document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonBestScore {
    record: BestScoreRecord,
}

impl JsonBestScore {
    /// Storage key hosts should file the document under
    pub const STORAGE_KEY: &'static str = "flap_rush_best_score";

    /// Load from a saved document, starting fresh if it can't be read
    pub fn load(document: &str) -> Self {
        match serde_json::from_str::<BestScoreRecord>(document) {
            Ok(record) => {
                log::info!("Loaded best score {}", record.score);
                Self { record }
            }
            Err(err) => {
                log::warn!("Unreadable best score ({}), starting fresh", err);
                Self::default()
            }
        }
    }

    /// Current document to hand back to the host
    pub fn document(&self) -> String {
        // A struct of two integers always serializes
        serde_json::to_string(&self.record).unwrap_or_default()
    }

    pub fn record(&self) -> BestScoreRecord {
        self.record
    }
}

impl BestScoreStore for JsonBestScore {
    fn get(&self) -> u64 {
        self.record.score
    }

    fn set(&mut self, score: u64) {
        self.record.score = score;
        self.record.runs += 1;
        log::info!("Best score saved ({})", score);
    }
}
