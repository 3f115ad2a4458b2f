//! Errors for the loading surfaces (config files, loot table files, watcher).
//!
//! Rolling and spawning never return errors; they log and degrade.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LootError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    RonSer(#[from] ron::Error),

    #[error("Invalid loot table '{table_id}': {reason}")]
    InvalidTable { table_id: String, reason: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),
}

pub type LootResult<T> = Result<T, LootError>;
