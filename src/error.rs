//! Error types
//!
//! Only configuration problems are errors. Gameplay outcomes (hazards, the end
//! marker, falling out of the world) are `RunResult` values.

use thiserror::Error;

/// A level specification that cannot be turned into a playable level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no level with id {0} in the level table")]
    UnknownLevel(u32),
    #[error("level id {0} appears more than once in the level table")]
    DuplicateLevel(u32),
    #[error("malformed level specification: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {id}: {what} span {start}..{end} is empty or reversed")]
    EmptySpan {
        id: u32,
        what: &'static str,
        start: i32,
        end: i32,
    },
    #[error("level {id}: checkpoints must be listed by increasing column")]
    UnorderedCheckpoints { id: u32 },
}

/// Failure to read or write the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
