//! Error types for tc-save.

use thiserror::Error;

use tc_world::WorldError;

/// Errors that can occur when saving or loading a game.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("corrupt save: {0}")]
    Corrupt(String),

    #[error("corrupt save: {0}")]
    World(#[from] WorldError),
}

/// Alias for `Result<T, SaveError>`.
pub type SaveResult<T> = Result<T, SaveError>;
