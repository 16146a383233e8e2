//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! configuration check bubbles up through them.

use thiserror::Error;

/// Errors produced by `tc-core`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tc-core`.
pub type CoreResult<T> = Result<T, CoreError>;
