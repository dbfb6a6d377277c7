//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{ConfigError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
///
/// Refresh rejections are not errors; they surface as
/// `RefreshOutcome::Rejected`. An `Err` always means the operation could
/// not run, not that a token was turned away.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type DomainResult<T> = Result<T, DomainError>;
