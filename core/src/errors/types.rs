//! Error type definitions for token signing, verification, and configuration
//!
//! The actual error messages shown to end users are shaped by callers;
//! these variants carry what the domain layer knows.

use thiserror::Error;

/// Token-related errors
///
/// These errors represent access token verification and generation
/// failures. Refresh-path rejections never use them; they are reserved
/// for the stateless verification surface and for signing faults.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Configuration errors
///
/// Raised during token service construction; a misconfigured service
/// never starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JWT signing secret is not configured")]
    MissingJwtSecret,

    #[error("JWT signing secret is invalid: {reason}")]
    InvalidJwtSecret { reason: String },

    #[error("Token lifetime must be positive: {field}")]
    InvalidLifetime { field: String },
}
