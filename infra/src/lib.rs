//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for TokenKeeper. It holds
//! the concrete, MySQL-backed implementation of the refresh token store the
//! core defines a trait for, plus the connection pool it runs on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: connection pool management and the SQLx implementation
//!   of `tk_core::repositories::TokenRepository`

// Re-export core error types for convenience
pub use tk_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlTokenRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
