//! Shared configuration types for TokenKeeper server
//!
//! This crate provides the configuration surface used across all server
//! modules:
//! - JWT signing and lifetime settings
//! - Database connection and pool settings

pub mod config;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, JwtConfig};
