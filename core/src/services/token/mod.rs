//! Token service module for the access/refresh pair lifecycle
//!
//! This module handles all token-related operations including:
//! - JWT access token generation and verification
//! - Opaque refresh token issuance and single-use rotation
//! - Reuse detection and revocation

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::{RefreshOutcome, TokenService};
