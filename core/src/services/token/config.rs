//! Configuration for the token service

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use jsonwebtoken::Algorithm;

use tk_shared::config::JwtConfig;

use crate::errors::ConfigError;

/// Configuration for the token service
///
/// Captured once at construction; the running service never re-reads it.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Whether `jwt_secret` holds base64-encoded raw key bytes
    pub secret_is_base64: bool,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Issuer claim written to and required of every access token
    pub issuer: String,
    /// Audience claim written to and required of every access token
    pub audience: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
    /// Verification leeway for clock drift, in seconds
    pub clock_skew_seconds: u64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            secret_is_base64: false,
            algorithm: Algorithm::HS256,
            issuer: "token-keeper".to_string(),
            audience: "token-keeper-api".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            clock_skew_seconds: 30,
        }
    }
}

impl TokenServiceConfig {
    /// Validates the configuration
    ///
    /// A missing or undecodable secret and non-positive lifetimes are
    /// construction-time failures; the service never starts with them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.secret_is_base64 {
            BASE64
                .decode(&self.jwt_secret)
                .map_err(|e| ConfigError::InvalidJwtSecret {
                    reason: e.to_string(),
                })?;
        }
        if self.access_token_expiry_minutes <= 0 {
            return Err(ConfigError::InvalidLifetime {
                field: "access_token_expiry_minutes".to_string(),
            });
        }
        if self.refresh_token_expiry_days <= 0 {
            return Err(ConfigError::InvalidLifetime {
                field: "refresh_token_expiry_days".to_string(),
            });
        }
        Ok(())
    }

    /// Raw signing key bytes
    ///
    /// Decodes base64 key material when the config flags it; otherwise the
    /// secret's UTF-8 bytes are the key.
    pub fn secret_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.secret_is_base64 {
            BASE64
                .decode(&self.jwt_secret)
                .map_err(|e| ConfigError::InvalidJwtSecret {
                    reason: e.to_string(),
                })
        } else {
            Ok(self.jwt_secret.as_bytes().to_vec())
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            secret_is_base64: config.secret_is_base64,
            algorithm: config.algorithm.parse().unwrap_or(Algorithm::HS256),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_expiry_minutes: config.access_token_minutes,
            refresh_token_expiry_days: config.refresh_token_days,
            clock_skew_seconds: 30,
        }
    }
}
