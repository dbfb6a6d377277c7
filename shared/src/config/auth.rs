//! JWT signing and token lifetime configuration

use serde::{Deserialize, Serialize};

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub secret: String,

    /// Whether `secret` holds base64-encoded raw key bytes
    #[serde(default)]
    pub secret_is_base64: bool,

    /// Access token lifetime in minutes
    pub access_token_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_days: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from("development-secret-please-change-in-production"),
            secret_is_base64: false,
            access_token_minutes: 15,
            refresh_token_days: 7,
            issuer: String::from("token-keeper"),
            audience: String::from("token-keeper-api"),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// `JWT_SECRET` has no development fallback: when the variable is absent
    /// the secret is left empty and token service construction fails.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        let secret_is_base64 = std::env::var("JWT_SECRET_BASE64")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let access_token_minutes = std::env::var("JWT_ACCESS_TOKEN_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);
        let refresh_token_days = std::env::var("JWT_REFRESH_TOKEN_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);
        let issuer =
            std::env::var("JWT_ISSUER").unwrap_or_else(|_| "token-keeper".to_string());
        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "token-keeper-api".to_string());

        Self {
            secret,
            secret_is_base64,
            access_token_minutes,
            refresh_token_days,
            issuer,
            audience,
            algorithm: default_algorithm(),
        }
    }

    /// Set access token lifetime in minutes
    pub fn with_access_minutes(mut self, minutes: i64) -> Self {
        self.access_token_minutes = minutes;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_days(mut self, days: i64) -> Self {
        self.refresh_token_days = days;
        self
    }

    /// Mark the secret as base64-encoded key material
    pub fn with_base64_secret(mut self, is_base64: bool) -> Self {
        self.secret_is_base64 = is_base64;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "development-secret-please-change-in-production"
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}
