//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Display name of the subject
    pub name: String,

    /// Roles granted to the subject
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user` - The user the token is issued to
    /// * `issuer` - Issuer claim value
    /// * `audience` - Audience claim value
    /// * `valid_for` - Access token lifetime
    ///
    /// # Returns
    ///
    /// A new `Claims` instance with a freshly generated `jti`
    pub fn for_user(user: &User, issuer: &str, audience: &str, valid_for: Duration) -> Self {
        let now = Utc::now();
        let expiry = now + valid_for;

        Self {
            sub: user.id.to_string(),
            name: user.display_name().to_string(),
            roles: user.roles.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    ///
    /// # Returns
    ///
    /// `true` if the claims have expired, `false` otherwise
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.exp
    }

    /// Checks if the claims are valid
    ///
    /// # Returns
    ///
    /// `true` if the claims are valid (not expired and after nbf), `false` otherwise
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Lifecycle state of a stored refresh token
///
/// Transitions are one-directional: flags are set once and never cleared,
/// and rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Redeemable
    Active,
    /// Consumed by a successful refresh
    Used,
    /// Revoked explicitly or by cascade
    Revoked,
    /// Past its expiry instant
    Expired,
}

/// Refresh token entity stored in the database
///
/// The opaque secret handed to the client is never stored; `token_hash`
/// holds its SHA-256 digest and is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Hashed token value for security
    pub token_hash: String,

    /// `jti` of the access token issued in the same pair
    pub jwt_id: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been consumed by a refresh
    pub is_used: bool,

    /// Whether the token has been revoked
    pub is_revoked: bool,
}

impl RefreshToken {
    /// Creates a new refresh token record
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `token_hash` - The hashed token value
    /// * `jwt_id` - `jti` of the paired access token
    /// * `valid_for` - Refresh token lifetime
    ///
    /// # Returns
    ///
    /// A new `RefreshToken` instance with both lifecycle flags clear
    pub fn new(user_id: Uuid, token_hash: String, jwt_id: String, valid_for: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            jwt_id,
            created_at: now,
            expires_at: now + valid_for,
            is_used: false,
            is_revoked: false,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the refresh token can still be redeemed
    ///
    /// A token is active if it has not been used, revoked, or expired
    pub fn is_active(&self) -> bool {
        !self.is_used && !self.is_revoked && !self.is_expired()
    }

    /// Reports the lifecycle state
    ///
    /// When several conditions apply, `Used` wins over `Revoked`,
    /// which wins over `Expired`.
    pub fn state(&self) -> TokenState {
        if self.is_used {
            TokenState::Used
        } else if self.is_revoked {
            TokenState::Revoked
        } else if self.is_expired() {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    /// Marks the token as consumed by a refresh
    pub fn mark_used(&mut self) {
        self.is_used = true;
    }

    /// Revokes the refresh token
    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }
}

/// Token pair returned to the client
///
/// `refresh_token` is the plaintext opaque secret; this is the only place
/// it ever exists outside the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}
