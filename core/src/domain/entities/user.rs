//! User record as resolved by the external user directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record the directory yields for token issuance
///
/// TokenKeeper does not own user accounts; this is the read-only shape
/// the directory resolves a user ID into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login name, if the account has one
    pub username: Option<String>,

    /// Email address, if the account has one
    pub email: Option<String>,

    /// Roles granted to the user
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Creates a new User record
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            email: None,
            roles: Vec::new(),
        }
    }

    /// Sets the login name
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the granted roles
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Display name for the `name` claim
    ///
    /// Falls back from username to email to the empty string.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("")
    }
}
