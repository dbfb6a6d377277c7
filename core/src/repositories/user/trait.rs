//! User directory trait defining the lookup interface the token layer depends on.
//!
//! TokenKeeper does not manage user accounts. The directory is an external
//! system; this trait is the only view of it the token lifecycle needs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read-only directory of user records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user by their unique identifier
    ///
    /// # Arguments
    /// * `user_id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User exists
    /// * `Ok(None)` - Unknown or deleted user
    /// * `Err(DomainError)` - The directory itself faulted
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use tk_core::repositories::UserDirectory;
    /// # async fn example(directory: &impl UserDirectory) -> Result<(), Box<dyn std::error::Error>> {
    /// let user_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000")?;
    ///
    /// if let Some(user) = directory.find_by_id(user_id).await? {
    ///     println!("Display name: {}", user.display_name());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, DomainError>;
}
