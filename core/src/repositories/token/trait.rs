//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken entity persistence operations
///
/// This trait defines the contract for managing refresh tokens in the database.
/// Records are append-then-flag: rows are inserted once, flipped to used or
/// revoked in place, and never deleted.
///
/// # Security Considerations
/// - Only token hashes are stored; the plaintext secret never reaches the repository
/// - `claim_refresh_token` must be atomic so a token can be consumed at most once
/// - Revoked tokens must be immediately invalidated
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token to the repository
    ///
    /// # Arguments
    /// * `token` - The RefreshToken entity to persist
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token
    /// * `Err(DomainError)` - Save failed; a duplicate `token_hash` is a
    ///   storage fault, never a silent overwrite
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use chrono::Duration;
    /// # use tk_core::repositories::TokenRepository;
    /// # use tk_core::domain::entities::token::RefreshToken;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let user_id = Uuid::new_v4();
    /// let token = RefreshToken::new(
    ///     user_id,
    ///     "hashed_token_value".to_string(),
    ///     "access-token-jti".to_string(),
    ///     Duration::days(7),
    /// );
    ///
    /// let saved = repo.save_refresh_token(token).await?;
    /// println!("Token saved with ID: {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hashed value
    ///
    /// # Arguments
    /// * `token_hash` - The hashed token value to search for
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No token found with given hash
    /// * `Err(DomainError)` - Database error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use tk_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token_hash = "sha256_hash_of_token";
    ///
    /// match repo.find_refresh_token(token_hash).await? {
    ///     Some(token) => {
    ///         if token.is_active() {
    ///             println!("Token is redeemable for user: {}", token.user_id);
    ///         }
    ///     }
    ///     None => println!("Token not found"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all active refresh tokens for a user
    ///
    /// # Arguments
    /// * `user_id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Vec<RefreshToken>)` - Tokens with both lifecycle flags clear and
    ///   an expiry in the future
    /// * `Err(DomainError)` - Database error occurred
    async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Atomically claim a refresh token for consumption
    ///
    /// Flips `is_used` from false to true if and only if the token is
    /// currently unused and unrevoked. When several callers race on the same
    /// token, exactly one of them observes `true`; storage is the
    /// synchronization point.
    ///
    /// # Arguments
    /// * `token_hash` - The hashed token value to claim
    ///
    /// # Returns
    /// * `Ok(true)` - This caller consumed the token
    /// * `Ok(false)` - Token absent, already used, or revoked
    /// * `Err(DomainError)` - Database error occurred
    ///
    /// # Example
    /// ```no_run
    /// # use tk_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token_hash = "sha256_hash_of_token";
    ///
    /// if repo.claim_refresh_token(token_hash).await? {
    ///     println!("Token claimed; safe to issue a replacement pair");
    /// } else {
    ///     println!("Token was already consumed or revoked");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn claim_refresh_token(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke a specific refresh token
    ///
    /// # Arguments
    /// * `token_hash` - The hashed token value to revoke
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked
    /// * `Ok(false)` - Token not found or already revoked
    /// * `Err(DomainError)` - Revocation failed
    async fn revoke_token(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke all refresh tokens for a user
    ///
    /// # Arguments
    /// * `user_id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    /// * `Err(DomainError)` - Revocation failed
    ///
    /// # Example
    /// ```no_run
    /// # use uuid::Uuid;
    /// # use tk_core::repositories::TokenRepository;
    /// # async fn example(repo: &impl TokenRepository, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    /// let revoked_count = repo.revoke_all_user_tokens(user_id).await?;
    /// println!("Revoked {} tokens for user", revoked_count);
    /// # Ok(())
    /// # }
    /// ```
    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Check if a token exists and is redeemable
    ///
    /// # Arguments
    /// * `token_hash` - The hashed token value to check
    ///
    /// # Returns
    /// * `Ok(true)` - Token exists and is active
    /// * `Ok(false)` - Token doesn't exist or is used, revoked, or expired
    /// * `Err(DomainError)` - Database error occurred
    async fn is_token_active(&self, token_hash: &str) -> Result<bool, DomainError> {
        match self.find_refresh_token(token_hash).await? {
            Some(token) => Ok(token.is_active()),
            None => Ok(false),
        }
    }

    /// Count active tokens for a user
    ///
    /// # Arguments
    /// * `user_id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of active tokens
    /// * `Err(DomainError)` - Database error occurred
    async fn count_active_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let tokens = self.find_active_by_user(user_id).await?;
        Ok(tokens.len())
    }
}
