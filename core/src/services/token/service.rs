//! Main token service implementation

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{TokenRepository, UserDirectory};

use super::config::TokenServiceConfig;

/// Number of random bytes behind an opaque refresh token secret
const REFRESH_SECRET_BYTES: usize = 64;

/// Outcome of a refresh attempt
///
/// A rejection is an expected result, not an error, and every rejection
/// cause looks the same to the caller. `Err` on the refresh path always
/// means infrastructure trouble, never a turned-away token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Rotation succeeded; the presented refresh token is consumed
    Granted(TokenPair),
    /// The presented credentials were turned away
    Rejected,
}

impl RefreshOutcome {
    /// Whether the refresh was rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, RefreshOutcome::Rejected)
    }
}

/// Service managing the access/refresh token pair lifecycle
///
/// Issues linked pairs, rotates refresh tokens on every redemption, and
/// revokes them on demand. The service keeps no mutable state; the token
/// repository is the single source of truth, and its atomic claim
/// operation is what serializes concurrent refreshes.
pub struct TokenService<R: TokenRepository, D: UserDirectory> {
    pub(crate) repository: R,
    directory: D,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    refresh_validation: Validation,
}

impl<R: TokenRepository, D: UserDirectory> TokenService<R, D> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `directory` - User directory for resolving token subjects
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a config error when the signing secret is
    /// missing or invalid
    pub fn new(repository: R, directory: D, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let secret = config.secret_bytes()?;

        let encoding_key = EncodingKey::from_secret(&secret);
        let decoding_key = DecodingKey::from_secret(&secret);

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.clock_skew_seconds;

        // Refresh path: signature, issuer and audience still hold, but an
        // expired access token is the normal case there
        let mut refresh_validation = validation.clone();
        refresh_validation.validate_exp = false;
        refresh_validation.validate_nbf = false;

        Ok(Self {
            repository,
            directory,
            config,
            encoding_key,
            decoding_key,
            validation,
            refresh_validation,
        })
    }

    /// Issues a new linked token pair for a user
    ///
    /// The access token carries a fresh `jti`; the stored refresh record
    /// links back to it and only ever redeems together with it.
    ///
    /// # Arguments
    ///
    /// * `user` - The resolved user to issue for
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated pair
    /// * `Err(DomainError)` - Signing or storage failed; nothing usable was issued
    pub async fn issue_tokens(&self, user: &User) -> Result<TokenPair, DomainError> {
        let (pair, record) = self.mint(user).await?;

        tracing::debug!(
            user_id = %user.id,
            token_id = %record.id,
            event = "token_pair_issued",
            "Issued new token pair"
        );

        Ok(pair)
    }

    /// Redeems a refresh token for a new pair, rotating it
    ///
    /// The presented refresh token is single-use: on success it is consumed
    /// before the replacement pair exists, and every other active token of
    /// the user is revoked afterwards. All rejection causes surface as the
    /// same `RefreshOutcome::Rejected`.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The opaque refresh secret presented by the client
    /// * `access_token` - The access token issued alongside it; may be expired
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshOutcome::Granted)` - Rotation succeeded
    /// * `Ok(RefreshOutcome::Rejected)` - The presentation was turned away
    /// * `Err(DomainError)` - Storage or signing fault; when this happens
    ///   after the claim step the old token stays consumed and the caller
    ///   must re-authenticate
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
        access_token: &str,
    ) -> Result<RefreshOutcome, DomainError> {
        let token_hash = self.hash_token(refresh_token);

        // Step 1: The stored record gates everything. Nothing is mutated
        // until the claim further down
        let record = match self.repository.find_refresh_token(&token_hash).await? {
            Some(record) => record,
            None => {
                tracing::debug!(
                    event = "refresh_rejected",
                    reason = "unknown_token",
                    "Refresh rejected"
                );
                return Ok(RefreshOutcome::Rejected);
            }
        };

        if record.is_used || record.is_revoked {
            tracing::warn!(
                user_id = %record.user_id,
                token_id = %record.id,
                event = "refresh_token_reuse",
                "Consumed or revoked refresh token presented again"
            );
            return Ok(RefreshOutcome::Rejected);
        }

        if record.is_expired() {
            tracing::debug!(
                user_id = %record.user_id,
                event = "refresh_rejected",
                reason = "token_expired",
                "Refresh rejected"
            );
            return Ok(RefreshOutcome::Rejected);
        }

        // Step 2: The access token must be one of ours: signature, issuer
        // and audience are enforced, lifetime is not
        let claims = match self.decode_for_refresh(access_token) {
            Some(claims) => claims,
            None => {
                tracing::debug!(
                    user_id = %record.user_id,
                    event = "refresh_rejected",
                    reason = "access_token_invalid",
                    "Refresh rejected"
                );
                return Ok(RefreshOutcome::Rejected);
            }
        };

        // Step 3: Strict pairing; a refresh token only rides with the
        // access token minted alongside it
        if claims.jti.trim().is_empty() || claims.jti != record.jwt_id {
            tracing::debug!(
                user_id = %record.user_id,
                event = "refresh_rejected",
                reason = "jti_mismatch",
                "Refresh rejected"
            );
            return Ok(RefreshOutcome::Rejected);
        }

        // Step 4: The subject must agree with the record; the record is
        // authoritative for who gets the new pair
        match claims.user_id() {
            Ok(subject) if subject == record.user_id => {}
            _ => {
                tracing::debug!(
                    user_id = %record.user_id,
                    event = "refresh_rejected",
                    reason = "subject_mismatch",
                    "Refresh rejected"
                );
                return Ok(RefreshOutcome::Rejected);
            }
        }

        // Step 5: A vanished account rejects; a directory fault propagates
        let user = match self.directory.find_by_id(record.user_id).await? {
            Some(user) => user,
            None => {
                tracing::debug!(
                    user_id = %record.user_id,
                    event = "refresh_rejected",
                    reason = "unknown_user",
                    "Refresh rejected"
                );
                return Ok(RefreshOutcome::Rejected);
            }
        };

        // Step 6: Commit point. Exactly one concurrent caller wins this
        // claim; from here on the presented token is dead for good
        if !self.repository.claim_refresh_token(&token_hash).await? {
            tracing::debug!(
                user_id = %record.user_id,
                event = "refresh_rejected",
                reason = "lost_claim_race",
                "Refresh rejected"
            );
            return Ok(RefreshOutcome::Rejected);
        }

        // Step 7: Mint the replacement pair. A failure here is fatal to the
        // caller: the claim is not rolled back and minting is not retried
        let (pair, new_record) = self.mint(&user).await?;

        // Step 8: Revoke the user's remaining active tokens so only the
        // pair just issued survives the rotation
        let siblings = self.repository.find_active_by_user(record.user_id).await?;
        let mut revoked = 0usize;
        for sibling in siblings {
            if sibling.id == new_record.id {
                continue;
            }
            if self.repository.revoke_token(&sibling.token_hash).await? {
                revoked += 1;
            }
        }

        tracing::info!(
            user_id = %record.user_id,
            old_token_id = %record.id,
            new_token_id = %new_record.id,
            revoked_siblings = revoked,
            event = "refresh_token_rotated",
            "Rotated refresh token"
        );

        Ok(RefreshOutcome::Granted(pair))
    }

    /// Revokes a single refresh token
    ///
    /// Idempotent: revoking an unknown or already dead token succeeds
    /// silently. Deliberately does not cascade; one device logging out
    /// must not log out the user's other devices.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The opaque refresh secret to revoke
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The token is revoked or was never redeemable
    /// * `Err(DomainError)` - Storage fault
    pub async fn revoke_token(&self, refresh_token: &str) -> Result<(), DomainError> {
        let token_hash = self.hash_token(refresh_token);
        let revoked = self.repository.revoke_token(&token_hash).await?;

        if revoked {
            tracing::debug!(event = "refresh_token_revoked", "Revoked refresh token");
        } else {
            tracing::debug!(
                event = "refresh_token_revoke_noop",
                "Revoke requested for unknown or already dead token"
            );
        }

        Ok(())
    }

    /// Revokes every refresh token of a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens revoked
    /// * `Err(DomainError)` - Storage fault
    pub async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let revoked = self.repository.revoke_all_user_tokens(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            revoked = revoked,
            event = "all_user_tokens_revoked",
            "Revoked every refresh token of user"
        );

        Ok(revoked)
    }

    /// Verifies an access token and returns the claims
    ///
    /// The guard-facing path: fully stateless, enforcing signature,
    /// lifetime, issuer and audience with the configured clock leeway.
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT access token to verify
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError::Token)` - Token is invalid, expired, or malformed
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                    ErrorKind::ImmatureSignature => {
                        DomainError::Token(TokenError::TokenNotYetValid)
                    }
                    ErrorKind::InvalidSignature => {
                        DomainError::Token(TokenError::InvalidSignature)
                    }
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        DomainError::Token(TokenError::InvalidClaims)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Mints a linked pair: signed access token plus stored refresh record
    async fn mint(&self, user: &User) -> Result<(TokenPair, RefreshToken), DomainError> {
        let claims = Claims::for_user(
            user,
            &self.config.issuer,
            &self.config.audience,
            Duration::minutes(self.config.access_token_expiry_minutes),
        );
        let access_token = self.encode_jwt(&claims)?;

        let refresh_secret = self.generate_refresh_secret();
        let record = RefreshToken::new(
            user.id,
            self.hash_token(&refresh_secret),
            claims.jti.clone(),
            Duration::days(self.config.refresh_token_expiry_days),
        );
        let record = self.repository.save_refresh_token(record).await?;

        Ok((TokenPair::new(access_token, refresh_secret), record))
    }

    /// Decodes an access token for the refresh path, lifetime checks off
    fn decode_for_refresh(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.refresh_validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Generates an opaque refresh secret: 64 random bytes, base64
    fn generate_refresh_secret(&self) -> String {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        BASE64.encode(bytes)
    }

    /// Hashes a token for secure storage
    pub(crate) fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
