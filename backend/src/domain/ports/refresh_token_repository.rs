//! Port abstraction for the refresh token blacklist.
//!
//! Logout is the only cross-request shared state beyond the entity tables:
//! a revoked token must be rejected on every later use, so adapters check
//! the stored record before honouring a token again.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::auth::RefreshTokenRecord;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by refresh token adapters.
    pub enum RefreshTokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Result of a revocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The token was live and is now revoked.
    Revoked,
    /// The token was already revoked or has expired.
    AlreadyRevoked,
    /// No record matches the token.
    Unknown,
}

/// Persistence port for issued refresh tokens.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Record a freshly issued token.
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), RefreshTokenPersistenceError>;

    /// Revoke the token with the given digest.
    ///
    /// `now` decides whether a live record has already expired.
    async fn revoke(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<RevocationOutcome, RefreshTokenPersistenceError>;
}
