//! Authentication primitives: token claims, token pairs, and opaque refresh
//! tokens.
//!
//! Access tokens are signed JWTs issued through the [`TokenCodec`] port.
//! Refresh tokens are opaque 256-bit random values handed to the client as
//! hex; the server keeps only a SHA-256 digest, so a leaked token table does
//! not yield usable tokens.
//!
//! [`TokenCodec`]: crate::domain::ports::TokenCodec

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::user::{Role, User};

/// Hex length of a client-facing refresh token (32 random bytes).
pub const REFRESH_TOKEN_LEN: usize = 64;

/// Claims carried by an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessClaims {
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Catalogue role at issuance time.
    pub role: Role,
    /// Staff flag at issuance time.
    pub is_staff: bool,
}

impl AccessClaims {
    /// Snapshot the claims for a user.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            is_staff: user.is_staff,
        }
    }
}

/// Access and refresh tokens issued together at login and signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed access JWT.
    pub access: String,
    /// Opaque refresh token, hex encoded.
    pub refresh: String,
}

/// Server-side record of an issued refresh token.
///
/// Only the SHA-256 digest of the client token is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    /// Hex SHA-256 digest of the client token.
    pub token_hash: String,
    /// User the token was issued to.
    pub user_id: Uuid,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant; expired tokens are treated as revoked.
    pub expires_at: DateTime<Utc>,
    /// Set by logout.
    pub revoked: bool,
}

/// A freshly generated refresh token: the client-facing hex value plus the
/// digest to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    /// Value returned to the client.
    pub token: String,
    /// Digest stored server-side.
    pub token_hash: String,
}

/// Generate an opaque refresh token from the thread-local CSPRNG.
#[must_use]
pub fn generate_refresh_token() -> IssuedRefreshToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let token_hash = hash_refresh_token(&token);
    IssuedRefreshToken { token, token_hash }
}

/// Digest a client-supplied refresh token for lookup.
#[must_use]
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Check that a client-supplied refresh token has the issued shape.
///
/// Malformed tokens are rejected before any store lookup.
#[must_use]
pub fn is_well_formed_refresh_token(token: &str) -> bool {
    token.len() == REFRESH_TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}
