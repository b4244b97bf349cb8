//! Port abstraction for signing and verifying access tokens.

use crate::domain::auth::AccessClaims;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by token codec adapters.
    pub enum TokenCodecError {
        /// Signing failed; the claims could not be encoded.
        Issue { message: String } => "failed to issue access token: {message}",
        /// The token is malformed, tampered with, or expired.
        Invalid => "access token is invalid or expired",
    }
}

/// Codec for short-lived access tokens.
///
/// Synchronous on purpose: signing and verification are pure CPU work, and
/// the HTTP extractor verifies tokens outside any async context.
pub trait TokenCodec: Send + Sync {
    /// Sign an access token carrying the given claims.
    fn issue_access(&self, claims: &AccessClaims) -> Result<String, TokenCodecError>;

    /// Verify a presented token and recover its claims.
    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenCodecError>;
}
