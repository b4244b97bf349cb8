//! JWT adapter for the access token codec port.
//!
//! Tokens are HS256-signed and carry the user id, catalogue role, and staff
//! flag alongside the standard `iat`/`exp` claims. Verification failures of
//! any kind surface as a single `Invalid` error so callers cannot probe why
//! a token was rejected.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::AccessClaims;
use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::user::Role;

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    role: String,
    staff: bool,
    iat: i64,
    exp: i64,
}

/// HS256 access token codec.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenCodec {
    /// Build a codec over a shared secret and an access token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue_access(&self, claims: &AccessClaims) -> Result<String, TokenCodecError> {
        let now = Utc::now();
        let wire = WireClaims {
            sub: claims.user_id,
            role: claims.role.as_str().to_owned(),
            staff: claims.is_staff,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &wire, &self.encoding)
            .map_err(|err| TokenCodecError::issue(err.to_string()))
    }

    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenCodecError> {
        let data = decode::<WireClaims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenCodecError::invalid())?;
        let role = Role::parse(&data.claims.role).map_err(|_| TokenCodecError::invalid())?;
        Ok(AccessClaims {
            user_id: data.claims.sub,
            role,
            is_staff: data.claims.staff,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Signing round trips and rejection of tampered or expired tokens.
    use super::*;

    fn claims() -> AccessClaims {
        AccessClaims {
            user_id: Uuid::new_v4(),
            role: Role::Editor,
            is_staff: true,
        }
    }

    #[test]
    fn issued_tokens_verify_to_the_same_claims() {
        let codec = JwtTokenCodec::new(b"test-secret", Duration::minutes(15));
        let token = codec.issue_access(&claims()).expect("issued");
        let recovered = codec.verify_access(&token).expect("verified");
        assert_eq!(recovered.role, Role::Editor);
        assert!(recovered.is_staff);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_invalid() {
        let codec = JwtTokenCodec::new(b"test-secret", Duration::minutes(15));
        let other = JwtTokenCodec::new(b"other-secret", Duration::minutes(15));
        let token = other.issue_access(&claims()).expect("issued");
        assert!(matches!(
            codec.verify_access(&token).expect_err("rejected"),
            TokenCodecError::Invalid,
        ));
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        let codec = JwtTokenCodec::new(b"test-secret", Duration::minutes(15));
        assert!(matches!(
            codec.verify_access("not-a-jwt").expect_err("rejected"),
            TokenCodecError::Invalid,
        ));
    }
}
