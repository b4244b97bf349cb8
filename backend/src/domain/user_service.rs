//! Business rules for user accounts and authentication.
//!
//! Covers the full account lifecycle: signup with email uniqueness, login
//! issuing an access/refresh token pair, logout revoking the refresh token,
//! and the staff-facing CRUD operations. Password hashing and token signing
//! go through ports so tests can run without external services.

use std::sync::Arc;

use chrono::{Duration, Utc};
use pagination::PageRequest;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::auth::{
    TokenPair, RefreshTokenRecord, generate_refresh_token, hash_refresh_token,
    is_well_formed_refresh_token, AccessClaims,
};
use crate::domain::error::Error;
use crate::domain::ports::{
    PasswordHashError, PasswordHasher, RefreshTokenPersistenceError, RefreshTokenRepository,
    RevocationOutcome, TokenCodec, TokenCodecError, UserPersistenceError, UserRepository,
};
use crate::domain::user::{Email, Password, User, UserDraft, UserPatch};

/// Orchestrates account management and authentication.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    refresh_ttl: Duration,
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user repository unavailable");
            Error::service_unavailable("account storage is unavailable")
        }
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::EmailTaken => {
            Error::conflict("a user with this email already exists")
        }
    }
}

fn map_token_store_error(error: RefreshTokenPersistenceError) -> Error {
    match error {
        RefreshTokenPersistenceError::Connection { message } => {
            warn!(%message, "refresh token repository unavailable");
            Error::service_unavailable("account storage is unavailable")
        }
        RefreshTokenPersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    let PasswordHashError::Hash { message } = error;
    Error::internal(message)
}

fn map_issue_error(error: TokenCodecError) -> Error {
    Error::internal(error.to_string())
}

impl UserService {
    /// Create a service over the given ports.
    ///
    /// `refresh_ttl` bounds how long an issued refresh token stays
    /// redeemable.
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            hasher,
            tokens,
            refresh_ttl,
        }
    }

    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, Error> {
        let access = self
            .tokens
            .issue_access(&AccessClaims::for_user(user))
            .map_err(map_issue_error)?;
        let issued = generate_refresh_token();
        let now = Utc::now();
        let record = RefreshTokenRecord {
            token_hash: issued.token_hash,
            user_id: user.id,
            issued_at: now,
            expires_at: now + self.refresh_ttl,
            revoked: false,
        };
        self.refresh_tokens
            .insert(&record)
            .await
            .map_err(map_token_store_error)?;
        Ok(TokenPair {
            access,
            refresh: issued.token,
        })
    }

    /// Validate credentials and issue a token pair.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// `invalid_request`; the distinct messages mirror the original
    /// service contract.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, Error> {
        let email = Email::new(email).map_err(|err| Error::invalid_request(err.to_string()))?;
        let password =
            Password::new(password).map_err(|err| Error::invalid_request(err.to_string()))?;

        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::invalid_request("user not found"))?;

        let matches = self
            .hasher
            .verify(&password, &user.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::invalid_request("invalid credentials"));
        }

        info!(user_id = %user.id, "user authenticated");
        self.issue_token_pair(&user).await
    }

    /// Register a new account and issue its first token pair.
    pub async fn signup(&self, draft: UserDraft) -> Result<(User, TokenPair), Error> {
        let existing = self
            .users
            .find_by_email(&draft.email)
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            return Err(Error::conflict("a user with this email already exists"));
        }

        let password_hash = self.hasher.hash(&draft.password).map_err(map_hash_error)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: draft.username,
            email: draft.email,
            password_hash,
            role: draft.role,
            is_staff: false,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, role = %user.role, "user registered");

        let pair = self.issue_token_pair(&user).await?;
        Ok((user, pair))
    }

    /// Revoke a refresh token.
    ///
    /// Malformed, unknown, expired, and already-revoked tokens all fail
    /// the same way so the endpoint does not leak token state.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), Error> {
        if !is_well_formed_refresh_token(refresh_token) {
            return Err(Error::invalid_request("refresh token is invalid"));
        }
        let outcome = self
            .refresh_tokens
            .revoke(&hash_refresh_token(refresh_token), Utc::now())
            .await
            .map_err(map_token_store_error)?;
        match outcome {
            RevocationOutcome::Revoked => Ok(()),
            RevocationOutcome::AlreadyRevoked | RevocationOutcome::Unknown => {
                Err(Error::invalid_request("refresh token is invalid"))
            }
        }
    }

    /// One page of users plus the total count.
    pub async fn list(&self, request: PageRequest) -> Result<(u64, Vec<User>), Error> {
        self.users
            .list_page(request.offset(), request.limit())
            .await
            .map_err(map_user_error)
    }

    /// Fetch a user or fail with `not_found`.
    pub async fn get(&self, id: Uuid) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Merge a partial update into an existing user.
    ///
    /// A changed email re-checks uniqueness; a changed password is
    /// re-hashed.
    pub async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, Error> {
        let mut user = self.get(id).await?;

        if let Some(email) = patch.email {
            if email != user.email {
                let holder = self
                    .users
                    .find_by_email(&email)
                    .await
                    .map_err(map_user_error)?;
                if holder.is_some_and(|other| other.id != id) {
                    return Err(Error::conflict("a user with this email already exists"));
                }
                user.email = email;
            }
        }
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(password) = patch.password {
            user.password_hash = self.hasher.hash(&password).map_err(map_hash_error)?;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        let updated = self.users.update(&user).await.map_err(map_user_error)?;
        if !updated {
            return Err(Error::not_found("user not found"));
        }
        Ok(user)
    }

    /// Delete a user.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let deleted = self.users.delete(id).await.map_err(map_user_error)?;
        if !deleted {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Account lifecycle coverage over in-memory adapters.
    use pagination::{PageLimits, PageParams};

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::user::Role;
    use crate::outbound::jwt::JwtTokenCodec;
    use crate::outbound::memory::{InMemoryRefreshTokens, InMemoryUsers};
    use crate::outbound::password::BcryptPasswordHasher;

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(InMemoryRefreshTokens::default()),
            Arc::new(BcryptPasswordHasher::with_cost(4)),
            Arc::new(JwtTokenCodec::new(b"test-secret", Duration::minutes(15))),
            Duration::days(14),
        )
    }

    fn draft(email: &str, role: Option<&str>) -> UserDraft {
        UserDraft::new("ada", email, "correct horse", role).expect("valid draft")
    }

    fn page_request() -> PageRequest {
        PageRequest::from_params(PageParams::default(), PageLimits::new(10))
            .expect("valid request")
    }

    #[tokio::test]
    async fn signup_issues_tokens_and_defaults_to_reader() {
        let service = service();
        let (user, pair) = service
            .signup(draft("ada@example.com", None))
            .await
            .expect("signed up");
        assert_eq!(user.role, Role::Reader);
        assert!(!user.is_staff);
        assert!(!pair.access.is_empty());
        assert_eq!(pair.refresh.len(), crate::domain::auth::REFRESH_TOKEN_LEN);
    }

    #[tokio::test]
    async fn signup_rejects_registered_emails() {
        let service = service();
        service
            .signup(draft("ada@example.com", Some("editor")))
            .await
            .expect("first signup");
        let error = service
            .signup(draft("ada@example.com", None))
            .await
            .expect_err("duplicate email");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn authenticate_distinguishes_unknown_user_from_bad_password() {
        let service = service();
        service
            .signup(draft("ada@example.com", None))
            .await
            .expect("signed up");

        let unknown = service
            .authenticate("nobody@example.com", "whatever")
            .await
            .expect_err("unknown email");
        assert_eq!(unknown.code(), ErrorCode::InvalidRequest);
        assert_eq!(unknown.message(), "user not found");

        let wrong = service
            .authenticate("ada@example.com", "wrong password")
            .await
            .expect_err("wrong password");
        assert_eq!(wrong.code(), ErrorCode::InvalidRequest);
        assert_eq!(wrong.message(), "invalid credentials");

        let pair = service
            .authenticate("ada@example.com", "correct horse")
            .await
            .expect("valid login");
        assert!(!pair.access.is_empty());
    }

    #[tokio::test]
    async fn logout_revokes_the_refresh_token_once() {
        let service = service();
        let (_, pair) = service
            .signup(draft("ada@example.com", None))
            .await
            .expect("signed up");

        service.logout(&pair.refresh).await.expect("revoked");
        let error = service.logout(&pair.refresh).await.expect_err("reused");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn logout_rejects_malformed_tokens_without_a_lookup() {
        let service = service();
        let error = service.logout("not-a-token").await.expect_err("malformed");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_rehashes_password_and_guards_email_uniqueness() {
        let service = service();
        let (user, _) = service
            .signup(draft("ada@example.com", None))
            .await
            .expect("signed up");
        service
            .signup(draft("grace@example.com", None))
            .await
            .expect("second signup");

        let patch = UserPatch::new(None, None, Some("new password"), Some("editor"))
            .expect("valid patch");
        let updated = service.update(user.id, patch).await.expect("updated");
        assert_eq!(updated.role, Role::Editor);
        service
            .authenticate("ada@example.com", "new password")
            .await
            .expect("new password works");

        let clash = UserPatch::new(None, Some("grace@example.com"), None, None)
            .expect("valid patch");
        let error = service.update(user.id, clash).await.expect_err("email taken");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn list_and_delete_round_trip() {
        let service = service();
        let (user, _) = service
            .signup(draft("ada@example.com", None))
            .await
            .expect("signed up");

        let (count, users) = service.list(page_request()).await.expect("listed");
        assert_eq!(count, 1);
        assert_eq!(users[0].id, user.id);

        service.delete(user.id).await.expect("deleted");
        let error = service.delete(user.id).await.expect_err("already gone");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
