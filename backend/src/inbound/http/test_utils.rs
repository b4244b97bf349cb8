//! Shared helpers for HTTP handler tests.

use chrono::Duration;

use crate::domain::auth::{AccessClaims, TokenPair};
use crate::domain::user::{User, UserDraft};
use crate::inbound::http::state::HttpState;

/// In-memory state with fast hashing and short-lived tokens.
pub fn test_state() -> HttpState {
    HttpState::in_memory(b"test-secret", Duration::minutes(15), Duration::days(14), 4)
}

/// Register an account with the given email and role.
pub async fn signup(state: &HttpState, email: &str, role: &str) -> (User, TokenPair) {
    let username = email.split('@').next().expect("local part");
    let draft =
        UserDraft::new(username, email, "correct horse", Some(role)).expect("valid draft");
    state.users.signup(draft).await.expect("signed up")
}

/// Forge an access token that marks the user as staff.
///
/// Signup never grants the staff flag, so staff-only endpoints are tested
/// with directly issued claims.
pub fn staff_token(state: &HttpState, user: &User) -> String {
    state
        .tokens
        .issue_access(&AccessClaims {
            user_id: user.id,
            role: user.role,
            is_staff: true,
        })
        .expect("issued")
}
