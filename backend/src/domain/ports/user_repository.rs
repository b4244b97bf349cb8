//! Port abstraction for user persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{Email, User};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The email is already registered to another user.
        EmailTaken => "a user with this email already exists",
    }
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Persist changed user fields. Returns `false` when the user is gone.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Delete a user. Returns `false` when the user is gone.
    async fn delete(&self, id: Uuid) -> Result<bool, UserPersistenceError>;

    /// Fetch one page of users ordered by creation time, plus the total
    /// count.
    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<User>), UserPersistenceError>;
}
