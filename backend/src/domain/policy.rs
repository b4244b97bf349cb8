//! Role-based access policy shared by every resource.
//!
//! One function from (subject, action) to allow/deny, so the permission
//! rules for books and users live in a single testable place instead of
//! being duplicated per view. Handlers call [`authorize`] before touching a
//! service; a denial never reaches the store.

use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::user::Role;

/// The authenticated principal derived from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    /// User id from the token claims.
    pub id: Uuid,
    /// Catalogue role from the token claims.
    pub role: Role,
    /// Staff flag from the token claims.
    pub is_staff: bool,
}

/// Actions guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read books or pages.
    ReadBooks,
    /// Create, update, or delete books or pages.
    MutateBooks,
    /// List all users.
    ListUsers,
    /// Read a single user's record.
    RetrieveUser {
        /// User being read.
        target: Uuid,
    },
    /// Update a single user's record.
    UpdateUser {
        /// User being updated.
        target: Uuid,
    },
    /// Delete a single user's record.
    DeleteUser,
}

/// Decide whether `subject` may perform `action`.
///
/// - Books: any authenticated subject may read; mutation requires the
///   editor role.
/// - Users: list and delete require staff; retrieve requires staff or self;
///   update is strictly self-only (staff may view but not edit others).
pub fn authorize(subject: &Subject, action: Action) -> Result<(), Error> {
    let allowed = match action {
        Action::ReadBooks => true,
        Action::MutateBooks => subject.role == Role::Editor,
        Action::ListUsers | Action::DeleteUser => subject.is_staff,
        Action::RetrieveUser { target } => subject.is_staff || subject.id == target,
        Action::UpdateUser { target } => subject.id == target,
    };
    if allowed {
        Ok(())
    } else {
        Err(Error::forbidden(
            "you do not have permission to perform this action",
        ))
    }
}
