//! User account data model.
//!
//! A user carries two independent authorisation attributes: the catalogue
//! `role` (editor or reader) and the platform-level `is_staff` flag used for
//! user management. The password is stored hashed and never serialised out;
//! plaintext passwords only exist inside [`Password`], which zeroises its
//! buffer on drop.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors raised by user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The username is empty after trimming.
    EmptyUsername,
    /// The email is empty after trimming.
    EmptyEmail,
    /// The email does not look like `local@domain`.
    InvalidEmail,
    /// The password is empty.
    EmptyPassword,
    /// The role string is neither `editor` nor `reader`.
    InvalidRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidRole => write!(f, "role must be either editor or reader"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Catalogue role controlling write access to books and pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create, update, and delete books and pages.
    Editor,
    /// Read-only access to the catalogue.
    #[default]
    Reader,
}

impl Role {
    /// Stable lowercase name used in storage and tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Reader => "reader",
        }
    }

    /// Parse the stable lowercase name.
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        match value {
            "editor" => Ok(Self::Editor),
            "reader" => Ok(Self::Reader),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty display/login name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username, trimming surrounding whitespace.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Login identity; unique across users.
///
/// Stored lowercased so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Plaintext password accepted at signup, login, and self-update.
///
/// The buffer is zeroised on drop and the `Debug` output is redacted so the
/// plaintext never reaches logs.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a password.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Expose the plaintext for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// A registered user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable identifier.
    pub id: Uuid,
    /// Display/login name.
    pub username: Username,
    /// Unique login identity.
    pub email: Email,
    /// Password hash; never serialised out.
    pub password_hash: String,
    /// Catalogue role.
    pub role: Role,
    /// Platform-level user-management flag, orthogonal to `role`.
    pub is_staff: bool,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Validated signup input.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Display/login name.
    pub username: Username,
    /// Unique login identity.
    pub email: Email,
    /// Plaintext password, hashed before persistence.
    pub password: Password,
    /// Catalogue role; signup defaults to reader.
    pub role: Role,
}

impl UserDraft {
    /// Validate raw signup input; an absent role defaults to reader.
    pub fn new(
        username: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: Email::new(email)?,
            password: Password::new(password)?,
            role: role.map(Role::parse).transpose()?.unwrap_or_default(),
        })
    }
}

/// Partial self-update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// Replacement username, when provided.
    pub username: Option<Username>,
    /// Replacement email, when provided.
    pub email: Option<Email>,
    /// Replacement password, re-hashed when provided.
    pub password: Option<Password>,
    /// Replacement role, when provided.
    pub role: Option<Role>,
}

impl UserPatch {
    /// Validate raw optional fields into a patch.
    pub fn new(
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            username: username.map(Username::new).transpose()?,
            email: email.map(Email::new).transpose()?,
            password: password.map(Password::new).transpose()?,
            role: role.map(Role::parse).transpose()?,
        })
    }
}
