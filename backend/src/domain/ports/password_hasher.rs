//! Port abstraction for password hashing adapters.

use crate::domain::user::Password;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// One-way password hashing used at signup, login, and self-update.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError>;
}
