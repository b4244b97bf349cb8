//! bcrypt adapter for the password hashing port.

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::user::Password;

/// bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher at the library's default work factor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    /// Hasher at an explicit work factor. Tests use the minimum cost to
    /// keep hashing fast.
    #[must_use]
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        bcrypt::hash(password.expose(), self.cost)
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password.expose(), hash)
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_reject_other_passwords() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let password = Password::new("correct horse").expect("valid password");
        let hash = hasher.hash(&password).expect("hashed");

        assert!(hasher.verify(&password, &hash).expect("verified"));
        let other = Password::new("battery staple").expect("valid password");
        assert!(!hasher.verify(&other, &hash).expect("verified"));
    }

    #[test]
    fn each_hash_is_salted() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let password = Password::new("correct horse").expect("valid password");
        let first = hasher.hash(&password).expect("hashed");
        let second = hasher.hash(&password).expect("hashed");
        assert_ne!(first, second);
    }
}
