//! Outbound adapters implementing the domain ports: Diesel persistence,
//! JWT signing, bcrypt hashing, and the in-memory stores used for
//! development and tests.

pub mod jwt;
pub mod memory;
pub mod password;
pub mod persistence;
