//! Library backend: REST API for a book catalogue with JWT-authenticated
//! accounts.
//!
//! The crate follows a hexagonal layout. `domain` holds entities,
//! validation, services, and ports; `outbound` implements the ports over
//! Diesel, JWT, bcrypt, and in-memory stores; `inbound::http` exposes the
//! Actix handlers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use doc::ApiDoc;
