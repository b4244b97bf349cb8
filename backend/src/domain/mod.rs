//! Domain layer: entities, validation, services, and the ports the
//! services depend on. Nothing here touches HTTP or the database.

pub mod auth;
pub mod book;
pub mod book_page_service;
pub mod book_service;
pub mod error;
pub mod policy;
pub mod ports;
pub mod user;
pub mod user_service;

pub use error::{Error, ErrorCode};
