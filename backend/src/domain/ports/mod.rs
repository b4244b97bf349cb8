//! Domain ports: traits the domain services depend on, implemented by
//! outbound adapters (Diesel, JWT, bcrypt, in-memory).

pub(crate) mod macros;

mod book_page_repository;
mod book_repository;
mod password_hasher;
mod refresh_token_repository;
mod token_codec;
mod user_repository;

pub use book_page_repository::{BookPagePersistenceError, BookPageRepository};
pub use book_repository::{BookPersistenceError, BookRepository};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use refresh_token_repository::{
    RefreshTokenPersistenceError, RefreshTokenRepository, RevocationOutcome,
};
pub use token_codec::{TokenCodec, TokenCodecError};
pub use user_repository::{UserPersistenceError, UserRepository};
