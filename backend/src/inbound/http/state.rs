//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`, so they depend
//! only on the domain services and the token codec port and stay testable
//! without a database.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::book_page_service::BookPageService;
use crate::domain::book_service::BookService;
use crate::domain::ports::TokenCodec;
use crate::domain::user_service::UserService;
use crate::outbound::jwt::JwtTokenCodec;
use crate::outbound::memory::{InMemoryCatalogue, InMemoryRefreshTokens, InMemoryUsers};
use crate::outbound::password::BcryptPasswordHasher;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Book reads and writes.
    pub books: BookService,
    /// Page reads and writes nested under books.
    pub pages: BookPageService,
    /// Accounts and authentication.
    pub users: UserService,
    /// Access token verification for the auth extractor.
    pub tokens: Arc<dyn TokenCodec>,
}

impl HttpState {
    /// Construct state over already-wired services.
    pub fn new(
        books: BookService,
        pages: BookPageService,
        users: UserService,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            books,
            pages,
            users,
            tokens,
        }
    }

    /// State backed entirely by in-memory adapters.
    ///
    /// Used by the no-database development mode and by the HTTP tests.
    /// `bcrypt_cost` lets tests pick the minimum work factor.
    #[must_use]
    pub fn in_memory(
        jwt_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        let catalogue = Arc::new(InMemoryCatalogue::default());
        let tokens: Arc<dyn TokenCodec> = Arc::new(JwtTokenCodec::new(jwt_secret, access_ttl));
        let users = UserService::new(
            Arc::new(InMemoryUsers::default()),
            Arc::new(InMemoryRefreshTokens::default()),
            Arc::new(BcryptPasswordHasher::with_cost(bcrypt_cost)),
            tokens.clone(),
            refresh_ttl,
        );
        Self {
            books: BookService::new(catalogue.clone()),
            pages: BookPageService::new(catalogue.clone(), catalogue),
            users,
            tokens,
        }
    }
}
