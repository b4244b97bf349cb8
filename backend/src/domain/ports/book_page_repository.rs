//! Port abstraction for book page persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::book::BookPage;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by book page repository adapters.
    pub enum BookPagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "page repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "page repository query failed: {message}",
        /// The (book, page_number) pair already exists.
        DuplicatePageNumber => "a page with this number already exists for the book",
        /// The owning book does not exist.
        BookMissing => "the owning book does not exist",
    }
}

/// Persistence port for pages within a book.
#[async_trait]
pub trait BookPageRepository: Send + Sync {
    /// Fetch one page of a book's pages ordered by page number ascending,
    /// plus the total count for that book.
    async fn list_for_book(
        &self,
        book_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<BookPage>), BookPagePersistenceError>;

    /// Fetch a single page of a book.
    async fn find(
        &self,
        book_id: Uuid,
        page_id: Uuid,
    ) -> Result<Option<BookPage>, BookPagePersistenceError>;

    /// Insert a new page.
    async fn insert(&self, page: &BookPage) -> Result<(), BookPagePersistenceError>;
}
