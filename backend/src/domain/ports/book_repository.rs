//! Port abstraction for book persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::book::{Book, BookPage, BookWithPages};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by book repository adapters.
    pub enum BookPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "book repository query failed: {message}",
        /// A nested page collides with an existing (book, page_number) pair.
        DuplicatePageNumber => "a page with this number already exists for the book",
    }
}

/// Persistence port for books and their atomically created pages.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a book and its nested pages in a single transaction.
    ///
    /// Nothing is persisted when any insert fails.
    async fn create_with_pages(
        &self,
        book: &Book,
        pages: &[BookPage],
    ) -> Result<(), BookPersistenceError>;

    /// Fetch one page of books ordered newest-first, plus the total count.
    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Book>), BookPersistenceError>;

    /// Fetch a book by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, BookPersistenceError>;

    /// Fetch a book together with its pages ordered by page number.
    async fn find_with_pages(&self, id: Uuid)
    -> Result<Option<BookWithPages>, BookPersistenceError>;

    /// Persist changed book fields. Returns `false` when the book is gone.
    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError>;

    /// Delete a book and cascade to its pages. Returns `false` when the
    /// book is gone.
    async fn delete(&self, id: Uuid) -> Result<bool, BookPersistenceError>;
}
