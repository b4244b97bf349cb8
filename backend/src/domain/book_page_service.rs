//! Business rules for pages nested under a book.
//!
//! Every operation first resolves the owning book so callers can
//! distinguish "book does not exist" (404) from "book has no pages"
//! (a valid empty result).

use std::sync::Arc;

use pagination::PageRequest;
use tracing::warn;
use uuid::Uuid;

use crate::domain::book::{BookPage, PageDraft};
use crate::domain::error::Error;
use crate::domain::ports::{
    BookPagePersistenceError, BookPageRepository, BookPersistenceError, BookRepository,
};

/// Orchestrates page reads and writes within an existing book.
#[derive(Clone)]
pub struct BookPageService {
    books: Arc<dyn BookRepository>,
    pages: Arc<dyn BookPageRepository>,
}

fn map_page_error(error: BookPagePersistenceError) -> Error {
    match error {
        BookPagePersistenceError::Connection { message } => {
            warn!(%message, "page repository unavailable");
            Error::service_unavailable("catalogue storage is unavailable")
        }
        BookPagePersistenceError::Query { message } => Error::internal(message),
        BookPagePersistenceError::DuplicatePageNumber => {
            Error::conflict("a page with this number already exists for this book")
        }
        BookPagePersistenceError::BookMissing => Error::not_found("book not found"),
    }
}

fn map_book_error(error: BookPersistenceError) -> Error {
    match error {
        BookPersistenceError::Connection { message } => {
            warn!(%message, "book repository unavailable");
            Error::service_unavailable("catalogue storage is unavailable")
        }
        BookPersistenceError::Query { message } => Error::internal(message),
        BookPersistenceError::DuplicatePageNumber => {
            Error::conflict("a page with this number already exists for this book")
        }
    }
}

impl BookPageService {
    /// Create a service over the book and page repositories.
    pub fn new(books: Arc<dyn BookRepository>, pages: Arc<dyn BookPageRepository>) -> Self {
        Self { books, pages }
    }

    async fn require_book(&self, book_id: Uuid) -> Result<(), Error> {
        self.books
            .find_by_id(book_id)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| Error::not_found("book not found"))?;
        Ok(())
    }

    /// One page of a book's pages ordered by page number, plus the total
    /// count. Fails with `not_found` when the book is absent.
    pub async fn list_for_book(
        &self,
        book_id: Uuid,
        request: PageRequest,
    ) -> Result<(u64, Vec<BookPage>), Error> {
        self.require_book(book_id).await?;
        self.pages
            .list_for_book(book_id, request.offset(), request.limit())
            .await
            .map_err(map_page_error)
    }

    /// Fetch a single page of a book.
    pub async fn get(&self, book_id: Uuid, page_id: Uuid) -> Result<BookPage, Error> {
        let found = self
            .pages
            .find(book_id, page_id)
            .await
            .map_err(map_page_error)?;
        match found {
            Some(page) => Ok(page),
            None => {
                // Report the missing parent rather than the missing page
                // when the whole book is gone.
                self.require_book(book_id).await?;
                Err(Error::not_found("page not found"))
            }
        }
    }

    /// Add a page to an existing book.
    pub async fn create(&self, book_id: Uuid, draft: PageDraft) -> Result<BookPage, Error> {
        self.require_book(book_id).await?;
        let page = BookPage {
            id: Uuid::new_v4(),
            book_id,
            page_number: draft.page_number,
            content: draft.content,
        };
        self.pages.insert(&page).await.map_err(map_page_error)?;
        Ok(page)
    }
}
