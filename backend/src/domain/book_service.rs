//! Business rules for the book resource.
//!
//! The service owns existence checks and timestamp handling. Field
//! validation happens earlier in the draft constructors, and permission
//! checks happen in the HTTP layer, so a service call always runs on
//! behalf of an authorised subject.

use std::sync::Arc;

use chrono::Utc;
use pagination::PageRequest;
use tracing::warn;
use uuid::Uuid;

use crate::domain::book::{Book, BookDraft, BookPage, BookPatch, BookWithPages};
use crate::domain::error::Error;
use crate::domain::ports::{BookPersistenceError, BookRepository};

/// Orchestrates book reads and writes over the repository port.
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
}

fn map_persistence_error(error: BookPersistenceError) -> Error {
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

impl BookService {
    /// Create a service over the given repository.
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    /// One page of books ordered newest-first, plus the total count.
    pub async fn list(&self, request: PageRequest) -> Result<(u64, Vec<Book>), Error> {
        self.books
            .list_page(request.offset(), request.limit())
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch a book with its pages, or fail with `not_found`.
    pub async fn get(&self, id: Uuid) -> Result<BookWithPages, Error> {
        self.books
            .find_with_pages(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("book not found"))
    }

    /// Create a book, atomically persisting any nested pages with it.
    pub async fn create(&self, draft: BookDraft) -> Result<BookWithPages, Error> {
        let now = Utc::now();
        let book = Book {
            id: Uuid::new_v4(),
            title: draft.title,
            author: draft.author,
            created_at: now,
            updated_at: now,
        };
        let mut pages: Vec<BookPage> = draft
            .pages
            .into_iter()
            .map(|page| BookPage {
                id: Uuid::new_v4(),
                book_id: book.id,
                page_number: page.page_number,
                content: page.content,
            })
            .collect();
        pages.sort_by_key(|page| page.page_number);

        self.books
            .create_with_pages(&book, &pages)
            .await
            .map_err(map_persistence_error)?;
        Ok(BookWithPages { book, pages })
    }

    /// Merge a partial update into an existing book.
    pub async fn update(&self, id: Uuid, patch: BookPatch) -> Result<Book, Error> {
        let mut book = self
            .books
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("book not found"))?;

        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(author) = patch.author {
            book.author = author;
        }
        book.updated_at = Utc::now();

        let updated = self
            .books
            .update(&book)
            .await
            .map_err(map_persistence_error)?;
        if !updated {
            return Err(Error::not_found("book not found"));
        }
        Ok(book)
    }

    /// Delete a book and its pages.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .books
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(Error::not_found("book not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Service behaviour over the in-memory repository.
    use pagination::{PageLimits, PageParams};

    use super::*;
    use crate::domain::book::PageDraft;
    use crate::domain::error::ErrorCode;
    use crate::outbound::memory::InMemoryCatalogue;

    fn service() -> (BookService, Arc<InMemoryCatalogue>) {
        let store = Arc::new(InMemoryCatalogue::default());
        (BookService::new(store.clone()), store)
    }

    fn draft(title: &str, pages: Vec<PageDraft>) -> BookDraft {
        BookDraft::new(title, "Donald Knuth", pages).expect("valid draft")
    }

    fn page_request(page: u32, size: u32) -> PageRequest {
        PageRequest::from_params(
            PageParams {
                page: Some(page),
                page_size: Some(size),
            },
            PageLimits::new(5),
        )
        .expect("valid request")
    }

    #[tokio::test]
    async fn create_returns_pages_ordered_by_page_number() {
        let (service, _) = service();
        let pages = vec![
            PageDraft::new(2, "p2").expect("valid page"),
            PageDraft::new(1, "p1").expect("valid page"),
        ];
        let created = service
            .create(draft("El arte de programar", pages))
            .await
            .expect("created");

        let numbers: Vec<u32> = created
            .pages
            .iter()
            .map(|page| page.page_number.value())
            .collect();
        assert_eq!(numbers, vec![1, 2]);

        let fetched = service.get(created.book.id).await.expect("fetched");
        assert_eq!(fetched.pages.len(), 2);
        assert_eq!(fetched.book.title.as_ref(), "El arte de programar");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_counts_everything() {
        let (service, _) = service();
        for index in 0..3 {
            service
                .create(draft(&format!("book {index}"), Vec::new()))
                .await
                .expect("created");
        }

        let (count, books) = service.list(page_request(1, 2)).await.expect("listed");
        assert_eq!(count, 3);
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title.as_ref(), "book 2");
    }

    #[tokio::test]
    async fn get_missing_book_is_not_found() {
        let (service, _) = service();
        let error = service.get(Uuid::new_v4()).await.expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let (service, _) = service();
        let created = service
            .create(draft("Original", Vec::new()))
            .await
            .expect("created");

        let patch = BookPatch::new(Some("Renamed"), None).expect("valid patch");
        let updated = service.update(created.book.id, patch).await.expect("updated");
        assert_eq!(updated.title.as_ref(), "Renamed");
        assert_eq!(updated.author.as_ref(), "Donald Knuth");
        assert!(updated.updated_at >= created.book.updated_at);
    }

    #[tokio::test]
    async fn delete_cascades_to_pages() {
        let (service, store) = service();
        let pages = vec![PageDraft::new(1, "p1").expect("valid page")];
        let created = service.create(draft("Doomed", pages)).await.expect("created");

        service.delete(created.book.id).await.expect("deleted");
        assert_eq!(
            service
                .delete(created.book.id)
                .await
                .expect_err("already gone")
                .code(),
            ErrorCode::NotFound,
        );
        assert!(store.pages_for_book(created.book.id).is_empty());
    }
}
