//! PostgreSQL-backed book repository using Diesel.
//!
//! Creating a book with nested pages runs inside a single transaction so a
//! page insert failure rolls back the whole create. Page deletion rides on
//! the `ON DELETE CASCADE` foreign key.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::book::{Book, BookAuthor, BookPage, BookTitle, BookWithPages};
use crate::domain::ports::{BookPersistenceError, BookRepository};

use super::models::{BookRow, BookUpdate, NewBookPageRow, NewBookRow};
use super::pool::{DbPool, PoolError};
use super::schema::{book_pages, books};
use super::{page_limit, page_offset, page_number_for_db, page_row_to_domain};

/// Diesel-backed implementation of the book repository port.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookPersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    BookPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> BookPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(message = info.message(), "unique violation on book create");
            BookPersistenceError::duplicate_page_number()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            BookPersistenceError::connection(info.message().to_owned())
        }
        other => BookPersistenceError::query(other.to_string()),
    }
}

pub(super) fn book_row_to_domain(row: BookRow) -> Result<Book, BookPersistenceError> {
    let title =
        BookTitle::new(&row.title).map_err(|err| BookPersistenceError::query(err.to_string()))?;
    let author =
        BookAuthor::new(&row.author).map_err(|err| BookPersistenceError::query(err.to_string()))?;
    Ok(Book {
        id: row.id,
        title,
        author,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn create_with_pages(
        &self,
        book: &Book,
        pages: &[BookPage],
    ) -> Result<(), BookPersistenceError> {
        let new_book = NewBookRow {
            id: book.id,
            title: book.title.as_ref(),
            author: book.author.as_ref(),
            created_at: book.created_at,
            updated_at: book.updated_at,
        };
        let new_pages: Vec<NewBookPageRow<'_>> = pages
            .iter()
            .map(|page| NewBookPageRow {
                id: page.id,
                book_id: page.book_id,
                page_number: page_number_for_db(page.page_number),
                content: page.content.as_ref(),
            })
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(books::table)
                    .values(&new_book)
                    .execute(conn)
                    .await?;
                if !new_pages.is_empty() {
                    diesel::insert_into(book_pages::table)
                        .values(&new_pages)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<Book>), BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = books::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<BookRow> = books::table
            .order(books::created_at.desc())
            .offset(page_offset(offset))
            .limit(page_limit(limit))
            .select(BookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let books = rows
            .into_iter()
            .map(book_row_to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((count.unsigned_abs(), books))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookRow> = books::table
            .find(id)
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(book_row_to_domain).transpose()
    }

    async fn find_with_pages(
        &self,
        id: Uuid,
    ) -> Result<Option<BookWithPages>, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookRow> = books::table
            .find(id)
            .select(BookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let book = book_row_to_domain(row)?;

        let page_rows = book_pages::table
            .filter(book_pages::book_id.eq(id))
            .order(book_pages::page_number.asc())
            .select(super::models::BookPageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let pages = page_rows
            .into_iter()
            .map(|row| {
                page_row_to_domain(row)
                    .map_err(|err| BookPersistenceError::query(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(BookWithPages { book, pages }))
    }

    async fn update(&self, book: &Book) -> Result<bool, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = BookUpdate {
            title: book.title.as_ref(),
            author: book.author.as_ref(),
            updated_at: book.updated_at,
        };
        let affected = diesel::update(books::table.find(book.id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BookPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(books::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
