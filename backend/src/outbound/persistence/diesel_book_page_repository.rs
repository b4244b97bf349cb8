//! PostgreSQL-backed book page repository using Diesel.
//!
//! Inserts rely on the schema's constraints: the unique
//! `(book_id, page_number)` index reports a duplicate page number and the
//! foreign key reports a missing owning book.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::book::BookPage;
use crate::domain::ports::{BookPagePersistenceError, BookPageRepository};

use super::models::{BookPageRow, NewBookPageRow};
use super::pool::{DbPool, PoolError};
use super::schema::book_pages;
use super::{page_limit, page_number_for_db, page_offset, page_row_to_domain};

/// Diesel-backed implementation of the book page repository port.
#[derive(Clone)]
pub struct DieselBookPageRepository {
    pool: DbPool,
}

impl DieselBookPageRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookPagePersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    BookPagePersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> BookPagePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(message = info.message(), "unique violation on page insert");
            BookPagePersistenceError::duplicate_page_number()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            BookPagePersistenceError::book_missing()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            BookPagePersistenceError::connection(info.message().to_owned())
        }
        other => BookPagePersistenceError::query(other.to_string()),
    }
}

fn row_to_domain(row: BookPageRow) -> Result<BookPage, BookPagePersistenceError> {
    page_row_to_domain(row).map_err(BookPagePersistenceError::query)
}

#[async_trait]
impl BookPageRepository for DieselBookPageRepository {
    async fn list_for_book(
        &self,
        book_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<BookPage>), BookPagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = book_pages::table
            .filter(book_pages::book_id.eq(book_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<BookPageRow> = book_pages::table
            .filter(book_pages::book_id.eq(book_id))
            .order(book_pages::page_number.asc())
            .offset(page_offset(offset))
            .limit(page_limit(limit))
            .select(BookPageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let pages = rows
            .into_iter()
            .map(row_to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((count.unsigned_abs(), pages))
    }

    async fn find(
        &self,
        book_id: Uuid,
        page_id: Uuid,
    ) -> Result<Option<BookPage>, BookPagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookPageRow> = book_pages::table
            .find(page_id)
            .filter(book_pages::book_id.eq(book_id))
            .select(BookPageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_domain).transpose()
    }

    async fn insert(&self, page: &BookPage) -> Result<(), BookPagePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewBookPageRow {
            id: page.id,
            book_id: page.book_id,
            page_number: page_number_for_db(page.page_number),
            content: page.content.as_ref(),
        };
        diesel::insert_into(book_pages::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
