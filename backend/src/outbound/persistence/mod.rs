//! Diesel/PostgreSQL adapters for the persistence ports.
//!
//! Each repository holds a clone of the shared [`DbPool`] and maps pool and
//! Diesel errors onto its port's typed errors. Row structs and the table
//! definitions live in [`models`] and [`schema`].

mod diesel_book_page_repository;
mod diesel_book_repository;
mod diesel_refresh_token_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_book_page_repository::DieselBookPageRepository;
pub use diesel_book_repository::DieselBookRepository;
pub use diesel_refresh_token_repository::DieselRefreshTokenRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use crate::domain::book::{BookPage, PageContent, PageNumber};

use models::BookPageRow;

/// Clamp a pagination offset into Diesel's `i64` argument.
fn page_offset(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

/// Clamp a pagination limit into Diesel's `i64` argument.
fn page_limit(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Narrow a validated page number into the `Int4` column.
///
/// Page numbers are bounded by the column maximum at construction, so the
/// conversion cannot lose the value.
fn page_number_for_db(page_number: PageNumber) -> i32 {
    i32::try_from(page_number.value()).unwrap_or(i32::MAX)
}

/// Convert a page row to its domain entity, reporting corrupt rows as an
/// error message.
fn page_row_to_domain(row: BookPageRow) -> Result<BookPage, String> {
    let page_number = u32::try_from(row.page_number)
        .ok()
        .and_then(|value| PageNumber::new(value).ok())
        .ok_or_else(|| format!("page row holds invalid page number {}", row.page_number))?;
    let content = PageContent::new(row.content).map_err(|err| err.to_string())?;
    Ok(BookPage {
        id: row.id,
        book_id: row.book_id,
        page_number,
        content,
    })
}
