//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain types run the domain constructors so a
//! corrupt row surfaces as a query error instead of an invalid entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{book_pages, books, refresh_tokens, users};

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating book records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub author: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating book records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookUpdate<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the book_pages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = book_pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookPageRow {
    pub id: Uuid,
    pub book_id: Uuid,
    pub page_number: i32,
    pub content: String,
}

/// Insertable struct for creating page records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = book_pages)]
pub(crate) struct NewBookPageRow<'a> {
    pub id: Uuid,
    pub book_id: Uuid,
    pub page_number: i32,
    pub content: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for updating user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_staff: bool,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for recording issued refresh tokens.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = refresh_tokens)]
pub(crate) struct NewRefreshTokenRow<'a> {
    pub token_hash: &'a str,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}
