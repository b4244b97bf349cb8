//! PostgreSQL-backed user repository using Diesel.
//!
//! Email uniqueness is enforced by the schema's unique index; a violation
//! surfaces as the typed `EmailTaken` error rather than a generic query
//! failure.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{Email, Role, User, Username};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;
use super::{page_limit, page_offset};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    UserPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(message = info.message(), "unique violation on user write");
            UserPersistenceError::email_taken()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message().to_owned())
        }
        other => UserPersistenceError::query(other.to_string()),
    }
}

fn row_to_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    let username =
        Username::new(&row.username).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let email =
        Email::new(&row.email).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    let role =
        Role::parse(&row.role).map_err(|err| UserPersistenceError::query(err.to_string()))?;
    Ok(User {
        id: row.id,
        username,
        email,
        password_hash: row.password_hash,
        role,
        is_staff: row.is_staff,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            id: user.id,
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: &user.password_hash,
            role: user.role.as_str(),
            is_staff: user.is_staff,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_domain).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_domain).transpose()
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: &user.password_hash,
            role: user.role.as_str(),
            is_staff: user.is_staff,
            updated_at: user.updated_at,
        };
        let affected = diesel::update(users::table.find(user.id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn list_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(u64, Vec<User>), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.asc())
            .offset(page_offset(offset))
            .limit(page_limit(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let users = rows
            .into_iter()
            .map(row_to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((count.unsigned_abs(), users))
    }
}
