//! PostgreSQL-backed refresh token store using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::auth::RefreshTokenRecord;
use crate::domain::ports::{
    RefreshTokenPersistenceError, RefreshTokenRepository, RevocationOutcome,
};

use super::models::NewRefreshTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::refresh_tokens;

/// Diesel-backed implementation of the refresh token repository port.
#[derive(Clone)]
pub struct DieselRefreshTokenRepository {
    pool: DbPool,
}

impl DieselRefreshTokenRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RefreshTokenPersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    RefreshTokenPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> RefreshTokenPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            RefreshTokenPersistenceError::connection(info.message().to_owned())
        }
        other => RefreshTokenPersistenceError::query(other.to_string()),
    }
}

#[async_trait]
impl RefreshTokenRepository for DieselRefreshTokenRepository {
    async fn insert(
        &self,
        record: &RefreshTokenRecord,
    ) -> Result<(), RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRefreshTokenRow {
            token_hash: &record.token_hash,
            user_id: record.user_id,
            issued_at: record.issued_at,
            expires_at: record.expires_at,
            revoked: record.revoked,
        };
        diesel::insert_into(refresh_tokens::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn revoke(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<RevocationOutcome, RefreshTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // One conditional update covers the live path; only the failure
        // paths need a second query to tell revoked from unknown.
        let affected = diesel::update(
            refresh_tokens::table
                .filter(refresh_tokens::token_hash.eq(token_hash))
                .filter(refresh_tokens::revoked.eq(false))
                .filter(refresh_tokens::expires_at.gt(now)),
        )
        .set(refresh_tokens::revoked.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if affected > 0 {
            return Ok(RevocationOutcome::Revoked);
        }

        let known: i64 = refresh_tokens::table
            .filter(refresh_tokens::token_hash.eq(token_hash))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(if known > 0 {
            RevocationOutcome::AlreadyRevoked
        } else {
            RevocationOutcome::Unknown
        })
    }
}
