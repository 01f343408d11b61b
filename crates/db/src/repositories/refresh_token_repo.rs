//! Repository for the `refresh_tokens` table.
//!
//! `consume` is deliberately read-only on success: rotation (delete the old
//! token, mint a new one) is the auth gate's explicit second step, so a
//! lookup can never silently double as a use.

use sqlx::PgPool;

use kbflow_core::types::{DbId, Timestamp};

use crate::models::refresh_token::RefreshToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "token, user_id, expires_at, created_at";

/// Provides storage for opaque refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Persist a freshly-minted refresh token.
    pub async fn create(
        pool: &PgPool,
        token: &str,
        user_id: DbId,
        expires_at: Timestamp,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look up a refresh token for use.
    ///
    /// Returns the row if it exists and has not expired. An expired row is
    /// deleted on the spot (lazy cleanup) and treated as absent. The row is
    /// NOT deleted on success.
    pub async fn consume(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token = $1");
        let row = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(rt) if rt.expires_at <= chrono::Utc::now() => {
                Self::delete(pool, token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete a refresh token unconditionally. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all expired refresh tokens. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
