//! Repository for the `blacklist_entries` table.

use sqlx::PgPool;

use kbflow_core::types::Timestamp;

use crate::models::blacklist::BlacklistEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "jti, expires_at, created_at";

/// Provides storage for revoked access-token identifiers.
pub struct BlacklistRepo;

impl BlacklistRepo {
    /// Record a token id as revoked. Idempotent: revoking the same jti
    /// twice is a no-op.
    ///
    /// `expires_at` is the access token's own expiry, kept so the entry can
    /// be purged once the token would have died naturally anyway.
    pub async fn revoke(
        pool: &PgPool,
        jti: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO blacklist_entries (jti, expires_at)
             VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a revocation entry by token id.
    pub async fn find(pool: &PgPool, jti: &str) -> Result<Option<BlacklistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blacklist_entries WHERE jti = $1");
        sqlx::query_as::<_, BlacklistEntry>(&query)
            .bind(jti)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a token id has been revoked. An absent id is never
    /// revoked.
    pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        Ok(Self::find(pool, jti).await?.is_some())
    }

    /// Delete entries whose tokens have expired naturally. Returns the
    /// count of deleted rows.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blacklist_entries WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
