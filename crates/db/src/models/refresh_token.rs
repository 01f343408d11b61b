//! Refresh token model.

use sqlx::FromRow;

use kbflow_core::types::{DbId, Timestamp};

/// A row from the `refresh_tokens` table.
///
/// The token string is the primary key and is stored raw: it is an opaque
/// bearer secret scoped to the refresh endpoint only, deleted on first use.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
