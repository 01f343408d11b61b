//! Revoked access token model.

use sqlx::FromRow;

use kbflow_core::types::Timestamp;

/// A row from the `blacklist_entries` table.
///
/// `expires_at` is the revoked access token's own expiry; once it has
/// passed, the entry is dead weight and may be purged.
#[derive(Debug, Clone, FromRow)]
pub struct BlacklistEntry {
    pub jti: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
