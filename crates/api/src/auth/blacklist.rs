//! Access-token revocation service.
//!
//! Thin policy wrapper over [`BlacklistRepo`]: when the feature is disabled
//! by configuration, revocation is a successful no-op and nothing is ever
//! considered revoked, so environments without persistence overhead keep
//! working unchanged.

use sqlx::PgPool;

use kbflow_core::types::Timestamp;
use kbflow_db::repositories::BlacklistRepo;

/// Revocation store for access-token identifiers.
#[derive(Debug)]
pub struct TokenBlacklist {
    enabled: bool,
}

impl TokenBlacklist {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a token id as revoked until its natural expiry. Idempotent.
    pub async fn revoke(
        &self,
        pool: &PgPool,
        jti: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        if !self.enabled {
            return Ok(());
        }
        BlacklistRepo::revoke(pool, jti, expires_at).await
    }

    /// Check whether a token id has been revoked.
    pub async fn is_revoked(&self, pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        if !self.enabled {
            return Ok(false);
        }
        BlacklistRepo::is_revoked(pool, jti).await
    }
}
