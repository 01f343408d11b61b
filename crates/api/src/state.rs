use std::sync::Arc;

use crate::auth::blacklist::TokenBlacklist;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kbflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Access-token revocation service, consulted on every protected request.
    pub blacklist: Arc<TokenBlacklist>,
}
