//! Route definitions for authentication.
//!
//! Mounted at `/auth` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Authentication routes.
///
/// ```text
/// POST /login      -> login (public)
/// POST /refresh    -> refresh (public)
/// POST /logout     -> logout (best-effort)
/// POST /register   -> register (public, non-admin accounts only)
/// GET  /me         -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
}
