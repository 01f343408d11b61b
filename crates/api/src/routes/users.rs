//! Route definitions for user management.
//!
//! Mounted at `/users` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User management routes.
///
/// ```text
/// GET /          -> list_users (admin only)
/// PUT /me        -> update_me
/// PUT /{id}      -> update_user (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/me", put(users::update_me))
        .route("/{id}", put(users::update_user))
}
