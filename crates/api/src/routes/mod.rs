pub mod articles;
pub mod auth;
pub mod health;
pub mod knowledge;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                  login (public)
/// /auth/refresh                refresh (public)
/// /auth/logout                 logout (best-effort)
/// /auth/register               register (public)
/// /auth/me                     current user (requires auth)
///
/// /users                       list (admin only)
/// /users/me                    self update
/// /users/{id}                  admin update
///
/// /articles                    list, create (create: admin only)
/// /articles/{article_number}   get
///
/// /knowledge                   list, create
/// /knowledge/{id}              get, update, delete
/// /knowledge/{id}/status       workflow transition (PATCH)
/// /knowledge/{id}/submit       submit for review (POST)
/// /knowledge/{id}/approve      approve (POST, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/articles", articles::router())
        .nest("/knowledge", knowledge::router())
}
