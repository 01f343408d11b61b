//! Route definitions for reference articles.
//!
//! Mounted at `/articles` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Article routes.
///
/// ```text
/// GET  /                   -> list_articles
/// POST /                   -> create_article (admin only)
/// GET  /{article_number}   -> get_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(articles::create_article).get(articles::list_articles),
        )
        .route("/{article_number}", get(articles::get_article))
}
