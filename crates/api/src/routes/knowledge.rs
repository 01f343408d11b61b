//! Route definitions for knowledge items.
//!
//! Mounted at `/knowledge` by `api_routes()`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::knowledge;
use crate::state::AppState;

/// Knowledge routes.
///
/// ```text
/// GET    /               -> list_knowledge
/// POST   /               -> create_knowledge
/// GET    /{id}           -> get_knowledge
/// PUT    /{id}           -> update_knowledge (owner or admin)
/// DELETE /{id}           -> delete_knowledge (owner only)
/// PATCH  /{id}/status    -> update_status (workflow rules)
/// POST   /{id}/submit    -> submit_knowledge
/// POST   /{id}/approve   -> approve_knowledge (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(knowledge::list_knowledge).post(knowledge::create_knowledge),
        )
        .route(
            "/{id}",
            get(knowledge::get_knowledge)
                .put(knowledge::update_knowledge)
                .delete(knowledge::delete_knowledge),
        )
        .route("/{id}/status", patch(knowledge::update_status))
        .route("/{id}/submit", post(knowledge::submit_knowledge))
        .route("/{id}/approve", post(knowledge::approve_knowledge))
}
