//! Handlers for reference articles.
//!
//! Articles are plain reference data: list, fetch, and admin registration.
//! Knowledge items validate their `article_number` against this table.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kbflow_core::error::CoreError;
use kbflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use kbflow_db::models::article::CreateArticle;
use kbflow_db::repositories::ArticleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/articles
///
/// List active articles ordered by article number.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let articles = ArticleRepo::list_active(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/{article_number}
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleRepo::find_by_number(&state.pool, &article_number)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Article",
            key: article_number,
        }))?;

    Ok(Json(DataResponse { data: article }))
}

/// POST /api/v1/articles
///
/// Register a new reference article. Admin only; duplicate article numbers
/// are a conflict.
pub async fn create_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    if ArticleRepo::find_by_number(&state.pool, &input.article_number)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(format!(
            "Article number '{}' already exists",
            input.article_number
        ))
        .into());
    }

    let article = ArticleRepo::create(&state.pool, &input).await?;

    tracing::info!(
        article_number = %article.article_number,
        admin_id = admin.user.id,
        "Article registered",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}
