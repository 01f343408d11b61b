//! Handlers for knowledge items: the review-workflow resource.
//!
//! Content-field CRUD is ordinary data access. Status changes are different:
//! every one of them runs through `kbflow_core::workflow::plan_transition`
//! inside a transaction that holds a row lock, so concurrent changes to the
//! same item serialize instead of losing updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use kbflow_core::error::CoreError;
use kbflow_core::knowledge::{validate_optional_fields, validate_title};
use kbflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use kbflow_core::types::DbId;
use kbflow_core::workflow::{self, Actor, KnowledgeStatus};
use kbflow_db::models::knowledge::{
    CreateKnowledge, Knowledge, KnowledgeListParams, UpdateKnowledge,
};
use kbflow_db::repositories::{ArticleRepo, KnowledgeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /knowledge/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: KnowledgeStatus,
}

// ---------------------------------------------------------------------------
// GET /knowledge
// ---------------------------------------------------------------------------

/// List knowledge items with optional status, owner, and article filters.
pub async fn list_knowledge(
    State(state): State<AppState>,
    Query(params): Query<KnowledgeListParams>,
) -> AppResult<impl IntoResponse> {
    // Validate the status filter if provided.
    if let Some(ref s) = params.status {
        s.parse::<KnowledgeStatus>()?;
    }

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = KnowledgeRepo::list_filtered(
        &state.pool,
        params.status.as_deref(),
        params.user_id,
        params.article_number.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /knowledge/{id}
// ---------------------------------------------------------------------------

/// Get a single knowledge item by ID.
pub async fn get_knowledge(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = KnowledgeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Knowledge",
            id,
        }))?;

    Ok(Json(DataResponse { data: item }))
}

// ---------------------------------------------------------------------------
// POST /knowledge
// ---------------------------------------------------------------------------

/// Create a new knowledge item in `draft` status, owned by the caller.
///
/// The referenced article must exist.
pub async fn create_knowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateKnowledge>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_optional_fields(
        input.info_category.as_deref(),
        input.keywords.as_deref(),
        input.target.as_deref(),
    )?;

    if ArticleRepo::find_by_number(&state.pool, &input.article_number)
        .await?
        .is_none()
    {
        return Err(CoreError::NotFoundByKey {
            entity: "Article",
            key: input.article_number,
        }
        .into());
    }

    let item = KnowledgeRepo::create(&state.pool, auth.user.id, &input).await?;

    tracing::info!(
        knowledge_id = item.id,
        article_number = %item.article_number,
        user_id = auth.user.id,
        "Knowledge item created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

// ---------------------------------------------------------------------------
// PUT /knowledge/{id}
// ---------------------------------------------------------------------------

/// Update a knowledge item's content fields. Owner or admin.
///
/// Status and the audit timestamps cannot be changed here; they only move
/// through the status endpoints below.
pub async fn update_knowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateKnowledge>,
) -> AppResult<impl IntoResponse> {
    let item = KnowledgeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Knowledge",
            id,
        }))?;

    if item.created_by != auth.user.id && !auth.user.is_admin {
        return Err(CoreError::Forbidden(
            "Only the item's owner or an administrator may edit it".into(),
        )
        .into());
    }

    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    validate_optional_fields(
        input.info_category.as_deref(),
        input.keywords.as_deref(),
        input.target.as_deref(),
    )?;

    let updated = KnowledgeRepo::update_fields(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Knowledge",
            id,
        }))?;

    tracing::info!(knowledge_id = id, user_id = auth.user.id, "Knowledge item updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// PATCH /knowledge/{id}/status
// ---------------------------------------------------------------------------

/// Move a knowledge item to a new status via the workflow rules.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = change_status(&state, id, auth.actor(), input.status, None).await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /knowledge/{id}/submit
// ---------------------------------------------------------------------------

/// Submit a knowledge item for review (status -> `submitted`).
pub async fn submit_knowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated =
        change_status(&state, id, auth.actor(), KnowledgeStatus::Submitted, None).await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /knowledge/{id}/approve
// ---------------------------------------------------------------------------

/// Approve a submitted knowledge item. Admin only; the item must currently
/// be in `submitted` status.
pub async fn approve_knowledge(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = change_status(
        &state,
        id,
        admin.actor(),
        KnowledgeStatus::Approved,
        Some(KnowledgeStatus::Submitted),
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /knowledge/{id}
// ---------------------------------------------------------------------------

/// Delete a knowledge item. Owner only.
///
/// Note: administrators are deliberately NOT granted delete here, matching
/// the current access policy even though it is inconsistent with the status
/// workflow's admin rule. See DESIGN.md before changing this.
pub async fn delete_knowledge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let item = KnowledgeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Knowledge",
            id,
        }))?;

    if item.created_by != auth.user.id {
        return Err(CoreError::Forbidden("Only the item's owner may delete it".into()).into());
    }

    KnowledgeRepo::delete(&state.pool, id).await?;

    tracing::info!(knowledge_id = id, user_id = auth.user.id, "Knowledge item deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run one status change end-to-end: lock the row, check the optional
/// precondition, plan the transition, and apply it -- all in one
/// transaction.
async fn change_status(
    state: &AppState,
    id: DbId,
    actor: Actor,
    new_status: KnowledgeStatus,
    required_current: Option<KnowledgeStatus>,
) -> AppResult<Knowledge> {
    let mut tx = state.pool.begin().await?;

    let item = KnowledgeRepo::find_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Knowledge",
            id,
        }))?;

    let from: KnowledgeStatus = item
        .status
        .parse()
        .map_err(|_| AppError::InternalError(format!("Corrupt status '{}' on row {id}", item.status)))?;

    if let Some(required) = required_current {
        if from != required {
            return Err(CoreError::Validation(format!(
                "Knowledge item {id} must be in '{required}' status for this action (currently '{from}')"
            ))
            .into());
        }
    }

    let plan = workflow::plan_transition(&actor, item.created_by, from, new_status, Utc::now())?;
    let updated = KnowledgeRepo::apply_transition(&mut tx, id, &plan).await?;

    tx.commit().await?;

    tracing::info!(
        knowledge_id = id,
        from = %from,
        to = %new_status,
        user_id = actor.id,
        "Knowledge status updated",
    );
    Ok(updated)
}
