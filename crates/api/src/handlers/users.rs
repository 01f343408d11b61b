//! Handlers for user management.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use kbflow_core::error::CoreError;
use kbflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use kbflow_core::types::DbId;
use kbflow_db::models::user::{UpdateUser, UserResponse};
use kbflow_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /users/me`: self-service profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// Request body for `PUT /users/{id}`: admin-side update.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

// ---------------------------------------------------------------------------
// GET /users
// ---------------------------------------------------------------------------

/// List users, newest first. Admin only.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// PUT /users/me
// ---------------------------------------------------------------------------

/// Update the caller's own profile (display name and/or password).
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<impl IntoResponse> {
    let update = UpdateUser {
        full_name: input.full_name,
        password_hash: hash_if_present(input.password.as_deref())?,
        is_admin: None,
    };

    let updated = UserRepo::update(&state.pool, auth.user.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user.id,
        }))?;

    tracing::info!(user_id = updated.id, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// PUT /users/{id}
// ---------------------------------------------------------------------------

/// Update any user, including the admin flag. Admin only.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let update = UpdateUser {
        full_name: input.full_name,
        password_hash: hash_if_present(input.password.as_deref())?,
        is_admin: input.is_admin,
    };

    let updated = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = updated.id,
        admin_id = admin.user.id,
        "User updated by administrator",
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hash a plaintext password if one was provided. An empty password is
/// rejected rather than silently ignored.
fn hash_if_present(password: Option<&str>) -> AppResult<Option<String>> {
    match password {
        None => Ok(None),
        Some("") => Err(CoreError::Validation("Password must not be empty".into()).into()),
        Some(p) => hash_password(p)
            .map(Some)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}"))),
    }
}
