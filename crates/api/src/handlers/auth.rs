//! Handlers for the `/auth` resource (login, refresh, logout, register, me).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kbflow_core::error::CoreError;
use kbflow_db::models::user::{CreateUser, User, UserResponse};
use kbflow_db::repositories::{RefreshTokenRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, validate_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
/// An unknown username and a wrong password produce identical failures.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    let username = user.username.clone();
    let response = create_auth_response(&state, user).await?;

    tracing::info!(username = %username, "Login succeeded");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// refresh token is single-use: it is deleted once the new pair exists.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let stored = RefreshTokenRepo::consume(&state.pool, &input.refresh_token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let user = UserRepo::find_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or(AuthError::PrincipalNotFound)?;

    let username = user.username.clone();
    let response = create_auth_response(&state, user).await?;

    // Rotation: the old token dies only after its replacement is persisted.
    RefreshTokenRepo::delete(&state.pool, &input.refresh_token).await?;

    tracing::info!(username = %username, "Refresh token rotated");
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke the caller's access token (if one was presented and still decodes)
/// and delete the given refresh token. Both are best-effort and independent;
/// the response is 204 regardless.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LogoutRequest>,
) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        if let Ok(claims) = validate_token(token, &state.config.jwt) {
            // Entries carry the token's own expiry so they can be purged
            // once the token would have died anyway.
            let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
                .unwrap_or_else(Utc::now);
            if let Err(e) = state
                .blacklist
                .revoke(&state.pool, &claims.jti, expires_at)
                .await
            {
                tracing::warn!(error = %e, "Failed to blacklist access token on logout");
            }
        }
    }

    match RefreshTokenRepo::delete(&state.pool, &input.refresh_token).await {
        Ok(removed) => {
            tracing::info!(refresh_token_removed = removed, "Logout processed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to delete refresh token on logout");
        }
    }

    StatusCode::NO_CONTENT
}

/// POST /api/v1/auth/register
///
/// Create a new (non-administrator) account. Administrator rights are only
/// grantable through the admin user-management endpoint.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if input.username.trim().is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()).into());
    }
    if input.password.is_empty() {
        return Err(CoreError::Validation("Password must not be empty".into()).into());
    }

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(format!(
            "Username '{}' is already taken",
            input.username
        ))
        .into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: input.username,
        password_hash,
        full_name: input.full_name,
        is_admin: false,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated caller's own profile.
pub async fn me(auth: AuthUser) -> Json<UserResponse> {
    Json(auth.user.into())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an access token, mint and persist a refresh token, and build
/// the response.
async fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(&user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh_token = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    RefreshTokenRepo::create(&state.pool, &refresh_token, user.id, expires_at).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
        expires_in,
        user: user.into(),
    })
}
