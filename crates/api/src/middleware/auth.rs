//! JWT-based authentication extractor for Axum handlers.
//!
//! This is the single identity gate: every protected endpoint resolves the
//! caller through [`AuthUser`], which verifies the token, consults the
//! revocation blacklist, and loads the user row the token's subject names.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use kbflow_core::error::CoreError;
use kbflow_core::workflow::Actor;
use kbflow_db::models::user::User;
use kbflow_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The full user row resolved from the token's subject.
    pub user: User,
}

impl AuthUser {
    /// The caller as a workflow actor.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.user.id,
            is_admin: self.user.is_admin,
        }
    }
}

/// Pull the bearer token out of an `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing or malformed Authorization header. Expected: Bearer <token>".into(),
            ))
        })?;

        // 1. Signature + expiry.
        let claims =
            validate_token(token, &state.config.jwt).map_err(|_| AuthError::InvalidToken)?;

        // 2. Revocation. A decodable token can still be dead.
        if state.blacklist.is_revoked(&state.pool, &claims.jti).await? {
            return Err(AuthError::RevokedToken.into());
        }

        // 3. The subject must still resolve to a user.
        let user = UserRepo::find_by_username(&state.pool, &claims.sub)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;

        Ok(AuthUser { user })
    }
}
