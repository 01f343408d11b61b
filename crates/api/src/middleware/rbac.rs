//! Role enforcement extractors.
//!
//! kbflow has exactly one privileged role: the `is_admin` flag on the user
//! row. [`RequireAdmin`] wraps [`AuthUser`] and rejects everyone else.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use kbflow_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an administrator. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(auth): RequireAdmin) -> AppResult<Json<()>> {
///     // auth.user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Administrator privileges required".into(),
            )));
        }
        Ok(RequireAdmin(auth))
    }
}
