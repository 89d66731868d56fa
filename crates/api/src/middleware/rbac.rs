//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose active
//! profile does not carry the required role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rise_core::roles::{require_one_of, ProfileRole};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[ProfileRole],
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    require_one_of(user.role, allowed)?;
    Ok(user)
}

/// Requires an admin profile. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
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
        authorize(parts, state, &[ProfileRole::Admin])
            .await
            .map(RequireAdmin)
    }
}

/// Requires a super-coach profile (global template library).
pub struct RequireSuperCoach(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperCoach {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[ProfileRole::SuperCoach])
            .await
            .map(RequireSuperCoach)
    }
}

/// Requires a coach or super-coach profile. Group membership is checked by
/// the handler.
pub struct RequireCoach(pub AuthUser);

impl FromRequestParts<AppState> for RequireCoach {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[ProfileRole::Coach, ProfileRole::SuperCoach])
            .await
            .map(RequireCoach)
    }
}

/// Requires a navigant profile.
pub struct RequireNavigant(pub AuthUser);

impl FromRequestParts<AppState> for RequireNavigant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state, &[ProfileRole::Navigant])
            .await
            .map(RequireNavigant)
    }
}
