//! Bearer-token authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rise_core::error::CoreError;
use rise_core::roles::ProfileRole;
use rise_core::types::{DbId, UserId};
use rise_db::models::profile::Profile;
use rise_db::repositories::ProfileRepo;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The caller's identity as asserted by a valid access token, before any
/// profile is resolved.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Profile requested by the token, if any.
    pub claimed_profile_id: Option<DbId>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            claimed_profile_id: claims.active_profile_id,
        }
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(claims.into())
    }
}

/// Authenticated user acting through their active profile.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(profile_id = user.profile_id, role = user.role.name(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: Option<String>,
    pub profile_id: DbId,
    pub role: ProfileRole,
    pub profile: Profile,
}

impl AuthUser {
    /// Resolve the active profile: the persisted choice, then the token's
    /// `active_profile_id`, then the user's first profile.
    pub async fn resolve(pool: &sqlx::PgPool, identity: Identity) -> AppResult<Self> {
        let mut profile = ProfileRepo::find_active(pool, identity.user_id).await?;

        if profile.is_none() {
            if let Some(claimed) = identity.claimed_profile_id {
                profile = ProfileRepo::find_for_user(pool, identity.user_id, claimed).await?;
            }
        }
        if profile.is_none() {
            profile = ProfileRepo::first_for_user(pool, identity.user_id).await?;
        }

        let profile = profile.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("No profile found for this user".into()))
        })?;
        let role = ProfileRole::from_type_id(profile.type_profile_id)?;

        Ok(Self {
            user_id: identity.user_id,
            email: identity.email,
            profile_id: profile.id,
            role,
            profile,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        AuthUser::resolve(&state.pool, identity).await
    }
}
