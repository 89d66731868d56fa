//! Handlers for the caller's own identity and profiles.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::types::{DbId, UserId};
use rise_db::models::profile::{Profile, ProfileSummary};
use rise_db::repositories::ProfileRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, Identity};
use crate::response::DataResponse;
use crate::state::AppState;

/// The caller and the profile they are acting through.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: &'static str,
    pub profile: Profile,
}

/// The caller's profiles and which one is active.
#[derive(Debug, Serialize)]
pub struct ProfilesResponse {
    pub active_profile_id: Option<DbId>,
    pub profiles: Vec<ProfileSummary>,
}

/// GET /api/v1/me
pub async fn me(user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: MeResponse {
            user_id: user.user_id,
            email: user.email,
            role: user.role.name(),
            profile: user.profile,
        },
    }))
}

/// GET /api/v1/me/profiles
///
/// Works for users without any profile too; `active_profile_id` is then null.
pub async fn list_profiles(
    identity: Identity,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user_id = identity.user_id;
    let profiles = ProfileRepo::list_for_user(&state.pool, user_id).await?;
    let active_profile_id = if profiles.is_empty() {
        None
    } else {
        Some(AuthUser::resolve(&state.pool, identity).await?.profile_id)
    };

    Ok(Json(DataResponse {
        data: ProfilesResponse {
            active_profile_id,
            profiles,
        },
    }))
}

/// POST /api/v1/me/profiles/switch/{profile_id}
pub async fn switch_profile(
    identity: Identity,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_for_user(&state.pool, identity.user_id, profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: profile_id,
        }))?;

    ProfileRepo::set_active(&state.pool, identity.user_id, profile.id).await?;
    tracing::info!(
        user_id = %identity.user_id,
        profile_id = profile.id,
        "Active profile switched",
    );

    let user = AuthUser::resolve(&state.pool, identity).await?;
    Ok(Json(DataResponse {
        data: MeResponse {
            user_id: user.user_id,
            email: user.email,
            role: user.role.name(),
            profile: user.profile,
        },
    }))
}
