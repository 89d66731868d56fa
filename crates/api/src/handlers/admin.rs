//! Admin handlers for groups, group membership and projects.
//!
//! All endpoints require an admin profile via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::roles::ProfileRole;
use rise_core::types::DbId;
use rise_db::models::group::{CreateGroup, UpdateGroup};
use rise_db::models::project::{CreateProject, UpdateProject};
use rise_db::repositories::{GroupRepo, ProfileRepo, ProjectRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeDeletedParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn group_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Group", id })
}

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/groups
pub async fn create_group(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGroup>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let group = GroupRepo::create(&state.pool, &input).await?;
    tracing::info!(group_id = group.id, admin_profile_id = admin.profile_id, "Group created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// GET /api/v1/admin/groups
pub async fn list_groups(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeDeletedParams>,
) -> AppResult<impl IntoResponse> {
    let groups = GroupRepo::list(&state.pool, params.include_deleted).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/admin/groups/{id}
pub async fn get_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(DataResponse { data: group }))
}

/// PUT /api/v1/admin/groups/{id}
pub async fn update_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGroup>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/v1/admin/groups/{id}
pub async fn delete_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if GroupRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(group_not_found(id))
    }
}

/// POST /api/v1/admin/groups/{id}/restore
pub async fn restore_group(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !GroupRepo::restore(&state.pool, id).await? {
        return Err(group_not_found(id));
    }
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    Ok(Json(DataResponse { data: group }))
}

// ---------------------------------------------------------------------------
// Group membership
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/groups/{id}/coaches
pub async fn list_group_coaches(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    let coaches = GroupRepo::list_coaches(&state.pool, id).await?;
    Ok(Json(DataResponse { data: coaches }))
}

/// POST /api/v1/admin/groups/{id}/coaches/{profile_id}
///
/// Only coach and super-coach profiles can be attached.
pub async fn add_group_coach(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, profile_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;

    let profile = ProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: profile_id,
        }))?;
    let role = ProfileRole::from_type_id(profile.type_profile_id)?;
    if !role.can_coach() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Profile {profile_id} is a {} profile and cannot coach a group",
            role.name()
        ))));
    }

    GroupRepo::add_coach(&state.pool, id, profile_id).await?;
    tracing::info!(group_id = id, profile_id, "Coach added to group");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/groups/{id}/coaches/{profile_id}
pub async fn remove_group_coach(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, profile_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if GroupRepo::remove_coach(&state.pool, id, profile_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "GroupCoach",
            id: profile_id,
        }))
    }
}

/// GET /api/v1/admin/groups/{id}/projects
pub async fn list_group_projects(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    let projects = GroupRepo::list_projects(&state.pool, id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/admin/groups/{id}/projects/{project_id}
///
/// Group sessions created before the project joined are not copied to it.
pub async fn add_group_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| group_not_found(id))?;
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| project_not_found(project_id))?;

    GroupRepo::add_project(&state.pool, id, project_id).await?;
    tracing::info!(group_id = id, project_id, "Project added to group");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/groups/{id}/projects/{project_id}
pub async fn remove_group_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if GroupRepo::remove_project(&state.pool, id, project_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "GroupProject",
            id: project_id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/projects
///
/// The owning profile must be a navigant.
pub async fn create_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let owner = ProfileRepo::find_by_id(&state.pool, input.profile_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Profile {} does not exist",
                input.profile_id
            )))
        })?;
    if ProfileRole::from_type_id(owner.type_profile_id)? != ProfileRole::Navigant {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Profile {} is not a navigant profile",
            owner.id
        ))));
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, navigant_profile_id = owner.id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/admin/projects
pub async fn list_projects(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeDeletedParams>,
) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list(&state.pool, params.include_deleted).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/admin/projects/{id}
pub async fn update_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(project_not_found(id))
    }
}

/// POST /api/v1/admin/projects/{id}/restore
pub async fn restore_project(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProjectRepo::restore(&state.pool, id).await? {
        return Err(project_not_found(id));
    }
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}
