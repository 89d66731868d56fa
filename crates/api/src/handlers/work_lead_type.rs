//! Handlers for the work-lead type taxonomy and the read-only reference
//! lists shown in the coach and navigant workspaces.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_core::work_lead_type::{validate_parent, ParentCandidate};
use rise_db::models::work_lead_type::{CreateWorkLeadType, UpdateWorkLeadType};
use rise_db::repositories::{TypeSeanceRepo, WorkLeadTypeRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkLeadType",
        id,
    })
}

async fn load_parent(pool: &PgPool, parent_id: Option<DbId>) -> AppResult<Option<ParentCandidate>> {
    let Some(parent_id) = parent_id else {
        return Ok(None);
    };
    let parent = WorkLeadTypeRepo::parent_candidate(pool, parent_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Parent work-lead type {parent_id} does not exist"
            )))
        })?;
    Ok(Some(parent))
}

/// GET /api/v1/{coach,navigant}/work-lead-types
pub async fn list(_user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let types = WorkLeadTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/{coach,navigant}/type-seances
pub async fn list_type_seances(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let types = TypeSeanceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// POST /api/v1/admin/work-lead-types
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkLeadType>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let parent = load_parent(&state.pool, input.parent_id).await?;
    validate_parent(None, parent, false)?;

    let created = WorkLeadTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/admin/work-lead-types
pub async fn admin_list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let types = WorkLeadTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/admin/work-lead-types/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = WorkLeadTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/admin/work-lead-types/{id}
///
/// `"parent_id": null` detaches the type; omitting the field keeps it.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkLeadType>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    WorkLeadTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(parent_id) = input.parent_id {
        let parent = load_parent(&state.pool, parent_id).await?;
        let has_children = WorkLeadTypeRepo::has_children(&state.pool, id).await?;
        validate_parent(Some(id), parent, has_children)?;
    }

    let updated = WorkLeadTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/admin/work-lead-types/{id}
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if WorkLeadTypeRepo::has_children(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Work-lead type {id} still has child types"
        ))));
    }
    if WorkLeadTypeRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/admin/work-lead-types/{id}/restore
///
/// A child whose parent is still deleted cannot be restored.
pub async fn restore(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = WorkLeadTypeRepo::find_by_id_include_deleted(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(parent_id) = existing.parent_id {
        if WorkLeadTypeRepo::find_by_id(&state.pool, parent_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Parent work-lead type {parent_id} is deleted; restore it first"
            ))));
        }
    }

    if !WorkLeadTypeRepo::restore(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let restored = WorkLeadTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: restored }))
}
