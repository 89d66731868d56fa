//! Handlers for work-lead templates.
//!
//! Templates live either in a group (`scope = Some(group_id)`, edited by the
//! group's coaches) or in the global library (`scope = None`, edited by
//! super-coaches). The scoped functions at the top serve both; the handlers
//! below them are the super-coach `/work-lead-masters/models` endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_db::models::work_lead_master::{
    CreateWorkLeadMaster, UpdateWorkLeadMaster, WorkLeadMaster, WorkLeadMasterFilter,
};
use rise_db::repositories::WorkLeadMasterRepo;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::guards;
use crate::middleware::rbac::RequireSuperCoach;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkLeadMaster",
        id,
    })
}

// ---------------------------------------------------------------------------
// Scoped operations
// ---------------------------------------------------------------------------

pub(crate) async fn create_in(
    pool: &PgPool,
    scope: Option<DbId>,
    input: &CreateWorkLeadMaster,
) -> AppResult<WorkLeadMaster> {
    input.validate()?;
    guards::ensure_work_lead_type(pool, Some(input.work_lead_type_id)).await?;
    let created = WorkLeadMasterRepo::create(pool, scope, input).await?;
    tracing::info!(
        work_lead_master_id = created.id,
        group_id = ?scope,
        "Work-lead template created",
    );
    Ok(created)
}

pub(crate) async fn get_in(
    pool: &PgPool,
    scope: Option<DbId>,
    id: DbId,
) -> AppResult<WorkLeadMaster> {
    WorkLeadMasterRepo::find_in_scope(pool, scope, id, false)
        .await?
        .ok_or_else(|| not_found(id))
}

pub(crate) async fn update_in(
    pool: &PgPool,
    scope: Option<DbId>,
    id: DbId,
    input: &UpdateWorkLeadMaster,
) -> AppResult<WorkLeadMaster> {
    input.validate()?;
    guards::ensure_work_lead_type(pool, input.work_lead_type_id).await?;
    WorkLeadMasterRepo::update(pool, scope, id, input)
        .await?
        .ok_or_else(|| not_found(id))
}

pub(crate) async fn delete_in(pool: &PgPool, scope: Option<DbId>, id: DbId) -> AppResult<()> {
    if WorkLeadMasterRepo::soft_delete(pool, scope, id).await? {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

pub(crate) async fn restore_in(
    pool: &PgPool,
    scope: Option<DbId>,
    id: DbId,
) -> AppResult<WorkLeadMaster> {
    if !WorkLeadMasterRepo::restore(pool, scope, id).await? {
        return Err(not_found(id));
    }
    get_in(pool, scope, id).await
}

/// Archiving is idempotent: a template already in the requested state is
/// returned unchanged.
pub(crate) async fn set_archived_in(
    pool: &PgPool,
    scope: Option<DbId>,
    id: DbId,
    archived: bool,
) -> AppResult<WorkLeadMaster> {
    let changed = WorkLeadMasterRepo::set_archived(pool, scope, id, archived).await?;
    let template = get_in(pool, scope, id).await?;
    if changed {
        tracing::info!(work_lead_master_id = id, archived, "Work-lead template archive state changed");
    }
    Ok(template)
}

// ---------------------------------------------------------------------------
// Global library (super-coach)
// ---------------------------------------------------------------------------

/// GET /api/v1/work-lead-masters/models
pub async fn list_models(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Query(filter): Query<WorkLeadMasterFilter>,
) -> AppResult<impl IntoResponse> {
    let templates = WorkLeadMasterRepo::list(&state.pool, None, filter).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/work-lead-masters/models
pub async fn create_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkLeadMaster>,
) -> AppResult<impl IntoResponse> {
    let template = create_in(&state.pool, None, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/work-lead-masters/models/{id}
pub async fn get_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = get_in(&state.pool, None, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/work-lead-masters/models/{id}
pub async fn update_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkLeadMaster>,
) -> AppResult<impl IntoResponse> {
    let template = update_in(&state.pool, None, id, &input).await?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/work-lead-masters/models/{id}
pub async fn delete_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_in(&state.pool, None, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/work-lead-masters/models/{id}/restore
pub async fn restore_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = restore_in(&state.pool, None, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/work-lead-masters/models/{id}/archive
pub async fn archive_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = set_archived_in(&state.pool, None, id, true).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/work-lead-masters/models/{id}/unarchive
pub async fn unarchive_model(
    RequireSuperCoach(_user): RequireSuperCoach,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = set_archived_in(&state.pool, None, id, false).await?;
    Ok(Json(DataResponse { data: template }))
}
