//! Handlers for the navigant workspace (`/api/v1/navigant`).
//!
//! A navigant profile owns one project; every endpoint operates on it.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_core::work_lead_status::parse_status_update;
use rise_db::models::pivot::SetStatus;
use rise_db::models::session::{CreateSession, UpdateSession};
use rise_db::models::work_lead::{CreateWorkLead, UpdateWorkLead, WorkLead};
use rise_db::repositories::{SessionRepo, SessionWorkLeadRepo, WorkLeadRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::guards;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireNavigant;
use crate::query::{IncludeArchivedParams, IncludeDeletedParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn session_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Session",
        id,
    })
}

fn work_lead_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkLead",
        id,
    })
}

/// GET /api/v1/navigant/project
pub async fn get_project(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// GET /api/v1/navigant/sessions
pub async fn list_sessions(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Query(params): Query<IncludeDeletedParams>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    let sessions =
        SessionRepo::list_for_project(&state.pool, project.id, params.include_deleted).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/navigant/sessions
///
/// Creates a standalone session, not linked to any group session.
pub async fn create_session(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Json(input): Json<CreateSession>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = guards::navigant_project(&state.pool, &user).await?;
    guards::ensure_type_seance(&state.pool, Some(input.type_seance_id)).await?;
    let session = SessionRepo::create(&state.pool, project.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// GET /api/v1/navigant/sessions/{id}
pub async fn get_session(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    let session = SessionRepo::find_for_project(&state.pool, project.id, id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/navigant/sessions/{id}
pub async fn update_session(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSession>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = guards::navigant_project(&state.pool, &user).await?;
    guards::ensure_type_seance(&state.pool, input.type_seance_id).await?;
    let session = SessionRepo::update(&state.pool, project.id, id, &input)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/navigant/sessions/{id}
pub async fn delete_session(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    if SessionRepo::soft_delete(&state.pool, project.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// GET /api/v1/navigant/sessions/{id}/work-leads
pub async fn list_session_work_leads(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    SessionRepo::find_for_project(&state.pool, project.id, id)
        .await?
        .ok_or_else(|| session_not_found(id))?;
    let entries = SessionWorkLeadRepo::list_for_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/navigant/sessions/{id}/work-leads/{work_lead_id}/status
pub async fn set_session_work_lead_status(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path((id, work_lead_id)): Path<(DbId, DbId)>,
    input: Result<Json<SetStatus>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let status = parse_status_update(input.status.as_deref())?;
    let project = guards::navigant_project(&state.pool, &user).await?;
    let row = super::set_individual_status(
        &state.pool,
        project.id,
        id,
        work_lead_id,
        status,
        user.profile_id,
    )
    .await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// Work leads
// ---------------------------------------------------------------------------

/// GET /api/v1/navigant/work-leads
pub async fn list_work_leads(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Query(params): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    let work_leads =
        WorkLeadRepo::list_for_project(&state.pool, project.id, params.include_archived).await?;
    Ok(Json(DataResponse { data: work_leads }))
}

/// POST /api/v1/navigant/work-leads
pub async fn create_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkLead>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = guards::navigant_project(&state.pool, &user).await?;
    guards::ensure_work_lead_type(&state.pool, Some(input.work_lead_type_id)).await?;
    let work_lead = WorkLeadRepo::create(&state.pool, project.id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: work_lead })))
}

/// GET /api/v1/navigant/work-leads/{id}
pub async fn get_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    let work_lead = WorkLeadRepo::find_for_project(&state.pool, project.id, id)
        .await?
        .ok_or_else(|| work_lead_not_found(id))?;
    Ok(Json(DataResponse { data: work_lead }))
}

/// PUT /api/v1/navigant/work-leads/{id}
pub async fn update_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkLead>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let project = guards::navigant_project(&state.pool, &user).await?;
    guards::ensure_work_lead_type(&state.pool, input.work_lead_type_id).await?;
    let work_lead = WorkLeadRepo::update(&state.pool, project.id, id, &input)
        .await?
        .ok_or_else(|| work_lead_not_found(id))?;
    Ok(Json(DataResponse { data: work_lead }))
}

/// DELETE /api/v1/navigant/work-leads/{id}
pub async fn delete_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    if WorkLeadRepo::soft_delete(&state.pool, project.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(work_lead_not_found(id))
    }
}

/// POST /api/v1/navigant/work-leads/{id}/archive
pub async fn archive_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    set_archived(user, state, id, true).await
}

/// POST /api/v1/navigant/work-leads/{id}/unarchive
pub async fn unarchive_work_lead(
    RequireNavigant(user): RequireNavigant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    set_archived(user, state, id, false).await
}

async fn set_archived(
    user: AuthUser,
    state: AppState,
    id: DbId,
    archived: bool,
) -> AppResult<Json<DataResponse<WorkLead>>> {
    let project = guards::navigant_project(&state.pool, &user).await?;
    WorkLeadRepo::set_archived(&state.pool, project.id, id, archived).await?;
    let work_lead = WorkLeadRepo::find_for_project(&state.pool, project.id, id)
        .await?
        .ok_or_else(|| work_lead_not_found(id))?;
    Ok(Json(DataResponse { data: work_lead }))
}
