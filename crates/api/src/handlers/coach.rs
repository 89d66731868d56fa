//! Handlers for the coach group workspace (`/api/v1/coach`).
//!
//! Every group-scoped endpoint first checks, via [`guards::coached_group`],
//! that the active profile coaches the group. Project-scoped endpoints check
//! that the project belongs to one of the caller's groups.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_core::work_lead_status::parse_status_update;
use rise_db::models::pivot::SetStatus;
use rise_db::models::session_master::{
    CreateSessionMaster, SessionMaster, UpdateSessionMaster,
};
use rise_db::models::work_lead_master::{
    CreateWorkLeadMaster, UpdateWorkLeadMaster, WorkLeadMasterFilter,
};
use rise_db::repositories::{
    GroupRepo, SessionMasterRepo, SessionMasterWorkLeadMasterRepo, SessionRepo,
    SessionWorkLeadRepo, WorkLeadMasterRepo, WorkLeadRepo,
};
use serde::Serialize;
use validator::Validate;

use crate::engine::propagation;
use crate::error::{AppError, AppResult};
use crate::handlers::{guards, work_lead_master};
use crate::middleware::rbac::RequireCoach;
use crate::query::{IncludeArchivedParams, IncludeDeletedParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// A group session together with the per-project sessions created from it.
#[derive(Debug, Serialize)]
pub struct CreatedGroupSession {
    #[serde(flatten)]
    pub session_master: SessionMaster,
    pub session_ids: Vec<DbId>,
}

fn session_master_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SessionMaster",
        id,
    })
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /api/v1/coach/groups
pub async fn list_groups(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let groups = GroupRepo::list_for_coach(&state.pool, user.profile_id).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/coach/groups/{group_id}
pub async fn get_group(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let group = guards::coached_group(&state.pool, &user, group_id).await?;
    Ok(Json(DataResponse { data: group }))
}

/// GET /api/v1/coach/groups/{group_id}/projects
pub async fn list_group_projects(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let projects = GroupRepo::list_projects(&state.pool, group_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

// ---------------------------------------------------------------------------
// Group sessions
// ---------------------------------------------------------------------------

/// GET /api/v1/coach/groups/{group_id}/sessions
pub async fn list_sessions(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Query(params): Query<IncludeDeletedParams>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let sessions =
        SessionMasterRepo::list_for_group(&state.pool, group_id, params.include_deleted).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/coach/groups/{group_id}/sessions
///
/// Creates one session per active project of the group.
pub async fn create_session(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<CreateSessionMaster>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    guards::coached_group(&state.pool, &user, group_id).await?;
    guards::ensure_type_seance(&state.pool, Some(input.type_seance_id)).await?;

    let (session_master, session_ids) =
        SessionMasterRepo::create_for_group(&state.pool, group_id, user.profile_id, &input)
            .await?;
    tracing::info!(
        group_id,
        session_master_id = session_master.id,
        sessions = session_ids.len(),
        "Group session created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedGroupSession {
                session_master,
                session_ids,
            },
        }),
    ))
}

/// GET /api/v1/coach/groups/{group_id}/sessions/{id}
pub async fn get_session(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let session = SessionMasterRepo::find_in_group(&state.pool, group_id, id)
        .await?
        .ok_or_else(|| session_master_not_found(id))?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/coach/groups/{group_id}/sessions/{id}
pub async fn update_session(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSessionMaster>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    guards::coached_group(&state.pool, &user, group_id).await?;
    guards::ensure_type_seance(&state.pool, input.type_seance_id).await?;
    let session = SessionMasterRepo::update(&state.pool, group_id, id, &input)
        .await?
        .ok_or_else(|| session_master_not_found(id))?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/coach/groups/{group_id}/sessions/{id}
///
/// Soft-deletes the group session and every session created from it.
pub async fn delete_session(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    if SessionMasterRepo::soft_delete_with_sessions(&state.pool, group_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_master_not_found(id))
    }
}

/// GET /api/v1/coach/groups/{group_id}/sessions/{id}/work-leads
pub async fn list_session_work_leads(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    SessionMasterRepo::find_in_group(&state.pool, group_id, id)
        .await?
        .ok_or_else(|| session_master_not_found(id))?;
    let entries = SessionMasterWorkLeadMasterRepo::list_for_session_master(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/coach/groups/{group_id}/sessions/{id}/work-leads/{work_lead_master_id}/status
///
/// Sets (`"status": "WORKING"`) or clears (`"status": null`) a template's
/// status on a group session and propagates it to every project session.
/// Returns the template-level row, or `null` after clearing.
pub async fn set_session_work_lead_status(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id, work_lead_master_id)): Path<(DbId, DbId, DbId)>,
    input: Result<Json<SetStatus>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let status = parse_status_update(input.status.as_deref())?;
    guards::coached_group(&state.pool, &user, group_id).await?;
    SessionMasterRepo::find_in_group(&state.pool, group_id, id)
        .await?
        .ok_or_else(|| session_master_not_found(id))?;
    WorkLeadMasterRepo::find_in_scope(&state.pool, Some(group_id), work_lead_master_id, false)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkLeadMaster",
            id: work_lead_master_id,
        }))?;

    let row = propagation::set_master_status(
        &state.pool,
        id,
        work_lead_master_id,
        status,
        user.profile_id,
        user.user_id,
    )
    .await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// Group work-lead templates
// ---------------------------------------------------------------------------

/// GET /api/v1/coach/groups/{group_id}/work-leads
pub async fn list_work_leads(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Query(filter): Query<WorkLeadMasterFilter>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let templates = WorkLeadMasterRepo::list(&state.pool, Some(group_id), filter).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/coach/groups/{group_id}/work-leads
pub async fn create_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<CreateWorkLeadMaster>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template = work_lead_master::create_in(&state.pool, Some(group_id), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/coach/groups/{group_id}/work-leads/{id}
pub async fn get_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template = work_lead_master::get_in(&state.pool, Some(group_id), id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/coach/groups/{group_id}/work-leads/{id}
pub async fn update_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateWorkLeadMaster>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template = work_lead_master::update_in(&state.pool, Some(group_id), id, &input).await?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/coach/groups/{group_id}/work-leads/{id}
pub async fn delete_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    work_lead_master::delete_in(&state.pool, Some(group_id), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/coach/groups/{group_id}/work-leads/{id}/restore
pub async fn restore_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template = work_lead_master::restore_in(&state.pool, Some(group_id), id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/coach/groups/{group_id}/work-leads/{id}/archive
pub async fn archive_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template = work_lead_master::set_archived_in(&state.pool, Some(group_id), id, true).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/coach/groups/{group_id}/work-leads/{id}/unarchive
pub async fn unarchive_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template =
        work_lead_master::set_archived_in(&state.pool, Some(group_id), id, false).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/coach/groups/{group_id}/work-leads/import/{template_id}
///
/// Copies an active global template into the group, sharing its files.
pub async fn import_work_lead(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((group_id, template_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_group(&state.pool, &user, group_id).await?;
    let template =
        WorkLeadMasterRepo::import_into_group(&state.pool, group_id, template_id, user.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "WorkLeadMaster",
                id: template_id,
            }))?;
    tracing::info!(
        group_id,
        template_id,
        work_lead_master_id = template.id,
        "Global template imported into group",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

// ---------------------------------------------------------------------------
// Project-level views
// ---------------------------------------------------------------------------

/// GET /api/v1/coach/projects/{project_id}/sessions
pub async fn list_project_sessions(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    guards::coached_project(&state.pool, &user, project_id).await?;
    let sessions = SessionRepo::list_for_project(&state.pool, project_id, false).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/coach/projects/{project_id}/work-leads
pub async fn list_project_work_leads(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<IncludeArchivedParams>,
) -> AppResult<impl IntoResponse> {
    guards::coached_project(&state.pool, &user, project_id).await?;
    let work_leads =
        WorkLeadRepo::list_for_project(&state.pool, project_id, params.include_archived).await?;
    Ok(Json(DataResponse { data: work_leads }))
}

/// GET /api/v1/coach/projects/{project_id}/sessions/{session_id}/work-leads
pub async fn list_project_session_work_leads(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((project_id, session_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    guards::coached_project(&state.pool, &user, project_id).await?;
    SessionRepo::find_for_project(&state.pool, project_id, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;
    let entries = SessionWorkLeadRepo::list_for_session(&state.pool, session_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/coach/projects/{project_id}/sessions/{session_id}/work-leads/{work_lead_id}/status
///
/// Direct edit of one project's status; detaches the pair from its template.
pub async fn set_project_work_lead_status(
    RequireCoach(user): RequireCoach,
    State(state): State<AppState>,
    Path((project_id, session_id, work_lead_id)): Path<(DbId, DbId, DbId)>,
    input: Result<Json<SetStatus>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = input?;
    let status = parse_status_update(input.status.as_deref())?;
    guards::coached_project(&state.pool, &user, project_id).await?;
    let row = super::set_individual_status(
        &state.pool,
        project_id,
        session_id,
        work_lead_id,
        status,
        user.profile_id,
    )
    .await?;
    Ok(Json(DataResponse { data: row }))
}
