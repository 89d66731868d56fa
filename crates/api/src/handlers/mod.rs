//! Request handlers, one module per workspace.
//!
//! Handlers check scope, delegate to the repositories in `rise_db` or the
//! status engine, and map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod coach;
pub mod files;
pub mod guards;
pub mod me;
pub mod navigant;
pub mod work_lead_master;
pub mod work_lead_type;

use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_core::work_lead_status::StatusUpdate;
use rise_db::models::pivot::SessionWorkLead;
use rise_db::repositories::{SessionRepo, WorkLeadRepo};
use sqlx::PgPool;

use crate::engine::propagation;
use crate::error::{AppError, AppResult};

/// Direct status edit on a project's (session, work lead) pair, after
/// checking both belong to the project.
async fn set_individual_status(
    pool: &PgPool,
    project_id: DbId,
    session_id: DbId,
    work_lead_id: DbId,
    status: StatusUpdate,
    profile_id: DbId,
) -> AppResult<Option<SessionWorkLead>> {
    SessionRepo::find_for_project(pool, project_id, session_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }))?;
    WorkLeadRepo::find_for_project(pool, project_id, work_lead_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkLead",
            id: work_lead_id,
        }))?;

    let row =
        propagation::set_individual_status(pool, session_id, work_lead_id, status, profile_id)
            .await?;
    Ok(row)
}
