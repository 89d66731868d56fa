//! Scope and reference checks shared by the workspace handlers.

use rise_core::error::CoreError;
use rise_core::types::DbId;
use rise_db::models::group::Group;
use rise_db::models::project::Project;
use rise_db::repositories::{GroupRepo, ProjectRepo, TypeSeanceRepo, WorkLeadTypeRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Load an active group the caller coaches.
///
/// A group the caller does not coach is reported as forbidden, a missing
/// or deleted one as not found.
pub async fn coached_group(pool: &PgPool, user: &AuthUser, group_id: DbId) -> AppResult<Group> {
    let group = GroupRepo::find_by_id(pool, group_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Group",
            id: group_id,
        }))?;
    if !GroupRepo::is_coach(pool, group_id, user.profile_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Profile {} does not coach group {group_id}",
            user.profile_id
        ))));
    }
    Ok(group)
}

/// Load an active project coached by the caller through any of their groups.
pub async fn coached_project(
    pool: &PgPool,
    user: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    if !GroupRepo::coaches_project(pool, user.profile_id, project_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Profile {} does not coach project {project_id}",
            user.profile_id
        ))));
    }
    Ok(project)
}

/// The project owned by the caller's navigant profile.
pub async fn navigant_project(pool: &PgPool, user: &AuthUser) -> AppResult<Project> {
    ProjectRepo::find_by_navigant(pool, user.profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: user.profile_id,
        }))
}

/// Reject a write referencing a missing or deleted work-lead type.
pub async fn ensure_work_lead_type(pool: &PgPool, id: Option<DbId>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    if WorkLeadTypeRepo::find_by_id(pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Work-lead type {id} does not exist"
        ))));
    }
    Ok(())
}

/// Reject a write referencing a missing or deleted session type.
pub async fn ensure_type_seance(pool: &PgPool, id: Option<DbId>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    match TypeSeanceRepo::find_by_id(pool, id).await? {
        Some(t) if !t.is_deleted => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Session type {id} does not exist"
        )))),
    }
}
