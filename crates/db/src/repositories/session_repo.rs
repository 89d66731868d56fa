//! Repository for the per-project `sessions` table.

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, Session, UpdateSession};

/// Session columns joined with the session type. Alias `s`.
const SELECT: &str = "SELECT s.id, s.project_id, s.session_master_id, s.name, s.type_seance_id,
        t.name AS type_seance_name, t.is_sailing AS type_seance_is_sailing,
        s.date_start, s.date_end, s.location, s.content, s.is_deleted,
        s.created_at, s.updated_at
     FROM sessions s
     LEFT JOIN type_seances t ON t.id = s.type_seance_id";

/// Provides CRUD operations for project sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a standalone session (no session master) on a project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO sessions
                (project_id, name, type_seance_id, date_start, date_end, location, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(project_id)
        .bind(&input.name)
        .bind(input.type_seance_id)
        .bind(input.date_start)
        .bind(input.date_end)
        .bind(&input.location)
        .bind(&input.content)
        .fetch_one(pool)
        .await?;
        Self::find_for_project(pool, project_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find an active session only if it belongs to `project_id`.
    pub async fn find_for_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query =
            format!("{SELECT} WHERE s.id = $1 AND s.project_id = $2 AND s.is_deleted = FALSE");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's sessions, most recent start date first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        include_deleted: bool,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE s.project_id = $1 AND ($2 OR s.is_deleted = FALSE)
             ORDER BY s.date_start DESC NULLS LAST, s.id DESC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(project_id)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// The active sessions instantiated from a session master.
    pub async fn list_by_master(
        pool: &PgPool,
        session_master_id: DbId,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE s.session_master_id = $1 AND s.is_deleted = FALSE ORDER BY s.project_id"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(session_master_id)
            .fetch_all(pool)
            .await
    }

    /// Update a session. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET
                name = COALESCE($3, name),
                type_seance_id = COALESCE($4, type_seance_id),
                date_start = COALESCE($5, date_start),
                date_end = COALESCE($6, date_end),
                location = COALESCE($7, location),
                content = COALESCE($8, content)
             WHERE id = $1 AND project_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(project_id)
        .bind(&input.name)
        .bind(input.type_seance_id)
        .bind(input.date_start)
        .bind(input.date_end)
        .bind(&input.location)
        .bind(&input.content)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_for_project(pool, project_id, id).await
    }

    /// Soft-delete a session. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_deleted = TRUE
             WHERE id = $1 AND project_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
