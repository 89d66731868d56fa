//! Repository for the `session_masters` table.

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::session_master::{CreateSessionMaster, SessionMaster, UpdateSessionMaster};

/// Session-master columns joined with the session type. Alias `sm`.
const SELECT: &str = "SELECT sm.id, sm.name, sm.coach_id, sm.group_id, sm.type_seance_id,
        t.name AS type_seance_name, t.is_sailing AS type_seance_is_sailing,
        sm.date_start, sm.date_end, sm.location, sm.content, sm.is_deleted,
        sm.created_at, sm.updated_at
     FROM session_masters sm
     LEFT JOIN type_seances t ON t.id = sm.type_seance_id";

/// Provides CRUD operations for group sessions.
pub struct SessionMasterRepo;

impl SessionMasterRepo {
    /// Create a group session and one linked session per active project of
    /// the group, in a single transaction.
    ///
    /// Returns the master and the IDs of the instantiated sessions.
    pub async fn create_for_group(
        pool: &PgPool,
        group_id: DbId,
        coach_id: DbId,
        input: &CreateSessionMaster,
    ) -> Result<(SessionMaster, Vec<DbId>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO session_masters
                (name, coach_id, group_id, type_seance_id, date_start, date_end, location, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(coach_id)
        .bind(group_id)
        .bind(input.type_seance_id)
        .bind(input.date_start)
        .bind(input.date_end)
        .bind(&input.location)
        .bind(&input.content)
        .fetch_one(&mut *tx)
        .await?;

        let session_ids: Vec<DbId> = sqlx::query_scalar(
            "INSERT INTO sessions
                (project_id, session_master_id, name, type_seance_id,
                 date_start, date_end, location, content)
             SELECT p.id, sm.id, sm.name, sm.type_seance_id,
                    sm.date_start, sm.date_end, sm.location, sm.content
             FROM session_masters sm
             JOIN group_projects gj ON gj.group_id = sm.group_id
             JOIN projects p ON p.id = gj.project_id AND p.is_deleted = FALSE
             WHERE sm.id = $1
             ORDER BY p.id
             RETURNING id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let master = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((master, session_ids))
    }

    /// Find an active session master by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SessionMaster>, sqlx::Error> {
        let query = format!("{SELECT} WHERE sm.id = $1 AND sm.is_deleted = FALSE");
        sqlx::query_as::<_, SessionMaster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active session master only if it belongs to `group_id`.
    pub async fn find_in_group(
        pool: &PgPool,
        group_id: DbId,
        id: DbId,
    ) -> Result<Option<SessionMaster>, sqlx::Error> {
        let query =
            format!("{SELECT} WHERE sm.id = $1 AND sm.group_id = $2 AND sm.is_deleted = FALSE");
        sqlx::query_as::<_, SessionMaster>(&query)
            .bind(id)
            .bind(group_id)
            .fetch_optional(pool)
            .await
    }

    /// List a group's sessions, most recent start date first.
    pub async fn list_for_group(
        pool: &PgPool,
        group_id: DbId,
        include_deleted: bool,
    ) -> Result<Vec<SessionMaster>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE sm.group_id = $1 AND ($2 OR sm.is_deleted = FALSE)
             ORDER BY sm.date_start DESC NULLS LAST, sm.id DESC"
        );
        sqlx::query_as::<_, SessionMaster>(&query)
            .bind(group_id)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// Update a group session. Only non-`None` fields are applied.
    ///
    /// Linked per-project sessions keep their own copies.
    pub async fn update(
        pool: &PgPool,
        group_id: DbId,
        id: DbId,
        input: &UpdateSessionMaster,
    ) -> Result<Option<SessionMaster>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE session_masters SET
                name = COALESCE($3, name),
                type_seance_id = COALESCE($4, type_seance_id),
                date_start = COALESCE($5, date_start),
                date_end = COALESCE($6, date_end),
                location = COALESCE($7, location),
                content = COALESCE($8, content)
             WHERE id = $1 AND group_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(group_id)
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
        Self::find_by_id(pool, id).await
    }

    /// Soft-delete a group session and its linked per-project sessions.
    ///
    /// Returns `true` if the master was marked deleted.
    pub async fn soft_delete_with_sessions(
        pool: &PgPool,
        group_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE session_masters SET is_deleted = TRUE
             WHERE id = $1 AND group_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE sessions SET is_deleted = TRUE
             WHERE session_master_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
