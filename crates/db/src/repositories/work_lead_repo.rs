//! Repository for the per-project `work_leads` table.

use rise_core::files::EntityType;
use rise_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::work_lead::{CreateWorkLead, UpdateWorkLead, WorkLead};
use crate::repositories::FileRepo;

/// Work-lead columns with type name and derived current status. Alias `w`.
const SELECT: &str = "SELECT w.id, w.project_id, w.work_lead_master_id, w.work_lead_type_id,
        t.name AS work_lead_type_name, w.name, w.content,
        COALESCE(
            (SELECT x.status FROM session_work_leads x
             WHERE x.work_lead_id = w.id
             ORDER BY x.updated_at DESC, x.id DESC LIMIT 1),
            'NEW'
        ) AS current_status,
        w.is_archived, w.is_deleted, w.created_at, w.updated_at
     FROM work_leads w
     LEFT JOIN work_lead_types t ON t.id = w.work_lead_type_id";

/// Provides CRUD operations for project work leads.
pub struct WorkLeadRepo;

impl WorkLeadRepo {
    /// Create a standalone work lead (no template) on a project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateWorkLead,
    ) -> Result<WorkLead, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO work_leads (project_id, work_lead_type_id, name, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(project_id)
        .bind(input.work_lead_type_id)
        .bind(&input.name)
        .bind(&input.content)
        .fetch_one(pool)
        .await?;
        Self::find_for_project(pool, project_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find an active (possibly archived) work lead of a project.
    pub async fn find_for_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<WorkLead>, sqlx::Error> {
        let query =
            format!("{SELECT} WHERE w.id = $1 AND w.project_id = $2 AND w.is_deleted = FALSE");
        sqlx::query_as::<_, WorkLead>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// The project's work lead instantiated from a template, archived
    /// included. Soft-deleted copies are ignored.
    pub async fn find_by_project_and_master(
        pool: &PgPool,
        project_id: DbId,
        work_lead_master_id: DbId,
    ) -> Result<Option<WorkLead>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE w.project_id = $1 AND w.work_lead_master_id = $2
               AND w.is_deleted = FALSE
             ORDER BY w.id LIMIT 1"
        );
        sqlx::query_as::<_, WorkLead>(&query)
            .bind(project_id)
            .bind(work_lead_master_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's work leads, ordered by type then name.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        include_archived: bool,
    ) -> Result<Vec<WorkLead>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE w.project_id = $1 AND w.is_deleted = FALSE
               AND ($2 OR w.is_archived = FALSE)
             ORDER BY t.name NULLS LAST, w.name, w.id"
        );
        sqlx::query_as::<_, WorkLead>(&query)
            .bind(project_id)
            .bind(include_archived)
            .fetch_all(pool)
            .await
    }

    /// Copy a template into a project and share the template's attachments
    /// (its own files and files shared to it) as references on the copy.
    ///
    /// Returns `None` if the template does not exist.
    pub async fn instantiate_from_master(
        pool: &PgPool,
        project_id: DbId,
        work_lead_master_id: DbId,
        created_by: Option<UserId>,
    ) -> Result<Option<WorkLead>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO work_leads (project_id, work_lead_master_id, work_lead_type_id, name, content)
             SELECT $1, m.id, m.work_lead_type_id, m.name, m.content
             FROM work_lead_masters m
             WHERE m.id = $2
             RETURNING id",
        )
        .bind(project_id)
        .bind(work_lead_master_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Ok(None);
        };

        let shared = FileRepo::clone_as_references(
            &mut *tx,
            (EntityType::WorkLeadMaster, work_lead_master_id),
            (EntityType::WorkLead, id),
            created_by,
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            project_id,
            work_lead_master_id,
            work_lead_id = id,
            shared,
            "Instantiated work lead from template"
        );
        Self::find_for_project(pool, project_id, id).await
    }

    /// Update a work lead. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateWorkLead,
    ) -> Result<Option<WorkLead>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_leads SET
                name = COALESCE($3, name),
                work_lead_type_id = COALESCE($4, work_lead_type_id),
                content = COALESCE($5, content)
             WHERE id = $1 AND project_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(project_id)
        .bind(&input.name)
        .bind(input.work_lead_type_id)
        .bind(&input.content)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_for_project(pool, project_id, id).await
    }

    /// Soft-delete a work lead. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_leads SET is_deleted = TRUE
             WHERE id = $1 AND project_id = $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Archive or unarchive an active work lead.
    ///
    /// Returns `false` when the row is missing, deleted, or already in the
    /// requested state.
    pub async fn set_archived(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        archived: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_leads SET is_archived = $3
             WHERE id = $1 AND project_id = $2 AND is_deleted = FALSE AND is_archived = NOT $3",
        )
        .bind(id)
        .bind(project_id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
