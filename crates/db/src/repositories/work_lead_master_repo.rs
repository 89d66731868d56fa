//! Repository for the `work_lead_masters` table.
//!
//! Templates are scoped: `group_id = N` for a group's templates, `NULL` for
//! the global library. Every scoped method compares with
//! `IS NOT DISTINCT FROM` so one code path serves both.

use rise_core::files::EntityType;
use rise_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::work_lead_master::{
    CreateWorkLeadMaster, UpdateWorkLeadMaster, WorkLeadMaster, WorkLeadMasterFilter,
};
use crate::repositories::FileRepo;

/// Template columns with type names and derived current status. Alias `m`.
const SELECT: &str = "SELECT m.id, m.group_id, m.work_lead_type_id,
        t.name AS work_lead_type_name, tp.name AS work_lead_type_parent_name,
        m.name, m.content,
        COALESCE(
            (SELECT x.status FROM session_master_work_lead_masters x
             WHERE x.work_lead_master_id = m.id
             ORDER BY x.updated_at DESC, x.id DESC LIMIT 1),
            'NEW'
        ) AS current_status,
        m.is_archived, m.is_deleted, m.created_at, m.updated_at
     FROM work_lead_masters m
     LEFT JOIN work_lead_types t ON t.id = m.work_lead_type_id
     LEFT JOIN work_lead_types tp ON tp.id = t.parent_id";

/// Provides CRUD operations for work-lead templates.
pub struct WorkLeadMasterRepo;

impl WorkLeadMasterRepo {
    /// Insert a template in `scope` (`None` = global library).
    pub async fn create(
        pool: &PgPool,
        scope: Option<DbId>,
        input: &CreateWorkLeadMaster,
    ) -> Result<WorkLeadMaster, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO work_lead_masters (group_id, work_lead_type_id, name, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(scope)
        .bind(input.work_lead_type_id)
        .bind(&input.name)
        .bind(&input.content)
        .fetch_one(pool)
        .await?;
        Self::find_in_scope(pool, scope, id, true)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a template within `scope`, optionally including soft-deleted rows.
    pub async fn find_in_scope(
        pool: &PgPool,
        scope: Option<DbId>,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<WorkLeadMaster>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE m.id = $1 AND m.group_id IS NOT DISTINCT FROM $2
               AND ($3 OR m.is_deleted = FALSE)"
        );
        sqlx::query_as::<_, WorkLeadMaster>(&query)
            .bind(id)
            .bind(scope)
            .bind(include_deleted)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by ID in any scope. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkLeadMaster>, sqlx::Error> {
        let query = format!("{SELECT} WHERE m.id = $1 AND m.is_deleted = FALSE");
        sqlx::query_as::<_, WorkLeadMaster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List templates in `scope`, ordered by type then name.
    pub async fn list(
        pool: &PgPool,
        scope: Option<DbId>,
        filter: WorkLeadMasterFilter,
    ) -> Result<Vec<WorkLeadMaster>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE m.group_id IS NOT DISTINCT FROM $1
               AND ($2 OR m.is_deleted = FALSE)
               AND ($3 OR m.is_archived = FALSE)
             ORDER BY t.name NULLS LAST, m.name, m.id"
        );
        sqlx::query_as::<_, WorkLeadMaster>(&query)
            .bind(scope)
            .bind(filter.include_deleted)
            .bind(filter.include_archived)
            .fetch_all(pool)
            .await
    }

    /// Update a template. Only non-`None` fields are applied.
    ///
    /// Per-project work leads already instantiated from it keep their copies.
    pub async fn update(
        pool: &PgPool,
        scope: Option<DbId>,
        id: DbId,
        input: &UpdateWorkLeadMaster,
    ) -> Result<Option<WorkLeadMaster>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_masters SET
                name = COALESCE($3, name),
                work_lead_type_id = COALESCE($4, work_lead_type_id),
                content = COALESCE($5, content),
                is_archived = COALESCE($6, is_archived)
             WHERE id = $1 AND group_id IS NOT DISTINCT FROM $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(scope)
        .bind(&input.name)
        .bind(input.work_lead_type_id)
        .bind(&input.content)
        .bind(input.is_archived)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_in_scope(pool, scope, id, false).await
    }

    /// Soft-delete a template. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, scope: Option<DbId>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_masters SET is_deleted = TRUE
             WHERE id = $1 AND group_id IS NOT DISTINCT FROM $2 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(scope)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted template. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, scope: Option<DbId>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_masters SET is_deleted = FALSE
             WHERE id = $1 AND group_id IS NOT DISTINCT FROM $2 AND is_deleted = TRUE",
        )
        .bind(id)
        .bind(scope)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Archive or unarchive an active template.
    ///
    /// Returns `false` when the row is missing, deleted, or already in the
    /// requested state.
    pub async fn set_archived(
        pool: &PgPool,
        scope: Option<DbId>,
        id: DbId,
        archived: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_masters SET is_archived = $3
             WHERE id = $1 AND group_id IS NOT DISTINCT FROM $2
               AND is_deleted = FALSE AND is_archived = NOT $3",
        )
        .bind(id)
        .bind(scope)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Copy an active global template into a group, sharing its attachments
    /// as references on the copy.
    ///
    /// Returns `None` if the global template does not exist.
    pub async fn import_into_group(
        pool: &PgPool,
        group_id: DbId,
        template_id: DbId,
        created_by: UserId,
    ) -> Result<Option<WorkLeadMaster>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO work_lead_masters (group_id, work_lead_type_id, name, content)
             SELECT $1, work_lead_type_id, name, content
             FROM work_lead_masters
             WHERE id = $2 AND group_id IS NULL AND is_deleted = FALSE
             RETURNING id",
        )
        .bind(group_id)
        .bind(template_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            tx.rollback().await?;
            return Ok(None);
        };

        FileRepo::clone_as_references(
            &mut *tx,
            (EntityType::WorkLeadMaster, template_id),
            (EntityType::WorkLeadMaster, id),
            Some(created_by),
        )
        .await?;

        tx.commit().await?;
        Self::find_in_scope(pool, Some(group_id), id, false).await
    }
}
