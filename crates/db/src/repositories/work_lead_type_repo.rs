//! Repository for the `work_lead_types` table.

use rise_core::types::DbId;
use rise_core::work_lead_type::ParentCandidate;
use sqlx::PgPool;

use crate::models::work_lead_type::{CreateWorkLeadType, UpdateWorkLeadType, WorkLeadType};

/// Select list joining each type with its parent's name. Alias `t` is the type.
const SELECT: &str = "SELECT t.id, t.name, t.parent_id, p.name AS parent_name,
        t.is_deleted, t.created_at, t.updated_at
     FROM work_lead_types t
     LEFT JOIN work_lead_types p ON p.id = t.parent_id";

/// Provides CRUD operations for the work-lead type taxonomy.
///
/// Nesting depth is validated by callers through
/// [`rise_core::work_lead_type::validate_parent`].
pub struct WorkLeadTypeRepo;

impl WorkLeadTypeRepo {
    /// Insert a new type, returning it with its parent name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkLeadType,
    ) -> Result<WorkLeadType, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO work_lead_types (name, parent_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.parent_id)
        .fetch_one(pool)
        .await?;
        Self::find_by_id_include_deleted(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a type by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkLeadType>, sqlx::Error> {
        let query = format!("{SELECT} WHERE t.id = $1 AND t.is_deleted = FALSE");
        sqlx::query_as::<_, WorkLeadType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a type by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkLeadType>, sqlx::Error> {
        let query = format!("{SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, WorkLeadType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active types: roots first, then children grouped under them.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkLeadType>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE t.is_deleted = FALSE
             ORDER BY COALESCE(t.parent_id, t.id), t.parent_id NULLS FIRST, t.name"
        );
        sqlx::query_as::<_, WorkLeadType>(&query).fetch_all(pool).await
    }

    /// Look up a requested parent for the nesting check.
    pub async fn parent_candidate(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ParentCandidate>, sqlx::Error> {
        let row: Option<(DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT id, parent_id FROM work_lead_types WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(id, parent_id)| ParentCandidate { id, parent_id }))
    }

    /// Whether any active type names `id` as its parent.
    pub async fn has_children(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM work_lead_types WHERE parent_id = $1 AND is_deleted = FALSE
             )",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Update a type. `parent_id` uses `Option<Option<_>>` to allow clearing.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkLeadType,
    ) -> Result<Option<WorkLeadType>, sqlx::Error> {
        let parent_provided = input.parent_id.is_some();
        let parent_value = input.parent_id.flatten();

        let result = sqlx::query(
            "UPDATE work_lead_types SET
                name = COALESCE($2, name),
                parent_id = CASE WHEN $3 THEN $4 ELSE parent_id END
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(&input.name)
        .bind(parent_provided)
        .bind(parent_value)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Soft-delete a type. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_types SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted type. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_lead_types SET is_deleted = FALSE WHERE id = $1 AND is_deleted = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
