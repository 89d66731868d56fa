//! Repository for the `projects` table.

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Project columns joined with the support name. Alias `p`.
const SELECT: &str = "SELECT p.id, p.name, p.description, p.profile_id, p.type_support_id,
        ts.name AS type_support_name, p.location, p.is_deleted, p.created_at, p.updated_at
     FROM projects p
     LEFT JOIN type_supports ts ON ts.id = p.type_support_id";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects (name, description, profile_id, type_support_id, location)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.profile_id)
        .bind(input.type_support_id)
        .bind(&input.location)
        .fetch_one(pool)
        .await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a project by its ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1 AND p.is_deleted = FALSE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active project owned by a navigant profile.
    pub async fn find_by_navigant(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE p.profile_id = $1 AND p.is_deleted = FALSE ORDER BY p.id LIMIT 1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// List projects, most recently created first.
    pub async fn list(pool: &PgPool, include_deleted: bool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE ($1 OR p.is_deleted = FALSE) ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// IDs of the active projects of a group.
    pub async fn list_ids_for_group(pool: &PgPool, group_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT p.id FROM group_projects gj
             JOIN projects p ON p.id = gj.project_id
             WHERE gj.group_id = $1 AND p.is_deleted = FALSE
             ORDER BY p.id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                type_support_id = COALESCE($4, type_support_id),
                location = COALESCE($5, location)
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.type_support_id)
        .bind(&input.location)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Soft-delete a project by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted project. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET is_deleted = FALSE WHERE id = $1 AND is_deleted = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
