//! Repository for `groups` and its membership tables
//! (`group_profiles`, `group_projects`).

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, GroupCoach, GroupProject, UpdateGroup};

/// Group columns enriched with support name and member counts. Alias `g`.
const SELECT: &str = "SELECT g.id, g.name, g.description, g.type_support_id,
        ts.name AS type_support_name,
        (SELECT COUNT(*) FROM group_profiles gp WHERE gp.group_id = g.id) AS coaches_count,
        (SELECT COUNT(*) FROM group_projects gj
            JOIN projects p ON p.id = gj.project_id AND p.is_deleted = FALSE
            WHERE gj.group_id = g.id) AS projects_count,
        (SELECT COUNT(*) FROM session_masters sm
            WHERE sm.group_id = g.id AND sm.is_deleted = FALSE) AS sessions_count,
        g.is_deleted, g.created_at, g.updated_at
     FROM groups g
     LEFT JOIN type_supports ts ON ts.id = g.type_support_id";

/// Provides CRUD and membership operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Insert a new group, returning the enriched row.
    pub async fn create(pool: &PgPool, input: &CreateGroup) -> Result<Group, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO groups (name, description, type_support_id)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.type_support_id)
        .fetch_one(pool)
        .await?;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a group by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("{SELECT} WHERE g.id = $1 AND g.is_deleted = FALSE");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List groups ordered by name.
    pub async fn list(pool: &PgPool, include_deleted: bool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("{SELECT} WHERE ($1 OR g.is_deleted = FALSE) ORDER BY g.name");
        sqlx::query_as::<_, Group>(&query)
            .bind(include_deleted)
            .fetch_all(pool)
            .await
    }

    /// List the active groups a coach profile belongs to.
    pub async fn list_for_coach(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!(
            "{SELECT}
             JOIN group_profiles member ON member.group_id = g.id AND member.profile_id = $1
             WHERE g.is_deleted = FALSE
             ORDER BY g.name"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Update a group. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE groups SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                type_support_id = COALESCE($4, type_support_id)
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.type_support_id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Soft-delete a group. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE groups SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted group. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE groups SET is_deleted = FALSE WHERE id = $1 AND is_deleted = TRUE")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Coaches --

    /// Attach a coach profile to a group. Idempotent.
    pub async fn add_coach(pool: &PgPool, group_id: DbId, profile_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO group_profiles (group_id, profile_id) VALUES ($1, $2)
             ON CONFLICT (group_id, profile_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Detach a coach profile. Returns `true` if a membership was removed.
    pub async fn remove_coach(
        pool: &PgPool,
        group_id: DbId,
        profile_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM group_profiles WHERE group_id = $1 AND profile_id = $2")
                .bind(group_id)
                .bind(profile_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `profile_id` coaches the group.
    pub async fn is_coach(pool: &PgPool, group_id: DbId, profile_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM group_profiles WHERE group_id = $1 AND profile_id = $2
             )",
        )
        .bind(group_id)
        .bind(profile_id)
        .fetch_one(pool)
        .await
    }

    /// Whether `profile_id` coaches any active group containing the project.
    pub async fn coaches_project(
        pool: &PgPool,
        profile_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM group_projects gj
                JOIN group_profiles gp ON gp.group_id = gj.group_id
                JOIN groups g ON g.id = gj.group_id AND g.is_deleted = FALSE
                WHERE gj.project_id = $1 AND gp.profile_id = $2
             )",
        )
        .bind(project_id)
        .bind(profile_id)
        .fetch_one(pool)
        .await
    }

    /// List the coaches of a group.
    pub async fn list_coaches(pool: &PgPool, group_id: DbId) -> Result<Vec<GroupCoach>, sqlx::Error> {
        sqlx::query_as::<_, GroupCoach>(
            "SELECT p.id AS profile_id, p.display_name, p.email
             FROM group_profiles gp
             JOIN profiles p ON p.id = gp.profile_id
             WHERE gp.group_id = $1
             ORDER BY p.id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    // -- Projects --

    /// Attach a project to a group. Idempotent.
    ///
    /// Existing group sessions are not instantiated for the new project.
    pub async fn add_project(pool: &PgPool, group_id: DbId, project_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO group_projects (group_id, project_id) VALUES ($1, $2)
             ON CONFLICT (group_id, project_id) DO NOTHING",
        )
        .bind(group_id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Detach a project. Returns `true` if a membership was removed.
    pub async fn remove_project(
        pool: &PgPool,
        group_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM group_projects WHERE group_id = $1 AND project_id = $2")
                .bind(group_id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the active projects of a group with their navigant.
    pub async fn list_projects(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<GroupProject>, sqlx::Error> {
        sqlx::query_as::<_, GroupProject>(
            "SELECT p.id, p.name, ts.name AS type_support_name,
                    n.id AS navigant_profile_id,
                    n.display_name AS navigant_name,
                    n.email AS navigant_email
             FROM group_projects gj
             JOIN projects p ON p.id = gj.project_id AND p.is_deleted = FALSE
             JOIN profiles n ON n.id = p.profile_id
             LEFT JOIN type_supports ts ON ts.id = p.type_support_id
             WHERE gj.group_id = $1
             ORDER BY p.name",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }
}
