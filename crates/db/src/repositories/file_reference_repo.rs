//! Repository for the `file_references` sharing table.

use rise_core::files::EntityType;
use rise_core::types::{DbId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::file::{FileReference, ReferencedFile};

const COLUMNS: &str = "id, file_id, entity_type, entity_id, created_by, created_at";

/// Provides operations on file shares.
pub struct FileReferenceRepo;

impl FileReferenceRepo {
    /// Share a file with an entity.
    ///
    /// A duplicate share violates `uq_file_references_target`.
    pub async fn create(
        pool: &PgPool,
        file_id: Uuid,
        entity_type: EntityType,
        entity_id: DbId,
        created_by: UserId,
    ) -> Result<FileReference, sqlx::Error> {
        let query = format!(
            "INSERT INTO file_references (file_id, entity_type, entity_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileReference>(&query)
            .bind(file_id)
            .bind(entity_type.as_str())
            .bind(entity_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find the share of a file with an entity.
    pub async fn find(
        pool: &PgPool,
        file_id: Uuid,
        entity_type: EntityType,
        entity_id: DbId,
    ) -> Result<Option<FileReference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM file_references
             WHERE file_id = $1 AND entity_type = $2 AND entity_id = $3"
        );
        sqlx::query_as::<_, FileReference>(&query)
            .bind(file_id)
            .bind(entity_type.as_str())
            .bind(entity_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete one share. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM file_references WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of entities a file is shared with.
    pub async fn count_for_file(pool: &PgPool, file_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM file_references WHERE file_id = $1")
            .bind(file_id)
            .fetch_one(pool)
            .await
    }

    /// Number of files shared with an entity.
    pub async fn count_for_entity(
        pool: &PgPool,
        entity_type: EntityType,
        entity_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM file_references WHERE entity_type = $1 AND entity_id = $2",
        )
        .bind(entity_type.as_str())
        .bind(entity_id)
        .fetch_one(pool)
        .await
    }

    /// Files shared with an entity, newest share first.
    ///
    /// `file_type` narrows the listing; `limit = None` returns every row.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: EntityType,
        entity_id: DbId,
        file_type: Option<&str>,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<Vec<ReferencedFile>, sqlx::Error> {
        let columns = super::file_repo::COLUMNS
            .split(", ")
            .map(|c| format!("f.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT r.id AS reference_id, {columns}
             FROM file_references r
             JOIN files f ON f.id = r.file_id
             WHERE r.entity_type = $1 AND r.entity_id = $2
               AND ($3::TEXT IS NULL OR f.file_type = $3)
             ORDER BY r.created_at DESC, r.id DESC
             OFFSET $4 LIMIT $5"
        );
        sqlx::query_as::<_, ReferencedFile>(&query)
            .bind(entity_type.as_str())
            .bind(entity_id)
            .bind(file_type)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
