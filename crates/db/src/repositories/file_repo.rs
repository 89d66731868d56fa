//! Repository for the `files` table and its media-processing columns.

use rise_core::files::{EntityType, ProcessingStatus};
use rise_core::types::{DbId, UserId};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::file::{FileRecord, NewFile, TranscodedVideo};

pub(crate) const COLUMNS: &str = "id, origin_entity_type, origin_entity_id, file_type, file_name, \
     file_path, file_size, original_file_size, mime_type, uploaded_by, processing_status, \
     processing_error, thumbnail_path, created_at, updated_at";

/// Provides metadata operations for uploaded files.
pub struct FileRepo;

impl FileRepo {
    /// Insert the metadata row of an uploaded blob.
    pub async fn create(pool: &PgPool, input: &NewFile) -> Result<FileRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO files
                (id, origin_entity_type, origin_entity_id, file_type, file_name, file_path,
                 file_size, mime_type, uploaded_by, processing_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(input.id)
            .bind(&input.origin_entity_type)
            .bind(input.origin_entity_id)
            .bind(&input.file_type)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(input.uploaded_by)
            .bind(&input.processing_status)
            .fetch_one(pool)
            .await
    }

    /// Find a file by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<FileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the file stored under an object-store key.
    pub async fn find_by_path(pool: &PgPool, path: &str) -> Result<Option<FileRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE file_path = $1");
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(path)
            .fetch_optional(pool)
            .await
    }

    /// Number of files originating from an entity.
    pub async fn count_sources(
        pool: &PgPool,
        entity_type: EntityType,
        entity_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM files WHERE origin_entity_type = $1 AND origin_entity_id = $2",
        )
        .bind(entity_type.as_str())
        .bind(entity_id)
        .fetch_one(pool)
        .await
    }

    /// Files originating from an entity, newest first.
    ///
    /// `file_type` narrows the listing; `limit = None` returns every row.
    pub async fn list_sources(
        pool: &PgPool,
        entity_type: EntityType,
        entity_id: DbId,
        file_type: Option<&str>,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<Vec<FileRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM files
             WHERE origin_entity_type = $1 AND origin_entity_id = $2
               AND ($3::TEXT IS NULL OR file_type = $3)
             ORDER BY created_at DESC, id
             OFFSET $4 LIMIT $5"
        );
        sqlx::query_as::<_, FileRecord>(&query)
            .bind(entity_type.as_str())
            .bind(entity_id)
            .bind(file_type)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a file row. References go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Share every attachment of `from` (its own files and files shared to
    /// it) with `to`, as reference rows. No blob is copied.
    ///
    /// Runs on a caller-provided connection so it can join a transaction.
    /// Returns the number of references created.
    pub async fn clone_as_references(
        conn: &mut PgConnection,
        from: (EntityType, DbId),
        to: (EntityType, DbId),
        created_by: Option<UserId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO file_references (file_id, entity_type, entity_id, created_by)
             SELECT f.id, $3, $4, $5 FROM files f
             WHERE f.origin_entity_type = $1 AND f.origin_entity_id = $2
             UNION
             SELECT r.file_id, $3, $4, $5 FROM file_references r
             WHERE r.entity_type = $1 AND r.entity_id = $2
             ON CONFLICT (file_id, entity_type, entity_id) DO NOTHING",
        )
        .bind(from.0.as_str())
        .bind(from.1)
        .bind(to.0.as_str())
        .bind(to.1)
        .bind(created_by)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    // -- Media processing --

    /// Move a file from one processing status to another.
    ///
    /// Returns `false` if the row was not in `from` (already picked up or
    /// deleted). Callers validate the transition with
    /// [`ProcessingStatus::transition`].
    pub async fn transition(
        pool: &PgPool,
        id: Uuid,
        from: ProcessingStatus,
        to: ProcessingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET processing_status = $3 WHERE id = $1 AND processing_status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark processing finished, recording the thumbnail and, for videos,
    /// the transcoded sizes.
    pub async fn mark_ready(
        pool: &PgPool,
        id: Uuid,
        thumbnail_path: Option<&str>,
        video: Option<TranscodedVideo>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET
                processing_status = 'ready',
                processing_error = NULL,
                thumbnail_path = COALESCE($2, thumbnail_path),
                original_file_size = COALESCE($3, original_file_size),
                file_size = COALESCE($4, file_size),
                mime_type = CASE WHEN $5 THEN 'video/mp4' ELSE mime_type END
             WHERE id = $1 AND processing_status = 'processing'",
        )
        .bind(id)
        .bind(thumbnail_path)
        .bind(video.map(|v| v.original_file_size))
        .bind(video.map(|v| v.file_size))
        .bind(video.is_some())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark processing failed with an already truncated error message.
    pub async fn mark_failed(pool: &PgPool, id: Uuid, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET processing_status = 'failed', processing_error = $2
             WHERE id = $1 AND processing_status IN ('pending', 'processing')",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
