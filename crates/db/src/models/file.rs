//! File attachment metadata and sharing references.

use rise_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub origin_entity_type: String,
    pub origin_entity_id: DbId,
    pub file_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub original_file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_by: UserId,
    pub processing_status: String,
    pub processing_error: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a freshly uploaded file.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: Uuid,
    pub origin_entity_type: String,
    pub origin_entity_id: DbId,
    pub file_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_by: UserId,
    pub processing_status: String,
}

/// A row from the `file_references` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileReference {
    pub id: DbId,
    pub file_id: Uuid,
    pub entity_type: String,
    pub entity_id: DbId,
    pub created_by: Option<UserId>,
    pub created_at: Timestamp,
}

/// A file row seen through a reference, carrying the reference id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferencedFile {
    pub reference_id: DbId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub file: FileRecord,
}

/// Outcome of a successful video transcode.
#[derive(Debug, Clone, Copy)]
pub struct TranscodedVideo {
    pub original_file_size: i64,
    pub file_size: i64,
}
