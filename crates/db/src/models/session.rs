//! Per-project session model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A session joined with its session type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub project_id: DbId,
    pub session_master_id: Option<DbId>,
    pub name: String,
    pub type_seance_id: DbId,
    pub type_seance_name: Option<String>,
    pub type_seance_is_sailing: Option<bool>,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    pub location: Option<serde_json::Value>,
    pub content: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a standalone session on a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSession {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub type_seance_id: DbId,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    pub location: Option<serde_json::Value>,
    pub content: Option<String>,
}

/// DTO for updating a session. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSession {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub type_seance_id: Option<DbId>,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    pub location: Option<serde_json::Value>,
    pub content: Option<String>,
}
