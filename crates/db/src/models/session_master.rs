//! Group session (session master) model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A session master joined with its session type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionMaster {
    pub id: DbId,
    pub name: String,
    pub coach_id: Option<DbId>,
    pub group_id: Option<DbId>,
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

/// DTO for creating a group session.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionMaster {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub type_seance_id: DbId,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    pub location: Option<serde_json::Value>,
    pub content: Option<String>,
}

/// DTO for updating a group session. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSessionMaster {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub type_seance_id: Option<DbId>,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
    pub location: Option<serde_json::Value>,
    pub content: Option<String>,
}
