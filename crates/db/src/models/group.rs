//! Coaching group model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A group row enriched with its support name and member counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub type_support_id: Option<DbId>,
    pub type_support_name: Option<String>,
    pub coaches_count: i64,
    pub projects_count: i64,
    pub sessions_count: i64,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project as listed inside a group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupProject {
    pub id: DbId,
    pub name: String,
    pub type_support_name: Option<String>,
    pub navigant_profile_id: DbId,
    pub navigant_name: Option<String>,
    pub navigant_email: Option<String>,
}

/// A coach profile attached to a group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupCoach {
    pub profile_id: DbId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// DTO for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroup {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub type_support_id: Option<DbId>,
}

/// DTO for updating a group. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGroup {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub type_support_id: Option<DbId>,
}
