//! Navigant project model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row joined with its support name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// The owning navigant profile.
    pub profile_id: DbId,
    pub type_support_id: Option<DbId>,
    pub type_support_name: Option<String>,
    pub location: Option<serde_json::Value>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub profile_id: DbId,
    pub type_support_id: Option<DbId>,
    pub location: Option<serde_json::Value>,
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub type_support_id: Option<DbId>,
    pub location: Option<serde_json::Value>,
}
