//! Work-lead type taxonomy model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::double_option;

/// A work-lead type joined with its parent's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkLeadType {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub parent_name: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a work-lead type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkLeadType {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// DTO for updating a work-lead type.
///
/// `parent_id: null` detaches the type from its parent; an absent field
/// leaves it unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkLeadType {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
}
