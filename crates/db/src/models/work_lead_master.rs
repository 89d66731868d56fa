//! Work-lead template model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A work-lead template with its type names and derived current status.
///
/// `current_status` is `NEW` when no session-master pivot row references the
/// template, otherwise the status of the most recently updated one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkLeadMaster {
    pub id: DbId,
    pub group_id: Option<DbId>,
    pub work_lead_type_id: DbId,
    pub work_lead_type_name: Option<String>,
    pub work_lead_type_parent_name: Option<String>,
    pub name: String,
    pub content: Option<String>,
    pub current_status: String,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a work-lead template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkLeadMaster {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub work_lead_type_id: DbId,
    pub content: Option<String>,
}

/// DTO for updating a work-lead template. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkLeadMaster {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub work_lead_type_id: Option<DbId>,
    pub content: Option<String>,
    pub is_archived: Option<bool>,
}

/// Visibility filters for template listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WorkLeadMasterFilter {
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub include_archived: bool,
}
