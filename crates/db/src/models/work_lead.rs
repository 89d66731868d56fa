//! Per-project work-lead model and DTOs.

use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A work lead with its type name and derived current status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkLead {
    pub id: DbId,
    pub project_id: DbId,
    pub work_lead_master_id: Option<DbId>,
    pub work_lead_type_id: DbId,
    pub work_lead_type_name: Option<String>,
    pub name: String,
    pub content: Option<String>,
    pub current_status: String,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a standalone work lead on a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkLead {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub work_lead_type_id: DbId,
    pub content: Option<String>,
}

/// DTO for updating a work lead. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkLead {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub work_lead_type_id: Option<DbId>,
    pub content: Option<String>,
}
