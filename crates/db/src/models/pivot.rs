//! Status pivot rows linking sessions to work leads.

use rise_core::propagation::MasterLink;
use rise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `session_master_work_lead_masters`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionMasterWorkLeadMaster {
    pub id: DbId,
    pub session_master_id: DbId,
    pub work_lead_master_id: DbId,
    pub status: String,
    pub profile_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A template-level pivot row joined with the template it points at.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionMasterWorkLeadEntry {
    pub work_lead_master_id: DbId,
    pub work_lead_master_name: String,
    pub work_lead_type_id: DbId,
    pub work_lead_type_name: Option<String>,
    pub status: String,
    pub profile_id: Option<DbId>,
    pub updated_at: Timestamp,
}

/// A row from `session_work_leads`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionWorkLead {
    pub id: DbId,
    pub session_id: DbId,
    pub work_lead_id: DbId,
    pub status: String,
    /// `false` follows the template, `true` is overridden, `NULL` is standalone.
    pub override_master: Option<bool>,
    pub profile_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SessionWorkLead {
    pub fn link(&self) -> MasterLink {
        MasterLink::from_column(self.override_master)
    }
}

/// A per-project pivot row joined with the work lead it points at.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionWorkLeadEntry {
    pub work_lead_id: DbId,
    pub work_lead_name: String,
    pub work_lead_master_id: Option<DbId>,
    pub work_lead_type_id: DbId,
    pub work_lead_type_name: Option<String>,
    pub status: String,
    pub override_master: Option<bool>,
    pub profile_id: Option<DbId>,
    pub updated_at: Timestamp,
}

/// Request body of both status endpoints.
///
/// The `status` key is required: `null` clears the status, an absent key is
/// a malformed request.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatus {
    #[serde(deserialize_with = "required_nullable")]
    pub status: Option<String>,
}

// A field with `deserialize_with` and no `default` errors when missing,
// unlike a plain `Option` field.
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}
