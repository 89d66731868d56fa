//! Work-lead status values and "current status" derivation.
//!
//! A status is only ever stored on the pivot tables
//! (`session_master_work_lead_masters`, `session_work_leads`). The status shown
//! for a work lead or template is derived from the most recently updated
//! pivot row, or `NEW` when none exists; the repositories resolve it in SQL.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_TODO: &str = "TODO";
pub const STATUS_WORKING: &str = "WORKING";
pub const STATUS_DANGER: &str = "DANGER";
pub const STATUS_OK: &str = "OK";

/// Reported when no pivot row references the entity yet.
pub const STATUS_NEW: &str = "NEW";

/// All values accepted on a pivot row.
pub const VALID_STATUSES: &[&str] = &[STATUS_TODO, STATUS_WORKING, STATUS_DANGER, STATUS_OK];

/// A status that can be written to a pivot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkLeadStatus {
    Todo,
    Working,
    Danger,
    Ok,
}

impl WorkLeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => STATUS_TODO,
            Self::Working => STATUS_WORKING,
            Self::Danger => STATUS_DANGER,
            Self::Ok => STATUS_OK,
        }
    }

    /// Parse a status exactly as stored (upper case, no whitespace).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_TODO => Ok(Self::Todo),
            STATUS_WORKING => Ok(Self::Working),
            STATUS_DANGER => Ok(Self::Danger),
            STATUS_OK => Ok(Self::Ok),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for WorkLeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status-change request: `None` means "remove the association".
pub type StatusUpdate = Option<WorkLeadStatus>;

/// Validate the `status` field of a status-change request body.
pub fn parse_status_update(value: Option<&str>) -> Result<StatusUpdate, CoreError> {
    value.map(WorkLeadStatus::parse).transpose()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn all_four_statuses_parse() {
        for s in VALID_STATUSES {
            assert_eq!(WorkLeadStatus::parse(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn out_of_enum_status_is_validation_error() {
        assert_matches!(WorkLeadStatus::parse("DONE"), Err(CoreError::Validation(_)));
        assert_matches!(WorkLeadStatus::parse("working"), Err(CoreError::Validation(_)));
        assert_matches!(WorkLeadStatus::parse(STATUS_NEW), Err(CoreError::Validation(_)));
        assert_matches!(WorkLeadStatus::parse(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn null_update_means_removal() {
        assert_eq!(parse_status_update(None).unwrap(), None);
        assert_eq!(
            parse_status_update(Some("OK")).unwrap(),
            Some(WorkLeadStatus::Ok)
        );
        assert!(parse_status_update(Some("bogus")).is_err());
    }
}
