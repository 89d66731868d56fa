//! Decisions taken by the work-lead propagation engine.
//!
//! The engine in `rise_api::engine::propagation` performs the I/O; every
//! branch it takes is decided here from the state of a single
//! `session_work_leads` row.

use crate::work_lead_status::WorkLeadStatus;

/// How a per-project (session, work lead) pair relates to its template.
///
/// Persisted as the nullable `override_master` column:
/// `false` = [`Following`](Self::Following), `true` =
/// [`Overridden`](Self::Overridden), `NULL` = [`Standalone`](Self::Standalone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterLink {
    /// Created by propagation and still synchronised from the template.
    Following,
    /// Edited directly on the project; template updates no longer apply.
    Overridden,
    /// Created directly on the project without any template.
    Standalone,
}

impl MasterLink {
    pub fn from_column(override_master: Option<bool>) -> Self {
        match override_master {
            Some(false) => Self::Following,
            Some(true) => Self::Overridden,
            None => Self::Standalone,
        }
    }

    pub fn to_column(self) -> Option<bool> {
        match self {
            Self::Following => Some(false),
            Self::Overridden => Some(true),
            Self::Standalone => None,
        }
    }
}

/// What to do with a `session_work_leads` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotAction {
    Insert {
        status: WorkLeadStatus,
        link: MasterLink,
    },
    Update {
        status: WorkLeadStatus,
        link: MasterLink,
    },
    Delete,
    Skip,
}

/// A template status change reaching one project's pair.
///
/// `existing` is the link of the current row, or `None` when no row exists.
pub fn apply_from_template(existing: Option<MasterLink>, status: WorkLeadStatus) -> PivotAction {
    match existing {
        None => PivotAction::Insert {
            status,
            link: MasterLink::Following,
        },
        Some(MasterLink::Following) => PivotAction::Update {
            status,
            link: MasterLink::Following,
        },
        // A standalone row was never created from this template; leave it.
        Some(MasterLink::Overridden) | Some(MasterLink::Standalone) => PivotAction::Skip,
    }
}

/// A template association being removed, seen from one project's pair.
pub fn remove_from_template(existing: Option<MasterLink>) -> PivotAction {
    match existing {
        Some(MasterLink::Following) => PivotAction::Delete,
        _ => PivotAction::Skip,
    }
}

/// A direct edit on a project's pair. `None` deletes unconditionally.
pub fn direct_edit(existing: Option<MasterLink>, status: Option<WorkLeadStatus>) -> PivotAction {
    match (existing, status) {
        (None, None) => PivotAction::Skip,
        (Some(_), None) => PivotAction::Delete,
        (None, Some(status)) => PivotAction::Insert {
            status,
            link: MasterLink::Standalone,
        },
        (Some(MasterLink::Following), Some(status)) => PivotAction::Update {
            status,
            link: MasterLink::Overridden,
        },
        (Some(link), Some(status)) => PivotAction::Update { status, link },
    }
}

/// Outcome counters for one propagation fan-out, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PropagationReport {
    pub sessions: usize,
    pub work_leads_created: usize,
    pub pivots_inserted: usize,
    pub pivots_updated: usize,
    pub pivots_deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PropagationReport {
    pub fn record(&mut self, action: PivotAction) {
        match action {
            PivotAction::Insert { .. } => self.pivots_inserted += 1,
            PivotAction::Update { .. } => self.pivots_updated += 1,
            PivotAction::Delete => self.pivots_deleted += 1,
            PivotAction::Skip => self.skipped += 1,
        }
    }
}
