//! Template status propagation.
//!
//! A status set on a (session master, work-lead master) pair is pushed down
//! to every session instantiated from that session master. Each project
//! gets its own copy of the template as a work lead, created on first use,
//! and a `session_work_leads` row that follows the template until a coach
//! or navigant edits it directly.
//!
//! The template-level write always commits first. Failures while fanning
//! out to individual projects are logged and counted in the
//! [`PropagationReport`] but never surface to the caller.

use rise_core::propagation::{
    apply_from_template, direct_edit, remove_from_template, MasterLink, PivotAction,
    PropagationReport,
};
use rise_core::types::{DbId, UserId};
use rise_core::work_lead_status::{StatusUpdate, WorkLeadStatus};
use rise_db::models::pivot::{SessionMasterWorkLeadMaster, SessionWorkLead};
use rise_db::models::session::Session;
use rise_db::repositories::{
    SessionMasterWorkLeadMasterRepo, SessionRepo, SessionWorkLeadRepo, WorkLeadRepo,
};
use sqlx::PgPool;

/// Set or clear the status of a template on a group session.
///
/// Returns the template-level row, or `None` when the status was cleared.
/// The caller must have checked that both ids belong to the acting coach's
/// group and that the template is not deleted.
pub async fn set_master_status(
    pool: &PgPool,
    session_master_id: DbId,
    work_lead_master_id: DbId,
    status: StatusUpdate,
    profile_id: DbId,
    user_id: UserId,
) -> Result<Option<SessionMasterWorkLeadMaster>, sqlx::Error> {
    match status {
        None => {
            remove(pool, session_master_id, work_lead_master_id).await;
            SessionMasterWorkLeadMasterRepo::delete(pool, session_master_id, work_lead_master_id)
                .await?;
            Ok(None)
        }
        Some(status) => {
            let row = SessionMasterWorkLeadMasterRepo::upsert(
                pool,
                session_master_id,
                work_lead_master_id,
                status.as_str(),
                profile_id,
            )
            .await?;
            apply(
                pool,
                session_master_id,
                work_lead_master_id,
                status,
                profile_id,
                user_id,
            )
            .await;
            Ok(Some(row))
        }
    }
}

/// Push a template status to every project session of a group session.
///
/// Creates the project's copy of the template when it has none. Rows that
/// were overridden or created without a template are left alone.
pub async fn apply(
    pool: &PgPool,
    session_master_id: DbId,
    work_lead_master_id: DbId,
    status: WorkLeadStatus,
    profile_id: DbId,
    user_id: UserId,
) -> PropagationReport {
    let mut report = PropagationReport::default();
    let Some(sessions) = sessions_of(pool, session_master_id, &mut report).await else {
        return report;
    };

    for session in &sessions {
        match apply_to_session(pool, session, work_lead_master_id, status, profile_id, user_id)
            .await
        {
            Ok(step) => step.record(&mut report),
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    session_master_id,
                    work_lead_master_id,
                    session_id = session.id,
                    project_id = session.project_id,
                    error = %e,
                    "Template status propagation failed for project",
                );
            }
        }
    }

    tracing::info!(
        session_master_id,
        work_lead_master_id,
        status = %status,
        sessions = report.sessions,
        work_leads_created = report.work_leads_created,
        inserted = report.pivots_inserted,
        updated = report.pivots_updated,
        skipped = report.skipped,
        failed = report.failed,
        "Template status propagated",
    );
    report
}

/// Retract the rows a template produced on every project session of a
/// group session. Only rows still following the template are deleted.
pub async fn remove(
    pool: &PgPool,
    session_master_id: DbId,
    work_lead_master_id: DbId,
) -> PropagationReport {
    let mut report = PropagationReport::default();
    let Some(sessions) = sessions_of(pool, session_master_id, &mut report).await else {
        return report;
    };

    for session in &sessions {
        match remove_from_session(pool, session, work_lead_master_id).await {
            Ok(step) => step.record(&mut report),
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    session_master_id,
                    work_lead_master_id,
                    session_id = session.id,
                    project_id = session.project_id,
                    error = %e,
                    "Template status removal failed for project",
                );
            }
        }
    }

    tracing::info!(
        session_master_id,
        work_lead_master_id,
        sessions = report.sessions,
        deleted = report.pivots_deleted,
        skipped = report.skipped,
        failed = report.failed,
        "Template status removed",
    );
    report
}

/// Set or clear a status directly on a project's (session, work lead) pair.
///
/// A direct edit detaches a pair that was following its template; a pair
/// with no row becomes standalone. Clearing deletes the row whatever its
/// link. Returns the row as it stands after the write.
pub async fn set_individual_status(
    pool: &PgPool,
    session_id: DbId,
    work_lead_id: DbId,
    status: StatusUpdate,
    profile_id: DbId,
) -> Result<Option<SessionWorkLead>, sqlx::Error> {
    let observed = SessionWorkLeadRepo::find(pool, session_id, work_lead_id)
        .await?
        .map(|row| row.link());
    let action = direct_edit(observed, status);
    let written =
        SessionWorkLeadRepo::execute(pool, session_id, work_lead_id, observed, action, profile_id)
            .await?;

    tracing::debug!(
        session_id,
        work_lead_id,
        ?observed,
        ?action,
        written,
        "Direct status edit",
    );
    SessionWorkLeadRepo::find(pool, session_id, work_lead_id).await
}

/// Outcome of one project's step.
struct Step {
    created_work_lead: bool,
    action: PivotAction,
    written: bool,
}

impl Step {
    fn record(&self, report: &mut PropagationReport) {
        if self.created_work_lead {
            report.work_leads_created += 1;
        }
        // A guarded write that matched no row lost a race with another edit.
        report.record(if self.written {
            self.action
        } else {
            PivotAction::Skip
        });
    }
}

async fn sessions_of(
    pool: &PgPool,
    session_master_id: DbId,
    report: &mut PropagationReport,
) -> Option<Vec<Session>> {
    match SessionRepo::list_by_master(pool, session_master_id).await {
        Ok(sessions) => {
            report.sessions = sessions.len();
            Some(sessions)
        }
        Err(e) => {
            report.failed += 1;
            tracing::error!(
                session_master_id,
                error = %e,
                "Failed to list sessions of group session",
            );
            None
        }
    }
}

async fn apply_to_session(
    pool: &PgPool,
    session: &Session,
    work_lead_master_id: DbId,
    status: WorkLeadStatus,
    profile_id: DbId,
    user_id: UserId,
) -> Result<Step, sqlx::Error> {
    let mut created_work_lead = false;
    let work_lead =
        match WorkLeadRepo::find_by_project_and_master(pool, session.project_id, work_lead_master_id)
            .await?
        {
            Some(existing) => existing,
            None => {
                let created = WorkLeadRepo::instantiate_from_master(
                    pool,
                    session.project_id,
                    work_lead_master_id,
                    Some(user_id),
                )
                .await?;
                let Some(created) = created else {
                    tracing::warn!(
                        work_lead_master_id,
                        project_id = session.project_id,
                        "Template vanished before it could be copied",
                    );
                    return Ok(Step {
                        created_work_lead: false,
                        action: PivotAction::Skip,
                        written: false,
                    });
                };
                created_work_lead = true;
                created
            }
        };

    let observed = SessionWorkLeadRepo::find(pool, session.id, work_lead.id)
        .await?
        .map(|row| row.link());
    let action = apply_from_template(observed, status);
    let written =
        SessionWorkLeadRepo::execute(pool, session.id, work_lead.id, observed, action, profile_id)
            .await?;

    Ok(Step {
        created_work_lead,
        action,
        written,
    })
}

async fn remove_from_session(
    pool: &PgPool,
    session: &Session,
    work_lead_master_id: DbId,
) -> Result<Step, sqlx::Error> {
    let Some(work_lead) =
        WorkLeadRepo::find_by_project_and_master(pool, session.project_id, work_lead_master_id)
            .await?
    else {
        return Ok(Step {
            created_work_lead: false,
            action: PivotAction::Skip,
            written: false,
        });
    };

    let observed: Option<MasterLink> = SessionWorkLeadRepo::find(pool, session.id, work_lead.id)
        .await?
        .map(|row| row.link());
    let action = remove_from_template(observed);
    let written = match action {
        PivotAction::Delete => {
            SessionWorkLeadRepo::delete_observed(pool, session.id, work_lead.id, observed).await?
        }
        _ => false,
    };

    Ok(Step {
        created_work_lead: false,
        action,
        written,
    })
}
