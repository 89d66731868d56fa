//! Repository for the per-project status pivot `session_work_leads`.

use rise_core::propagation::{MasterLink, PivotAction};
use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::pivot::{SessionWorkLead, SessionWorkLeadEntry};

const COLUMNS: &str = "id, session_id, work_lead_id, status, override_master, profile_id, \
                       created_at, updated_at";

/// Provides status operations on (session, work lead) pairs.
pub struct SessionWorkLeadRepo;

impl SessionWorkLeadRepo {
    /// Find the row of a pair.
    pub async fn find(
        pool: &PgPool,
        session_id: DbId,
        work_lead_id: DbId,
    ) -> Result<Option<SessionWorkLead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_work_leads
             WHERE session_id = $1 AND work_lead_id = $2"
        );
        sqlx::query_as::<_, SessionWorkLead>(&query)
            .bind(session_id)
            .bind(work_lead_id)
            .fetch_optional(pool)
            .await
    }

    /// Carry out a decided [`PivotAction`] on a pair.
    ///
    /// `observed` is the link the decision was taken from (`None` when no
    /// row existed). Updates and deletes only touch a row still carrying that
    /// link, and inserts never replace a row created meanwhile, so a
    /// concurrent edit is not clobbered. Returns `true` if a row was written.
    pub async fn execute(
        pool: &PgPool,
        session_id: DbId,
        work_lead_id: DbId,
        observed: Option<MasterLink>,
        action: PivotAction,
        profile_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let observed_column = observed.and_then(MasterLink::to_column);
        let result = match action {
            PivotAction::Skip => return Ok(false),
            PivotAction::Insert { status, link } => {
                sqlx::query(
                    "INSERT INTO session_work_leads
                        (session_id, work_lead_id, status, override_master, profile_id)
                     VALUES ($1, $2, $3, $4, $5)
                     ON CONFLICT (session_id, work_lead_id) DO NOTHING",
                )
                .bind(session_id)
                .bind(work_lead_id)
                .bind(status.as_str())
                .bind(link.to_column())
                .bind(profile_id)
                .execute(pool)
                .await?
            }
            PivotAction::Update { status, link } => {
                sqlx::query(
                    "UPDATE session_work_leads
                     SET status = $3, override_master = $4, profile_id = $5, updated_at = NOW()
                     WHERE session_id = $1 AND work_lead_id = $2
                       AND override_master IS NOT DISTINCT FROM $6",
                )
                .bind(session_id)
                .bind(work_lead_id)
                .bind(status.as_str())
                .bind(link.to_column())
                .bind(profile_id)
                .bind(observed_column)
                .execute(pool)
                .await?
            }
            PivotAction::Delete => {
                return Self::delete_observed(pool, session_id, work_lead_id, observed).await;
            }
        };
        Ok(result.rows_affected() > 0)
    }

    /// Delete a pair's row if it still carries the observed link.
    pub async fn delete_observed(
        pool: &PgPool,
        session_id: DbId,
        work_lead_id: DbId,
        observed: Option<MasterLink>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM session_work_leads
             WHERE session_id = $1 AND work_lead_id = $2
               AND override_master IS NOT DISTINCT FROM $3",
        )
        .bind(session_id)
        .bind(work_lead_id)
        .bind(observed.and_then(MasterLink::to_column))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the statuses set in a session, with work-lead names.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<SessionWorkLeadEntry>, sqlx::Error> {
        sqlx::query_as::<_, SessionWorkLeadEntry>(
            "SELECT x.work_lead_id, w.name AS work_lead_name, w.work_lead_master_id,
                    w.work_lead_type_id, t.name AS work_lead_type_name,
                    x.status, x.override_master, x.profile_id, x.updated_at
             FROM session_work_leads x
             JOIN work_leads w ON w.id = x.work_lead_id
             LEFT JOIN work_lead_types t ON t.id = w.work_lead_type_id
             WHERE x.session_id = $1 AND w.is_deleted = FALSE
             ORDER BY t.name NULLS LAST, w.name, w.id",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
