//! Repository for the template-level status pivot
//! `session_master_work_lead_masters`.

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::pivot::{SessionMasterWorkLeadEntry, SessionMasterWorkLeadMaster};

const COLUMNS: &str =
    "id, session_master_id, work_lead_master_id, status, profile_id, created_at, updated_at";

/// Provides status operations on (session master, template) pairs.
pub struct SessionMasterWorkLeadMasterRepo;

impl SessionMasterWorkLeadMasterRepo {
    /// Set the status of a pair, creating the row if needed.
    ///
    /// Uses `ON CONFLICT DO UPDATE` on the unique pair; the acting profile
    /// and `updated_at` are refreshed on every write.
    pub async fn upsert(
        pool: &PgPool,
        session_master_id: DbId,
        work_lead_master_id: DbId,
        status: &str,
        profile_id: DbId,
    ) -> Result<SessionMasterWorkLeadMaster, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_master_work_lead_masters
                (session_master_id, work_lead_master_id, status, profile_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (session_master_id, work_lead_master_id)
             DO UPDATE SET status = EXCLUDED.status,
                           profile_id = EXCLUDED.profile_id,
                           updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionMasterWorkLeadMaster>(&query)
            .bind(session_master_id)
            .bind(work_lead_master_id)
            .bind(status)
            .bind(profile_id)
            .fetch_one(pool)
            .await
    }

    /// Delete the row of a pair. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        session_master_id: DbId,
        work_lead_master_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM session_master_work_lead_masters
             WHERE session_master_id = $1 AND work_lead_master_id = $2",
        )
        .bind(session_master_id)
        .bind(work_lead_master_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the statuses set on a group session, with template names.
    pub async fn list_for_session_master(
        pool: &PgPool,
        session_master_id: DbId,
    ) -> Result<Vec<SessionMasterWorkLeadEntry>, sqlx::Error> {
        sqlx::query_as::<_, SessionMasterWorkLeadEntry>(
            "SELECT x.work_lead_master_id, m.name AS work_lead_master_name,
                    m.work_lead_type_id, t.name AS work_lead_type_name,
                    x.status, x.profile_id, x.updated_at
             FROM session_master_work_lead_masters x
             JOIN work_lead_masters m ON m.id = x.work_lead_master_id
             LEFT JOIN work_lead_types t ON t.id = m.work_lead_type_id
             WHERE x.session_master_id = $1 AND m.is_deleted = FALSE
             ORDER BY t.name NULLS LAST, m.name, m.id",
        )
        .bind(session_master_id)
        .fetch_all(pool)
        .await
    }
}
