//! Repository for the `type_seances` reference table.

use rise_core::types::DbId;
use sqlx::PgPool;

use crate::models::type_seance::TypeSeance;

const COLUMNS: &str = "id, name, is_sailing, is_deleted, created_at, updated_at";

/// Read-only access to session types.
pub struct TypeSeanceRepo;

impl TypeSeanceRepo {
    /// List active session types ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<TypeSeance>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM type_seances WHERE is_deleted = FALSE ORDER BY name");
        sqlx::query_as::<_, TypeSeance>(&query).fetch_all(pool).await
    }

    /// Find an active session type.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TypeSeance>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM type_seances WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, TypeSeance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
