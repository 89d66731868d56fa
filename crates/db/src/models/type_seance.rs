//! Session-type reference table.

use rise_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `type_seances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TypeSeance {
    pub id: DbId,
    pub name: String,
    pub is_sailing: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
