//! Role-scoped user profiles.

use rise_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: UserId,
    pub type_profile_id: DbId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A profile joined with its type name, as listed for the owning user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileSummary {
    pub id: DbId,
    pub type_profile_id: DbId,
    pub type_profile_name: String,
    pub display_name: Option<String>,
}

/// DTO for creating a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub user_id: UserId,
    pub type_profile_id: DbId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}
