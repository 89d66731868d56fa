//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod file;
pub mod group;
pub mod pivot;
pub mod profile;
pub mod project;
pub mod session;
pub mod session_master;
pub mod type_seance;
pub mod work_lead;
pub mod work_lead_master;
pub mod work_lead_type;

use serde::{Deserialize, Deserializer};

/// Deserialize a field where an explicit `null` means "clear" and an absent
/// field means "leave unchanged".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
