//! Profile type constants and role-check predicates.
//!
//! The ids must match the seed data in `20250101000001_reference_tables.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const PROFILE_TYPE_ADMIN: DbId = 1;
pub const PROFILE_TYPE_SUPER_COACH: DbId = 2;
pub const PROFILE_TYPE_COACH: DbId = 3;
pub const PROFILE_TYPE_NAVIGANT: DbId = 4;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_COACH: &str = "super_coach";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_NAVIGANT: &str = "navigant";

/// The role a profile grants once the user has switched into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileRole {
    Admin,
    SuperCoach,
    Coach,
    Navigant,
}

impl ProfileRole {
    /// Map a `type_profiles.id` to a role.
    pub fn from_type_id(type_id: DbId) -> Result<Self, CoreError> {
        match type_id {
            PROFILE_TYPE_ADMIN => Ok(Self::Admin),
            PROFILE_TYPE_SUPER_COACH => Ok(Self::SuperCoach),
            PROFILE_TYPE_COACH => Ok(Self::Coach),
            PROFILE_TYPE_NAVIGANT => Ok(Self::Navigant),
            other => Err(CoreError::Forbidden(format!(
                "Unknown profile type {other}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::SuperCoach => ROLE_SUPER_COACH,
            Self::Coach => ROLE_COACH,
            Self::Navigant => ROLE_NAVIGANT,
        }
    }

    /// Super-coaches run group workspaces exactly like coaches.
    pub fn can_coach(self) -> bool {
        matches!(self, Self::Coach | Self::SuperCoach)
    }
}

/// Reject unless `role` is one of `allowed`.
pub fn require_one_of(role: ProfileRole, allowed: &[ProfileRole]) -> Result<(), CoreError> {
    if allowed.contains(&role) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(|r| r.name()).collect();
    Err(CoreError::Forbidden(format!(
        "Access denied: requires one of {}",
        names.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn type_ids_map_to_roles() {
        assert_eq!(ProfileRole::from_type_id(1).unwrap(), ProfileRole::Admin);
        assert_eq!(ProfileRole::from_type_id(2).unwrap(), ProfileRole::SuperCoach);
        assert_eq!(ProfileRole::from_type_id(3).unwrap(), ProfileRole::Coach);
        assert_eq!(ProfileRole::from_type_id(4).unwrap(), ProfileRole::Navigant);
    }

    #[test]
    fn unknown_type_is_forbidden() {
        assert_matches!(ProfileRole::from_type_id(9), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn super_coach_can_coach() {
        assert!(ProfileRole::SuperCoach.can_coach());
        assert!(ProfileRole::Coach.can_coach());
        assert!(!ProfileRole::Navigant.can_coach());
        assert!(!ProfileRole::Admin.can_coach());
    }

    #[test]
    fn require_one_of_lists_allowed_roles() {
        let err = require_one_of(ProfileRole::Navigant, &[ProfileRole::Admin]).unwrap_err();
        assert!(err.to_string().contains("admin"));
        assert!(require_one_of(ProfileRole::Admin, &[ProfileRole::Admin]).is_ok());
    }
}
