//! Work-lead type taxonomy rules.
//!
//! Types nest at most one level: a type is either a root or a child of a
//! root. The schema cannot express this, so it is checked on every write.

use crate::error::CoreError;
use crate::types::DbId;

/// What the write path knows about the requested parent type.
#[derive(Debug, Clone, Copy)]
pub struct ParentCandidate {
    pub id: DbId,
    /// The candidate's own parent, if it has one.
    pub parent_id: Option<DbId>,
}

/// Validate a type's parent assignment.
///
/// - `type_id` is `None` on create.
/// - `has_children` tells whether the type being written already has children.
pub fn validate_parent(
    type_id: Option<DbId>,
    parent: Option<ParentCandidate>,
    has_children: bool,
) -> Result<(), CoreError> {
    let Some(parent) = parent else {
        return Ok(());
    };

    if type_id == Some(parent.id) {
        return Err(CoreError::Validation(
            "A work-lead type cannot be its own parent".into(),
        ));
    }
    if parent.parent_id.is_some() {
        return Err(CoreError::Validation(format!(
            "Work-lead type {} is already a child type and cannot be used as a parent",
            parent.id
        )));
    }
    if has_children {
        return Err(CoreError::Validation(
            "A work-lead type with children cannot itself be given a parent".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn root(id: DbId) -> Option<ParentCandidate> {
        Some(ParentCandidate { id, parent_id: None })
    }

    #[test]
    fn root_types_are_always_valid() {
        assert!(validate_parent(None, None, false).is_ok());
        assert!(validate_parent(Some(4), None, true).is_ok());
    }

    #[test]
    fn child_of_root_is_valid() {
        assert!(validate_parent(None, root(1), false).is_ok());
        assert!(validate_parent(Some(7), root(1), false).is_ok());
    }

    #[test]
    fn grandchild_is_rejected() {
        let parent = Some(ParentCandidate {
            id: 2,
            parent_id: Some(1),
        });
        assert_matches!(validate_parent(None, parent, false), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parent_with_children_cannot_become_child() {
        assert_matches!(
            validate_parent(Some(3), root(1), true),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn self_parent_is_rejected() {
        assert_matches!(
            validate_parent(Some(1), root(1), false),
            Err(CoreError::Validation(_))
        );
    }
}
