//! Domain errors shared by the repositories, the status engine and the
//! HTTP layer.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row keyed by a `DbId` (group, session, work lead, template...) is
    /// missing, soft-deleted, or outside the caller's scope.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input, including an unknown work-lead status.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The operation clashes with existing data, e.g. deleting a work-lead
    /// type that still has children.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable bearer token.
    #[error("Unauthenticated: {0}")]
    Unauthorized(String),

    /// Authenticated, but the active profile may not act here.
    #[error("Forbidden for the active profile: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
