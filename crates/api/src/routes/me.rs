//! Route definitions for the caller's identity, mounted at `/me`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// ```text
/// GET    /                               -> me
/// GET    /profiles                       -> list_profiles
/// POST   /profiles/switch/{profile_id}   -> switch_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::me))
        .route("/profiles", get(me::list_profiles))
        .route("/profiles/switch/{profile_id}", post(me::switch_profile))
}
