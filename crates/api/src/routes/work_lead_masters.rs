//! Global template library routes, mounted at `/work-lead-masters/models`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work_lead_master;
use crate::state::AppState;

/// ```text
/// GET, POST          /                  -> list_models, create_model
/// GET, PUT, DELETE   /{id}              -> get_model, update_model, delete_model
/// POST               /{id}/restore      -> restore_model
/// POST               /{id}/archive      -> archive_model
/// POST               /{id}/unarchive    -> unarchive_model
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(work_lead_master::list_models).post(work_lead_master::create_model),
        )
        .route(
            "/{id}",
            get(work_lead_master::get_model)
                .put(work_lead_master::update_model)
                .delete(work_lead_master::delete_model),
        )
        .route("/{id}/restore", post(work_lead_master::restore_model))
        .route("/{id}/archive", post(work_lead_master::archive_model))
        .route("/{id}/unarchive", post(work_lead_master::unarchive_model))
}
