//! Navigant workspace route definitions, mounted at `/navigant`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{navigant, work_lead_type};
use crate::state::AppState;

/// ```text
/// GET                /project                                   -> get_project
/// GET, POST          /sessions                                  -> list_sessions, create_session
/// GET, PUT, DELETE   /sessions/{id}                             -> get_session, update_session, delete_session
/// GET                /sessions/{id}/work-leads                  -> list_session_work_leads
/// PUT                /sessions/{id}/work-leads/{wl}/status      -> set_session_work_lead_status
/// GET, POST          /work-leads                                -> list_work_leads, create_work_lead
/// GET, PUT, DELETE   /work-leads/{id}                           -> get_work_lead, update_work_lead, delete_work_lead
/// POST               /work-leads/{id}/archive                   -> archive_work_lead
/// POST               /work-leads/{id}/unarchive                 -> unarchive_work_lead
/// GET                /type-seances                              -> list_type_seances
/// GET                /work-lead-types                           -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/project", get(navigant::get_project))
        .route(
            "/sessions",
            get(navigant::list_sessions).post(navigant::create_session),
        )
        .route(
            "/sessions/{id}",
            get(navigant::get_session)
                .put(navigant::update_session)
                .delete(navigant::delete_session),
        )
        .route(
            "/sessions/{id}/work-leads",
            get(navigant::list_session_work_leads),
        )
        .route(
            "/sessions/{id}/work-leads/{work_lead_id}/status",
            put(navigant::set_session_work_lead_status),
        )
        .route(
            "/work-leads",
            get(navigant::list_work_leads).post(navigant::create_work_lead),
        )
        .route(
            "/work-leads/{id}",
            get(navigant::get_work_lead)
                .put(navigant::update_work_lead)
                .delete(navigant::delete_work_lead),
        )
        .route("/work-leads/{id}/archive", post(navigant::archive_work_lead))
        .route(
            "/work-leads/{id}/unarchive",
            post(navigant::unarchive_work_lead),
        )
        .route("/type-seances", get(work_lead_type::list_type_seances))
        .route("/work-lead-types", get(work_lead_type::list))
}
