//! Coach workspace route definitions, mounted at `/coach`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{coach, work_lead_type};
use crate::state::AppState;

/// ```text
/// GET                /groups                                              -> list_groups
/// GET                /groups/{group_id}                                   -> get_group
/// GET                /groups/{group_id}/projects                          -> list_group_projects
///
/// GET, POST          /groups/{group_id}/sessions                          -> list_sessions, create_session
/// GET, PUT, DELETE   /groups/{group_id}/sessions/{id}                     -> get_session, update_session, delete_session
/// GET                /groups/{group_id}/sessions/{id}/work-leads          -> list_session_work_leads
/// PUT                /groups/{group_id}/sessions/{id}/work-leads/{wlm}/status
///                                                                         -> set_session_work_lead_status
///
/// GET, POST          /groups/{group_id}/work-leads                        -> list_work_leads, create_work_lead
/// POST               /groups/{group_id}/work-leads/import/{template_id}   -> import_work_lead
/// GET, PUT, DELETE   /groups/{group_id}/work-leads/{id}                   -> get_work_lead, update_work_lead, delete_work_lead
/// POST               /groups/{group_id}/work-leads/{id}/archive           -> archive_work_lead
/// POST               /groups/{group_id}/work-leads/{id}/unarchive         -> unarchive_work_lead
/// POST               /groups/{group_id}/work-leads/{id}/restore           -> restore_work_lead
///
/// GET                /projects/{project_id}/sessions                      -> list_project_sessions
/// GET                /projects/{project_id}/work-leads                    -> list_project_work_leads
/// GET                /projects/{project_id}/sessions/{sid}/work-leads     -> list_project_session_work_leads
/// PUT                /projects/{project_id}/sessions/{sid}/work-leads/{wl}/status
///                                                                         -> set_project_work_lead_status
///
/// GET                /type-seances                                        -> list_type_seances
/// GET                /work-lead-types                                     -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(coach::list_groups))
        .route("/groups/{group_id}", get(coach::get_group))
        .route("/groups/{group_id}/projects", get(coach::list_group_projects))
        .route(
            "/groups/{group_id}/sessions",
            get(coach::list_sessions).post(coach::create_session),
        )
        .route(
            "/groups/{group_id}/sessions/{id}",
            get(coach::get_session)
                .put(coach::update_session)
                .delete(coach::delete_session),
        )
        .route(
            "/groups/{group_id}/sessions/{id}/work-leads",
            get(coach::list_session_work_leads),
        )
        .route(
            "/groups/{group_id}/sessions/{id}/work-leads/{work_lead_master_id}/status",
            put(coach::set_session_work_lead_status),
        )
        .route(
            "/groups/{group_id}/work-leads",
            get(coach::list_work_leads).post(coach::create_work_lead),
        )
        .route(
            "/groups/{group_id}/work-leads/import/{template_id}",
            post(coach::import_work_lead),
        )
        .route(
            "/groups/{group_id}/work-leads/{id}",
            get(coach::get_work_lead)
                .put(coach::update_work_lead)
                .delete(coach::delete_work_lead),
        )
        .route(
            "/groups/{group_id}/work-leads/{id}/archive",
            post(coach::archive_work_lead),
        )
        .route(
            "/groups/{group_id}/work-leads/{id}/unarchive",
            post(coach::unarchive_work_lead),
        )
        .route(
            "/groups/{group_id}/work-leads/{id}/restore",
            post(coach::restore_work_lead),
        )
        .route(
            "/projects/{project_id}/sessions",
            get(coach::list_project_sessions),
        )
        .route(
            "/projects/{project_id}/work-leads",
            get(coach::list_project_work_leads),
        )
        .route(
            "/projects/{project_id}/sessions/{session_id}/work-leads",
            get(coach::list_project_session_work_leads),
        )
        .route(
            "/projects/{project_id}/sessions/{session_id}/work-leads/{work_lead_id}/status",
            put(coach::set_project_work_lead_status),
        )
        .route("/type-seances", get(work_lead_type::list_type_seances))
        .route("/work-lead-types", get(work_lead_type::list))
}
