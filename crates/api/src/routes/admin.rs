//! Admin route definitions, mounted at `/admin`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, work_lead_type};
use crate::state::AppState;

/// ```text
/// GET, POST          /groups                                  -> list_groups, create_group
/// GET, PUT, DELETE   /groups/{id}                             -> get_group, update_group, delete_group
/// POST               /groups/{id}/restore                     -> restore_group
/// GET                /groups/{id}/coaches                     -> list_group_coaches
/// POST, DELETE       /groups/{id}/coaches/{profile_id}        -> add_group_coach, remove_group_coach
/// GET                /groups/{id}/projects                    -> list_group_projects
/// POST, DELETE       /groups/{id}/projects/{project_id}       -> add_group_project, remove_group_project
///
/// GET, POST          /projects                                -> list_projects, create_project
/// GET, PUT, DELETE   /projects/{id}                           -> get_project, update_project, delete_project
/// POST               /projects/{id}/restore                   -> restore_project
///
/// GET, POST          /work-lead-types                         -> admin_list, create
/// GET, PUT, DELETE   /work-lead-types/{id}                    -> get_by_id, update, delete
/// POST               /work-lead-types/{id}/restore            -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(admin::list_groups).post(admin::create_group))
        .route(
            "/groups/{id}",
            get(admin::get_group)
                .put(admin::update_group)
                .delete(admin::delete_group),
        )
        .route("/groups/{id}/restore", post(admin::restore_group))
        .route("/groups/{id}/coaches", get(admin::list_group_coaches))
        .route(
            "/groups/{id}/coaches/{profile_id}",
            post(admin::add_group_coach).delete(admin::remove_group_coach),
        )
        .route("/groups/{id}/projects", get(admin::list_group_projects))
        .route(
            "/groups/{id}/projects/{project_id}",
            post(admin::add_group_project).delete(admin::remove_group_project),
        )
        .route(
            "/projects",
            get(admin::list_projects).post(admin::create_project),
        )
        .route(
            "/projects/{id}",
            get(admin::get_project)
                .put(admin::update_project)
                .delete(admin::delete_project),
        )
        .route("/projects/{id}/restore", post(admin::restore_project))
        .route(
            "/work-lead-types",
            get(work_lead_type::admin_list).post(work_lead_type::create),
        )
        .route(
            "/work-lead-types/{id}",
            get(work_lead_type::get_by_id)
                .put(work_lead_type::update)
                .delete(work_lead_type::delete),
        )
        .route("/work-lead-types/{id}/restore", post(work_lead_type::restore))
}
