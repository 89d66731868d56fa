pub mod admin;
pub mod coach;
pub mod files;
pub mod health;
pub mod me;
pub mod navigant;
pub mod work_lead_masters;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                              identity, profiles, profile switch
///
/// /admin/groups                                    groups, coach and project membership
/// /admin/projects                                  navigant projects
/// /admin/work-lead-types                           work lead type tree
///
/// /work-lead-masters/models                        global template library (super coach)
///
/// /coach/groups/{group_id}                         coached groups
/// /coach/groups/{group_id}/sessions                group sessions and their statuses
/// /coach/groups/{group_id}/work-leads              group templates, import from library
/// /coach/projects/{project_id}                     per-project sessions and work leads
/// /coach/type-seances, /coach/work-lead-types      reference lists
///
/// /navigant/project                                own project
/// /navigant/sessions                               own sessions and statuses
/// /navigant/work-leads                             own work leads
/// /navigant/type-seances, /navigant/work-lead-types reference lists
///
/// /files/upload                                    multipart upload
/// /files/{entity_type}/{entity_id}                 attachments of an entity
/// /files/{file_id}/share                           share to another entity
/// /files/content/{*path}                           signed download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/me", me::router())
        .nest("/admin", admin::router())
        .nest("/work-lead-masters/models", work_lead_masters::router())
        .nest("/coach", coach::router())
        .nest("/navigant", navigant::router())
        .nest("/files", files::router())
}
