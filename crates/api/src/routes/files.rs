//! File attachment routes, mounted at `/files`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// The first path segment is shared by file ids and entity types, so every
/// route names it `{key}`.
///
/// ```text
/// POST     /upload                       -> upload (multipart)
/// POST     /resolve-urls                 -> resolve_urls
/// GET      /info/{file_id}               -> info
/// GET      /delete-info/{file_id}        -> delete_info
/// GET      /content/{*path}              -> content (signed, no auth)
/// DELETE   /{file_id}                    -> delete
/// POST     /{file_id}/share              -> share
/// GET      /{entity_type}/{entity_id}    -> list_for_entity
/// GET      /{entity_type}/{entity_id}/images -> list_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(files::upload).layer(DefaultBodyLimit::max(files::MAX_UPLOAD_BYTES)),
        )
        .route("/resolve-urls", post(files::resolve_urls))
        .route("/info/{file_id}", get(files::info))
        .route("/delete-info/{file_id}", get(files::delete_info))
        .route("/content/{*path}", get(files::content))
        .route("/{key}", delete(files::delete))
        .route("/{key}/share", post(files::share))
        .route("/{key}/{entity_id}", get(files::list_for_entity))
        .route("/{key}/{entity_id}/images", get(files::list_images))
}
