//! Handlers for file attachments (`/api/v1/files`).
//!
//! A file is uploaded once against its origin entity (its "source") and can
//! be shared to other entities through reference rows without copying the
//! blob. Downloads go through time-limited signed URLs served by
//! [`content`].

use std::collections::HashSet;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rise_core::files::{
    clamp_limit, clamp_offset, split_page, storage_path, validate_storage_key, EntityType,
    FileType, ProcessingStatus,
};
use rise_core::signing;
use rise_core::types::DbId;
use rise_db::models::file::{FileRecord, NewFile};
use rise_db::repositories::{FileReferenceRepo, FileRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// A file as returned to clients, with signed download URLs.
#[derive(Debug, Serialize)]
pub struct FileView {
    #[serde(flatten)]
    pub file: FileRecord,
    pub url: String,
    pub thumbnail_url: Option<String>,
    /// Set when the file is seen through a share rather than as a source.
    pub reference_id: Option<DbId>,
}

/// One page of an entity's attachments: sources first, then shares.
#[derive(Debug, Serialize)]
pub struct FilePage {
    pub items: Vec<FileView>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// What deleting a file from an entity would do.
#[derive(Debug, Serialize)]
pub struct DeleteInfo {
    pub file_id: Uuid,
    pub is_source: bool,
    pub has_references: bool,
    pub reference_count: i64,
}

/// An entity given as `?entity_type=&entity_id=`.
#[derive(Debug, Deserialize)]
pub struct EntityParams {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
}

impl EntityParams {
    fn entity(&self) -> AppResult<Option<(EntityType, DbId)>> {
        match (&self.entity_type, self.entity_id) {
            (Some(entity_type), Some(entity_id)) => {
                Ok(Some((EntityType::parse(entity_type)?, entity_id)))
            }
            (None, None) => Ok(None),
            _ => Err(AppError::BadRequest(
                "entity_type and entity_id must be given together".into(),
            )),
        }
    }
}

/// Body of `POST /files/{file_id}/share`.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub entity_type: String,
    pub entity_id: DbId,
}

/// Body of `POST /files/resolve-urls`.
#[derive(Debug, Deserialize)]
pub struct ResolveUrlsRequest {
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedUrl {
    pub path: String,
    pub url: String,
}

/// `?expires=&signature=` on signed download URLs.
#[derive(Debug, Deserialize)]
pub struct SignatureParams {
    pub expires: i64,
    pub signature: String,
}

fn file_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("File {id} not found"))
}

fn sign_path(state: &AppState, path: &str) -> String {
    signing::signed_url(
        &state.config.public_base_url,
        &state.config.signed_url_secret,
        path,
        Utc::now().timestamp(),
        state.config.signed_url_expiry_secs,
    )
}

fn view(state: &AppState, file: FileRecord, reference_id: Option<DbId>) -> FileView {
    let url = sign_path(state, &file.file_path);
    let thumbnail_url = file.thumbnail_path.as_deref().map(|p| sign_path(state, p));
    FileView {
        file,
        url,
        thumbnail_url,
        reference_id,
    }
}

fn is_origin(file: &FileRecord, entity: (EntityType, DbId)) -> bool {
    file.origin_entity_type == entity.0.as_str() && file.origin_entity_id == entity.1
}

async fn load_file(state: &AppState, id: Uuid) -> AppResult<FileRecord> {
    FileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| file_not_found(id))
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// POST /api/v1/files/upload
///
/// Multipart fields: `file`, `origin_entity_type`, `origin_entity_id` and an
/// optional `file_type` overriding detection from the MIME type. Images and
/// videos are queued for processing.
pub async fn upload(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut entity_type: Option<EntityType> = None;
    let mut entity_id: Option<DbId> = None;
    let mut file_type: Option<FileType> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                mime_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                bytes = Some(data.to_vec());
            }
            "origin_entity_type" | "origin_entity_id" | "file_type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let value = value.trim();
                match name.as_str() {
                    "origin_entity_type" => entity_type = Some(EntityType::parse(value)?),
                    "origin_entity_id" => {
                        entity_id = Some(value.parse().map_err(|_| {
                            AppError::BadRequest(format!("Invalid origin_entity_id '{value}'"))
                        })?)
                    }
                    _ if !value.is_empty() => file_type = Some(FileType::parse(value)?),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let entity_type = entity_type
        .ok_or_else(|| AppError::BadRequest("Missing 'origin_entity_type' field".into()))?;
    let entity_id = entity_id
        .ok_or_else(|| AppError::BadRequest("Missing 'origin_entity_id' field".into()))?;
    let file_name = file_name.unwrap_or_else(|| "file".to_string());
    let mime_type = mime_type.filter(|m| !m.is_empty());
    let file_type = file_type.unwrap_or_else(|| FileType::detect(mime_type.as_deref()));

    let id = Uuid::new_v4();
    let path = storage_path(entity_type, entity_id, id, &file_name);
    state.storage.put(&path, &bytes).await?;

    let status = ProcessingStatus::initial_for(file_type);
    let input = NewFile {
        id,
        origin_entity_type: entity_type.as_str().to_string(),
        origin_entity_id: entity_id,
        file_type: file_type.as_str().to_string(),
        file_name,
        file_path: path.clone(),
        file_size: Some(bytes.len() as i64),
        mime_type,
        uploaded_by: user.user_id,
        processing_status: status.as_str().to_string(),
    };
    let mut file = match FileRepo::create(&state.pool, &input).await {
        Ok(file) => file,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&path).await {
                tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        file_id = %file.id,
        entity_type = entity_type.as_str(),
        entity_id,
        file_type = file_type.as_str(),
        size = bytes.len(),
        "File uploaded",
    );

    if status == ProcessingStatus::Pending && !state.media_queue.enqueue(file.id) {
        FileRepo::mark_failed(&state.pool, file.id, "Media processing queue unavailable").await?;
        file = load_file(&state, file.id).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: view(&state, file, None),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// POST /api/v1/files/resolve-urls
pub async fn resolve_urls(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ResolveUrlsRequest>,
) -> AppResult<impl IntoResponse> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(input.paths.len());
    for path in input.paths {
        validate_storage_key(&path)?;
        if seen.insert(path.clone()) {
            let url = sign_path(&state, &path);
            resolved.push(ResolvedUrl { path, url });
        }
    }
    Ok(Json(DataResponse { data: resolved }))
}

/// GET /api/v1/files/info/{file_id}
pub async fn info(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let file = load_file(&state, file_id).await?;
    Ok(Json(DataResponse {
        data: view(&state, file, None),
    }))
}

/// GET /api/v1/files/delete-info/{file_id}?entity_type=&entity_id=
///
/// Without an entity the file is described from its origin.
pub async fn delete_info(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
    Query(params): Query<EntityParams>,
) -> AppResult<impl IntoResponse> {
    let file = load_file(&state, file_id).await?;
    let is_source = match params.entity()? {
        Some(entity) => is_origin(&file, entity),
        None => true,
    };
    let reference_count = FileReferenceRepo::count_for_file(&state.pool, file_id).await?;

    Ok(Json(DataResponse {
        data: DeleteInfo {
            file_id,
            is_source,
            has_references: reference_count > 0,
            reference_count,
        },
    }))
}

/// GET /api/v1/files/{entity_type}/{entity_id}?offset=&limit=
pub async fn list_for_entity(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let entity_type = EntityType::parse(&entity_type)?;
    let offset = clamp_offset(params.offset);
    let limit = clamp_limit(params.limit);

    let sources_count = FileRepo::count_sources(&state.pool, entity_type, entity_id).await?;
    let references_count =
        FileReferenceRepo::count_for_entity(&state.pool, entity_type, entity_id).await?;
    let page = split_page(offset, limit, sources_count);

    let mut items = Vec::new();
    if page.source_take > 0 {
        let sources = FileRepo::list_sources(
            &state.pool,
            entity_type,
            entity_id,
            None,
            page.source_offset,
            Some(page.source_take),
        )
        .await?;
        items.extend(sources.into_iter().map(|f| view(&state, f, None)));
    }
    if page.reference_take > 0 {
        let shared = FileReferenceRepo::list_for_entity(
            &state.pool,
            entity_type,
            entity_id,
            None,
            page.reference_offset,
            Some(page.reference_take),
        )
        .await?;
        items.extend(
            shared
                .into_iter()
                .map(|r| view(&state, r.file, Some(r.reference_id))),
        );
    }

    Ok(Json(DataResponse {
        data: FilePage {
            items,
            total: sources_count + references_count,
            offset,
            limit,
        },
    }))
}

/// GET /api/v1/files/{entity_type}/{entity_id}/images
pub async fn list_images(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let entity_type = EntityType::parse(&entity_type)?;
    let image = Some(FileType::Image.as_str());

    let sources =
        FileRepo::list_sources(&state.pool, entity_type, entity_id, image, 0, None).await?;
    let shared =
        FileReferenceRepo::list_for_entity(&state.pool, entity_type, entity_id, image, 0, None)
            .await?;

    let images: Vec<FileView> = sources
        .into_iter()
        .map(|f| view(&state, f, None))
        .chain(
            shared
                .into_iter()
                .map(|r| view(&state, r.file, Some(r.reference_id))),
        )
        .collect();
    Ok(Json(DataResponse { data: images }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// DELETE /api/v1/files/{file_id}?entity_type=&entity_id=
///
/// From the origin entity (or with no entity given) the blob, its
/// thumbnail, every share and the row are removed. From any other entity
/// only that entity's share is removed.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
    Query(params): Query<EntityParams>,
) -> AppResult<StatusCode> {
    let file = load_file(&state, file_id).await?;

    if let Some(entity) = params.entity()? {
        if !is_origin(&file, entity) {
            let reference = FileReferenceRepo::find(&state.pool, file_id, entity.0, entity.1)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "File {file_id} is not attached to {} {}",
                        entity.0.as_str(),
                        entity.1
                    ))
                })?;
            FileReferenceRepo::delete(&state.pool, reference.id).await?;
            tracing::info!(%file_id, reference_id = reference.id, "File share removed");
            return Ok(StatusCode::NO_CONTENT);
        }
    }

    state.storage.delete(&file.file_path).await?;
    if let Some(thumbnail) = &file.thumbnail_path {
        state.storage.delete(thumbnail).await?;
    }
    FileRepo::delete(&state.pool, file_id).await?;
    tracing::info!(%file_id, user_id = %user.user_id, "File deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/files/{file_id}/share
///
/// Sharing a file with its origin or sharing it twice is rejected.
pub async fn share(
    user: AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
    Json(input): Json<ShareRequest>,
) -> AppResult<impl IntoResponse> {
    let entity_type = EntityType::parse(&input.entity_type)?;
    let file = load_file(&state, file_id).await?;

    if is_origin(&file, (entity_type, input.entity_id)) {
        return Err(AppError::BadRequest(
            "A file cannot be shared with the entity it was uploaded to".into(),
        ));
    }
    if FileReferenceRepo::find(&state.pool, file_id, entity_type, input.entity_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "File {file_id} is already shared with {} {}",
            entity_type.as_str(),
            input.entity_id
        )));
    }

    let reference = FileReferenceRepo::create(
        &state.pool,
        file_id,
        entity_type,
        input.entity_id,
        user.user_id,
    )
    .await?;
    tracing::info!(
        %file_id,
        reference_id = reference.id,
        entity_type = entity_type.as_str(),
        entity_id = input.entity_id,
        "File shared",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: reference })))
}

// ---------------------------------------------------------------------------
// Signed download
// ---------------------------------------------------------------------------

/// GET /api/v1/files/content/{*path}?expires=&signature=
///
/// Unauthenticated: the signature is the credential.
pub async fn content(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<SignatureParams>,
) -> AppResult<Response> {
    validate_storage_key(&path)?;
    signing::verify(
        &state.config.signed_url_secret,
        &path,
        params.expires,
        &params.signature,
        Utc::now().timestamp(),
    )?;

    let bytes = state.storage.get(&path).await?;
    let content_type = match FileRepo::find_by_path(&state.pool, &path).await? {
        Some(file) => file
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        None if path.ends_with(".jpg") => "image/jpeg".to_string(),
        None => "application/octet-stream".to_string(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| AppError::InternalError(e.to_string()))
}
