//! Shared helpers for HTTP-level integration tests.
//!
//! Requests go through [`tower::ServiceExt::oneshot`] on the full router,
//! middleware included, without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use rise_api::auth::jwt::{Claims, JwtConfig};
use rise_api::background::media::{MediaJob, MediaQueue};
use rise_api::config::ServerConfig;
use rise_api::router::build_app_router;
use rise_api::state::AppState;
use rise_api::storage::LocalObjectStore;
use rise_core::roles::{PROFILE_TYPE_COACH, PROFILE_TYPE_NAVIGANT};
use rise_core::types::DbId;
use rise_db::models::group::CreateGroup;
use rise_db::models::profile::{CreateProfile, Profile};
use rise_db::models::project::CreateProject;
use rise_db::models::work_lead_master::CreateWorkLeadMaster;
use rise_db::repositories::{GroupRepo, ProfileRepo, ProjectRepo, WorkLeadMasterRepo};
use sqlx::PgPool;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

pub fn test_config(storage_root: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        storage_root: storage_root.to_string(),
        signed_url_secret: TEST_SIGNING_SECRET.to_string(),
        signed_url_expiry_secs: 3600,
        media_queue_capacity: 16,
        public_base_url: String::new(),
    }
}

/// The application under test plus handles on its storage and media queue.
///
/// Jobs are left in `media_jobs` so tests decide when (and whether) to run
/// them.
pub struct TestApp {
    pub pool: PgPool,
    pub storage: Arc<LocalObjectStore>,
    pub media_jobs: mpsc::Receiver<MediaJob>,
    router: Router,
    _storage_root: TempDir,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let storage_root = tempfile::tempdir().expect("tempdir");
        let config = test_config(&storage_root.path().to_string_lossy());
        let storage = Arc::new(LocalObjectStore::new(storage_root.path()));
        let (media_queue, media_jobs) = MediaQueue::channel(config.media_queue_capacity);

        let state = AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            storage: storage.clone(),
            media_queue,
        };

        Self {
            pool,
            storage,
            media_jobs,
            router: build_app_router(state, &config),
            _storage_root: storage_root,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token_for_user(user_id: Uuid, active_profile_id: Option<DbId>) -> String {
    let claims = Claims {
        sub: user_id,
        email: Some(format!("{user_id}@example.com")),
        active_profile_id,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("encoding should succeed")
}

/// Token acting as `profile`.
pub fn token_for(profile: &Profile) -> String {
    token_for_user(profile.user_id, Some(profile.id))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(app, builder(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(
        app,
        builder(Method::DELETE, uri, token).body(Body::empty()).unwrap(),
    )
    .await
}

async fn with_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let request = builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    with_json(app, Method::POST, uri, token, body).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    with_json(app, Method::PUT, uri, token, body).await
}

/// POST a multipart upload with one `file` part and the given text fields.
pub async fn upload(
    app: Router,
    token: &str,
    fields: &[(&str, &str)],
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response {
    let boundary = "rise-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = builder(Method::POST, "/api/v1/files/upload", Some(token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn profile(pool: &PgPool, type_profile_id: DbId) -> Profile {
    profile_for_user(pool, Uuid::new_v4(), type_profile_id).await
}

pub async fn profile_for_user(pool: &PgPool, user_id: Uuid, type_profile_id: DbId) -> Profile {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id,
            type_profile_id,
            display_name: Some(format!("profile-{type_profile_id}")),
            email: None,
        },
    )
    .await
    .unwrap()
}

pub async fn first_type_seance(pool: &PgPool) -> DbId {
    sqlx::query_scalar("SELECT id FROM type_seances ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn first_work_lead_type(pool: &PgPool) -> DbId {
    sqlx::query_scalar("SELECT id FROM work_lead_types ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// A group with one coach and one navigant project per entry of `navigants`.
pub struct GroupFixture {
    pub group_id: DbId,
    pub coach: Profile,
    pub navigants: Vec<Profile>,
    pub project_ids: Vec<DbId>,
}

pub async fn group_with_projects(pool: &PgPool, projects: usize) -> GroupFixture {
    let group = GroupRepo::create(
        pool,
        &CreateGroup {
            name: "Groupe Elite".into(),
            description: None,
            type_support_id: None,
        },
    )
    .await
    .unwrap();

    let coach = profile(pool, PROFILE_TYPE_COACH).await;
    GroupRepo::add_coach(pool, group.id, coach.id).await.unwrap();

    let mut navigants = Vec::new();
    let mut project_ids = Vec::new();
    for i in 0..projects {
        let navigant = profile(pool, PROFILE_TYPE_NAVIGANT).await;
        let project = ProjectRepo::create(
            pool,
            &CreateProject {
                name: format!("Projet {i}"),
                description: None,
                profile_id: navigant.id,
                type_support_id: None,
                location: None,
            },
        )
        .await
        .unwrap();
        GroupRepo::add_project(pool, group.id, project.id).await.unwrap();
        navigants.push(navigant);
        project_ids.push(project.id);
    }

    GroupFixture {
        group_id: group.id,
        coach,
        navigants,
        project_ids,
    }
}

pub async fn group_template(pool: &PgPool, group_id: DbId, name: &str) -> DbId {
    WorkLeadMasterRepo::create(
        pool,
        Some(group_id),
        &CreateWorkLeadMaster {
            name: name.into(),
            work_lead_type_id: first_work_lead_type(pool).await,
            content: Some("Consignes".into()),
        },
    )
    .await
    .unwrap()
    .id
}
