//! HTTP-level tests for token validation, profile resolution and RBAC.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, get, post_json, profile, profile_for_user, token_for, token_for_user, TestApp};
use rise_core::roles::{PROFILE_TYPE_ADMIN, PROFILE_TYPE_COACH, PROFILE_TYPE_NAVIGANT};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_returns_401(pool: PgPool) {
    let app = TestApp::new(pool);
    let response = get(app.router(), "/api/v1/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_garbage_token_returns_401(pool: PgPool) {
    let app = TestApp::new(pool);
    let response = get(app.router(), "/api/v1/me", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_bearer_scheme_returns_401(pool: PgPool) {
    let app = TestApp::new(pool);
    let request = Request::get("/api/v1/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app.router(), request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_without_profile_is_forbidden(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = token_for_user(Uuid::new_v4(), None);
    let response = get(app.router(), "/api/v1/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_reports_claimed_profile(pool: PgPool) {
    let coach = profile(&pool, PROFILE_TYPE_COACH).await;
    let app = TestApp::new(pool);

    let response = get(app.router(), "/api/v1/me", Some(&token_for(&coach))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "coach");
    assert_eq!(json["data"]["profile"]["id"], coach.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_profile_is_used_without_claim(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let first = profile_for_user(&pool, user_id, PROFILE_TYPE_NAVIGANT).await;
    profile_for_user(&pool, user_id, PROFILE_TYPE_COACH).await;
    let app = TestApp::new(pool);

    let json = body_json(
        get(app.router(), "/api/v1/me", Some(&token_for_user(user_id, None))).await,
    )
    .await;
    assert_eq!(json["data"]["profile"]["id"], first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_switched_profile_wins_over_token_claim(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let navigant = profile_for_user(&pool, user_id, PROFILE_TYPE_NAVIGANT).await;
    let coach = profile_for_user(&pool, user_id, PROFILE_TYPE_COACH).await;
    let app = TestApp::new(pool);
    let token = token_for(&navigant);

    let response = post_json(
        app.router(),
        &format!("/api/v1/me/profiles/switch/{}", coach.id),
        Some(&token),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "coach");

    let json = body_json(get(app.router(), "/api/v1/me/profiles", Some(&token)).await).await;
    assert_eq!(json["data"]["active_profile_id"], coach.id);
    assert_eq!(json["data"]["profiles"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_switching_to_foreign_profile_returns_404(pool: PgPool) {
    let mine = profile(&pool, PROFILE_TYPE_NAVIGANT).await;
    let theirs = profile(&pool, PROFILE_TYPE_ADMIN).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        &format!("/api/v1/me/profiles/switch/{}", theirs.id),
        Some(&token_for(&mine)),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_list_without_profiles_is_empty(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = token_for_user(Uuid::new_v4(), None);

    let response = get(app.router(), "/api/v1/me/profiles", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["active_profile_id"].is_null());
    assert!(json["data"]["profiles"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_navigant_cannot_reach_coach_or_admin_routes(pool: PgPool) {
    let navigant = profile(&pool, PROFILE_TYPE_NAVIGANT).await;
    let app = TestApp::new(pool);
    let token = token_for(&navigant);

    for uri in ["/api/v1/coach/groups", "/api/v1/admin/groups", "/api/v1/work-lead-masters/models"] {
        let response = get(app.router(), uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_coach_cannot_use_navigant_workspace(pool: PgPool) {
    let coach = profile(&pool, PROFILE_TYPE_COACH).await;
    let app = TestApp::new(pool);

    let response = get(app.router(), "/api/v1/navigant/project", Some(&token_for(&coach))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reference_lists_are_open_to_both_workspaces(pool: PgPool) {
    let coach = profile(&pool, PROFILE_TYPE_COACH).await;
    let navigant = profile(&pool, PROFILE_TYPE_NAVIGANT).await;
    let app = TestApp::new(pool);

    let response = get(
        app.router(),
        "/api/v1/coach/type-seances",
        Some(&token_for(&coach)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = get(
        app.router(),
        "/api/v1/navigant/work-lead-types",
        Some(&token_for(&navigant)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
