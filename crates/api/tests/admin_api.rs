//! HTTP-level tests for the admin workspace: groups, projects and the
//! work-lead type tree.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, profile, token_for, TestApp};
use rise_core::roles::{PROFILE_TYPE_ADMIN, PROFILE_TYPE_COACH, PROFILE_TYPE_NAVIGANT};
use serde_json::json;
use sqlx::PgPool;

async fn admin_token(pool: &PgPool) -> String {
    token_for(&profile(pool, PROFILE_TYPE_ADMIN).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_lifecycle(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/admin/groups",
        Some(&token),
        json!({ "name": "Pole France" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete(app.router(), &format!("/api/v1/admin/groups/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed = body_json(get(app.router(), "/api/v1/admin/groups", Some(&token)).await).await;
    assert!(listed["data"].as_array().unwrap().iter().all(|g| g["id"] != id));

    let listed = body_json(
        get(
            app.router(),
            "/api/v1/admin/groups?include_deleted=true",
            Some(&token),
        )
        .await,
    )
    .await;
    assert!(listed["data"].as_array().unwrap().iter().any(|g| g["id"] == id));

    let response = post_json(
        app.router(),
        &format!("/api/v1/admin/groups/{id}/restore"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_deleted"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_group_name_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/admin/groups",
        Some(&token),
        json!({ "name": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_coaching_profiles_join_a_group(pool: PgPool) {
    let token = admin_token(&pool).await;
    let coach = profile(&pool, PROFILE_TYPE_COACH).await;
    let navigant = profile(&pool, PROFILE_TYPE_NAVIGANT).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/admin/groups",
        Some(&token),
        json!({ "name": "Groupe Espoir" }),
    )
    .await;
    let group_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.router(),
        &format!("/api/v1/admin/groups/{group_id}/coaches/{}", navigant.id),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.router(),
        &format!("/api/v1/admin/groups/{group_id}/coaches/{}", coach.id),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let coaches = body_json(
        get(
            app.router(),
            &format!("/api/v1/admin/groups/{group_id}/coaches"),
            Some(&token),
        )
        .await,
    )
    .await;
    assert_eq!(coaches["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_owner_must_be_navigant(pool: PgPool) {
    let token = admin_token(&pool).await;
    let coach = profile(&pool, PROFILE_TYPE_COACH).await;
    let navigant = profile(&pool, PROFILE_TYPE_NAVIGANT).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/admin/projects",
        Some(&token),
        json!({ "name": "ILCA 7", "profile_id": coach.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.router(),
        "/api/v1/admin/projects",
        Some(&token),
        json!({ "name": "ILCA 7", "profile_id": navigant.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["profile_id"], navigant.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_work_lead_type_with_children_cannot_be_deleted(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/admin/work-lead-types",
        Some(&token),
        json!({ "name": "Manoeuvres" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let parent = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.router(),
        "/api/v1/admin/work-lead-types",
        Some(&token),
        json!({ "name": "Virement", "parent_id": parent }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let child = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete(
        app.router(),
        &format!("/api/v1/admin/work-lead-types/{parent}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete(
        app.router(),
        &format!("/api/v1/admin/work-lead-types/{child}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete(
        app.router(),
        &format!("/api/v1/admin/work-lead-types/{parent}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The child cannot come back while its parent is deleted.
    let response = post_json(
        app.router(),
        &format!("/api/v1/admin/work-lead-types/{child}/restore"),
        Some(&token),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_type_nesting_is_limited_to_two_levels(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = TestApp::new(pool);

    let parent = body_json(
        post_json(
            app.router(),
            "/api/v1/admin/work-lead-types",
            Some(&token),
            json!({ "name": "Tactique course" }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();
    let child = body_json(
        post_json(
            app.router(),
            "/api/v1/admin/work-lead-types",
            Some(&token),
            json!({ "name": "Depart", "parent_id": parent }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    let response = post_json(
        app.router(),
        "/api/v1/admin/work-lead-types",
        Some(&token),
        json!({ "name": "Ligne", "parent_id": child }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
