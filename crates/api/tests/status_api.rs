//! HTTP-level tests for status propagation from group templates to project
//! work leads, direct edits, and derived current status.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, first_type_seance, first_work_lead_type, group_template, group_with_projects,
    put_json, token_for, TestApp,
};
use rise_core::types::DbId;
use rise_db::models::session::Session;
use rise_db::repositories::{SessionRepo, SessionWorkLeadRepo, WorkLeadRepo};
use serde_json::json;
use sqlx::PgPool;

async fn create_group_session(app: &TestApp, token: &str, group_id: DbId) -> DbId {
    let type_seance_id = first_type_seance(&app.pool).await;
    let response = common::post_json(
        app.router(),
        &format!("/api/v1/coach/groups/{group_id}/sessions"),
        Some(token),
        json!({ "name": "Entrainement du samedi", "type_seance_id": type_seance_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn set_group_status(
    app: &TestApp,
    token: &str,
    group_id: DbId,
    session_master_id: DbId,
    template_id: DbId,
    status: serde_json::Value,
) -> axum::response::Response {
    put_json(
        app.router(),
        &format!(
            "/api/v1/coach/groups/{group_id}/sessions/{session_master_id}/work-leads/{template_id}/status"
        ),
        Some(token),
        json!({ "status": status }),
    )
    .await
}

async fn session_of(pool: &PgPool, session_master_id: DbId, project_id: DbId) -> Session {
    SessionRepo::list_by_master(pool, session_master_id)
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.project_id == project_id)
        .expect("project should have a session for the group session")
}

/// (status, override_master) of the row linking a project's copy of a
/// template to its session, or `None` if there is no row.
async fn project_row(
    pool: &PgPool,
    session_master_id: DbId,
    project_id: DbId,
    template_id: DbId,
) -> Option<(String, Option<bool>)> {
    let session = session_of(pool, session_master_id, project_id).await;
    let work_lead = WorkLeadRepo::find_by_project_and_master(pool, project_id, template_id)
        .await
        .unwrap()?;
    SessionWorkLeadRepo::find(pool, session.id, work_lead.id)
        .await
        .unwrap()
        .map(|row| (row.status, row.override_master))
}

// ---------------------------------------------------------------------------
// Group sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_session_creates_one_session_per_project(pool: PgPool) {
    let fx = group_with_projects(&pool, 3).await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let type_seance_id = first_type_seance(&pool).await;

    let response = common::post_json(
        app.router(),
        &format!("/api/v1/coach/groups/{}/sessions", fx.group_id),
        Some(&token),
        json!({ "name": "Regate d'entrainement", "type_seance_id": type_seance_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Regate d'entrainement");
    assert_eq!(json["data"]["session_ids"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_group_session_removes_project_sessions(pool: PgPool) {
    let fx = group_with_projects(&pool, 2).await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;

    let response = common::delete(
        app.router(),
        &format!("/api/v1/coach/groups/{}/sessions/{sm}", fx.group_id),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining = SessionRepo::list_by_master(&pool, sm).await.unwrap();
    assert!(remaining.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_coach_outside_group_is_forbidden(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let other = group_with_projects(&pool, 0).await;
    let app = TestApp::new(pool);

    let response = common::get(
        app.router(),
        &format!("/api/v1/coach/groups/{}/sessions", fx.group_id),
        Some(&token_for(&other.coach)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_status_propagates_to_every_project(pool: PgPool) {
    let fx = group_with_projects(&pool, 2).await;
    let template = group_template(&pool, fx.group_id, "Virement de bord").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;

    let response = set_group_status(&app, &token, fx.group_id, sm, template, json!("TODO")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "TODO");
    assert_eq!(json["data"]["work_lead_master_id"], template);

    for &project_id in &fx.project_ids {
        let work_lead = WorkLeadRepo::find_by_project_and_master(&pool, project_id, template)
            .await
            .unwrap()
            .expect("template should be instantiated in the project");
        assert_eq!(work_lead.name, "Virement de bord");
        assert_eq!(
            project_row(&pool, sm, project_id, template).await,
            Some(("TODO".to_string(), Some(false)))
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_setting_status_again_updates_without_duplicates(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let template = group_template(&pool, fx.group_id, "Empannage").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;
    let project_id = fx.project_ids[0];

    set_group_status(&app, &token, fx.group_id, sm, template, json!("TODO")).await;
    let response =
        set_group_status(&app, &token, fx.group_id, sm, template, json!("WORKING")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let copies: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM work_leads WHERE project_id = $1 AND work_lead_master_id = $2",
    )
    .bind(project_id)
    .bind(template)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(copies, 1);

    let session = session_of(&pool, sm, project_id).await;
    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM session_work_leads WHERE session_id = $1")
            .bind(session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(
        project_row(&pool, sm, project_id, template).await,
        Some(("WORKING".to_string(), Some(false)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_direct_edit_overrides_and_survives_propagation(pool: PgPool) {
    let fx = group_with_projects(&pool, 2).await;
    let template = group_template(&pool, fx.group_id, "Depart").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;
    set_group_status(&app, &token, fx.group_id, sm, template, json!("TODO")).await;

    let edited = fx.project_ids[0];
    let untouched = fx.project_ids[1];
    let session = session_of(&pool, sm, edited).await;
    let work_lead = WorkLeadRepo::find_by_project_and_master(&pool, edited, template)
        .await
        .unwrap()
        .unwrap();

    let response = put_json(
        app.router(),
        &format!(
            "/api/v1/coach/projects/{edited}/sessions/{}/work-leads/{}/status",
            session.id, work_lead.id
        ),
        Some(&token),
        json!({ "status": "DANGER" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "DANGER");
    assert_eq!(json["data"]["override_master"], true);

    set_group_status(&app, &token, fx.group_id, sm, template, json!("OK")).await;

    assert_eq!(
        project_row(&pool, sm, edited, template).await,
        Some(("DANGER".to_string(), Some(true)))
    );
    assert_eq!(
        project_row(&pool, sm, untouched, template).await,
        Some(("OK".to_string(), Some(false)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clearing_group_status_removes_only_following_rows(pool: PgPool) {
    let fx = group_with_projects(&pool, 2).await;
    let template = group_template(&pool, fx.group_id, "Bouee au vent").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;
    set_group_status(&app, &token, fx.group_id, sm, template, json!("WORKING")).await;

    let overridden = fx.project_ids[0];
    let following = fx.project_ids[1];
    let session = session_of(&pool, sm, overridden).await;
    let work_lead = WorkLeadRepo::find_by_project_and_master(&pool, overridden, template)
        .await
        .unwrap()
        .unwrap();
    put_json(
        app.router(),
        &format!(
            "/api/v1/coach/projects/{overridden}/sessions/{}/work-leads/{}/status",
            session.id, work_lead.id
        ),
        Some(&token),
        json!({ "status": "OK" }),
    )
    .await;

    let response = set_group_status(&app, &token, fx.group_id, sm, template, json!(null)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].is_null());

    assert_eq!(project_row(&pool, sm, following, template).await, None);
    assert_eq!(
        project_row(&pool, sm, overridden, template).await,
        Some(("OK".to_string(), Some(true)))
    );
}

// ---------------------------------------------------------------------------
// Current status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_current_status_follows_latest_change(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let template = group_template(&pool, fx.group_id, "Reglages").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let uri = format!("/api/v1/coach/groups/{}/work-leads/{template}", fx.group_id);

    let json = body_json(common::get(app.router(), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["current_status"], "NEW");

    let sm = create_group_session(&app, &token, fx.group_id).await;
    set_group_status(&app, &token, fx.group_id, sm, template, json!("DANGER")).await;
    let json = body_json(common::get(app.router(), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["current_status"], "DANGER");

    set_group_status(&app, &token, fx.group_id, sm, template, json!("OK")).await;
    let json = body_json(common::get(app.router(), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["current_status"], "OK");
}

// ---------------------------------------------------------------------------
// Navigant workspace
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_navigant_standalone_status(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.navigants[0]);

    let response = common::post_json(
        app.router(),
        "/api/v1/navigant/sessions",
        Some(&token),
        json!({ "name": "Sortie solo", "type_seance_id": first_type_seance(&pool).await }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = common::post_json(
        app.router(),
        "/api/v1/navigant/work-leads",
        Some(&token),
        json!({ "name": "Gite", "work_lead_type_id": first_work_lead_type(&pool).await }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let work_lead_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.router(),
        &format!("/api/v1/navigant/sessions/{session_id}/work-leads/{work_lead_id}/status"),
        Some(&token),
        json!({ "status": "WORKING" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "WORKING");
    assert!(json["data"]["override_master"].is_null());

    let json = body_json(
        common::get(
            app.router(),
            &format!("/api/v1/navigant/work-leads/{work_lead_id}"),
            Some(&token),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["current_status"], "WORKING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_navigant_without_project_gets_404(pool: PgPool) {
    let navigant = common::profile(&pool, rise_core::roles::PROFILE_TYPE_NAVIGANT).await;
    let app = TestApp::new(pool);

    let response =
        common::get(app.router(), "/api/v1/navigant/project", Some(&token_for(&navigant))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_status_is_rejected_at_both_levels(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let template = group_template(&pool, fx.group_id, "Depart").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;

    let response = set_group_status(&app, &token, fx.group_id, sm, template, json!("todo")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    set_group_status(&app, &token, fx.group_id, sm, template, json!("TODO")).await;
    let project_id = fx.project_ids[0];
    let session = session_of(&pool, sm, project_id).await;
    let work_lead = WorkLeadRepo::find_by_project_and_master(&pool, project_id, template)
        .await
        .unwrap()
        .unwrap();

    let response = put_json(
        app.router(),
        &format!(
            "/api/v1/coach/projects/{project_id}/sessions/{}/work-leads/{}/status",
            session.id, work_lead.id
        ),
        Some(&token),
        json!({ "status": "DONE" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        project_row(&pool, sm, project_id, template).await,
        Some(("TODO".to_string(), Some(false)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_status_body_is_rejected_and_clears_nothing(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let template = group_template(&pool, fx.group_id, "Empannage").await;
    let app = TestApp::new(pool.clone());
    let token = token_for(&fx.coach);
    let sm = create_group_session(&app, &token, fx.group_id).await;
    set_group_status(&app, &token, fx.group_id, sm, template, json!("WORKING")).await;

    let project_id = fx.project_ids[0];
    let session = session_of(&pool, sm, project_id).await;
    let work_lead = WorkLeadRepo::find_by_project_and_master(&pool, project_id, template)
        .await
        .unwrap()
        .unwrap();
    let group_uri = format!(
        "/api/v1/coach/groups/{}/sessions/{sm}/work-leads/{template}/status",
        fx.group_id
    );
    let project_uri = format!(
        "/api/v1/coach/projects/{project_id}/sessions/{}/work-leads/{}/status",
        session.id, work_lead.id
    );

    for uri in [&group_uri, &project_uri] {
        for body in [json!({}), json!({ "stauts": "OK" }), json!({ "status": 5 })] {
            let response = put_json(app.router(), uri, Some(&token), body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
        }
    }

    assert_eq!(
        project_row(&pool, sm, project_id, template).await,
        Some(("WORKING".to_string(), Some(false)))
    );
    let json = body_json(
        common::get(
            app.router(),
            &format!("/api/v1/coach/groups/{}/work-leads/{template}", fx.group_id),
            Some(&token),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["current_status"], "WORKING");
}
