//! Integration tests for entity lifecycles: group session fan-out,
//! soft delete, archive, template import and the type taxonomy.

mod common;

use rise_core::files::EntityType;
use rise_db::models::file::NewFile;
use rise_db::models::work_lead_master::{CreateWorkLeadMaster, WorkLeadMasterFilter};
use rise_db::models::work_lead_type::{CreateWorkLeadType, UpdateWorkLeadType};
use rise_db::repositories::{
    FileReferenceRepo, FileRepo, GroupRepo, SessionMasterRepo, SessionRepo, WorkLeadMasterRepo,
    WorkLeadRepo, WorkLeadTypeRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

use common::{group_template, group_with_projects, session_master_input};

// ---------------------------------------------------------------------------
// Group sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_session_creates_one_session_per_project(pool: PgPool) {
    let fx = group_with_projects(&pool, 3).await;
    let input = session_master_input(&pool, "Stage hiver").await;

    let (master, sessions) =
        SessionMasterRepo::create_for_group(&pool, fx.group_id, fx.coach.id, &input)
            .await
            .unwrap();
    assert_eq!(master.group_id, Some(fx.group_id));
    assert_eq!(master.coach_id, Some(fx.coach.id));
    assert_eq!(sessions.len(), 3);

    let linked = SessionRepo::list_by_master(&pool, master.id).await.unwrap();
    let mut projects: Vec<_> = linked.iter().map(|s| s.project_id).collect();
    projects.sort();
    assert_eq!(projects, fx.project_ids);
    assert!(linked.iter().all(|s| s.name == "Stage hiver"));

    let group = GroupRepo::find_by_id(&pool, fx.group_id).await.unwrap().unwrap();
    assert_eq!(group.sessions_count, 1);
    assert_eq!(group.projects_count, 3);
    assert_eq!(group.coaches_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_group_session_deletes_linked_sessions(pool: PgPool) {
    let fx = group_with_projects(&pool, 2).await;
    let input = session_master_input(&pool, "Regate").await;
    let (master, _) = SessionMasterRepo::create_for_group(&pool, fx.group_id, fx.coach.id, &input)
        .await
        .unwrap();

    assert!(SessionMasterRepo::soft_delete_with_sessions(&pool, fx.group_id, master.id)
        .await
        .unwrap());
    assert!(SessionRepo::list_by_master(&pool, master.id).await.unwrap().is_empty());
    assert!(SessionMasterRepo::find_in_group(&pool, fx.group_id, master.id)
        .await
        .unwrap()
        .is_none());

    // Second delete is a no-op.
    assert!(!SessionMasterRepo::soft_delete_with_sessions(&pool, fx.group_id, master.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_master_is_scoped_to_its_group(pool: PgPool) {
    let a = group_with_projects(&pool, 1).await;
    let b = group_with_projects(&pool, 1).await;
    let input = session_master_input(&pool, "A only").await;
    let (master, _) = SessionMasterRepo::create_for_group(&pool, a.group_id, a.coach.id, &input)
        .await
        .unwrap();

    assert!(SessionMasterRepo::find_in_group(&pool, b.group_id, master.id)
        .await
        .unwrap()
        .is_none());
    assert!(!GroupRepo::is_coach(&pool, b.group_id, a.coach.id).await.unwrap());
    assert!(GroupRepo::coaches_project(&pool, a.coach.id, a.project_ids[0])
        .await
        .unwrap());
    assert!(!GroupRepo::coaches_project(&pool, a.coach.id, b.project_ids[0])
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archive_is_idempotent_and_listing_filters(pool: PgPool) {
    let fx = group_with_projects(&pool, 0).await;
    let wlm = group_template(&pool, fx.group_id, "Archivable").await;
    let scope = Some(fx.group_id);

    assert!(WorkLeadMasterRepo::set_archived(&pool, scope, wlm, true).await.unwrap());
    assert!(!WorkLeadMasterRepo::set_archived(&pool, scope, wlm, true).await.unwrap());

    let visible = WorkLeadMasterRepo::list(&pool, scope, WorkLeadMasterFilter::default())
        .await
        .unwrap();
    assert!(visible.is_empty());

    let all = WorkLeadMasterRepo::list(
        &pool,
        scope,
        WorkLeadMasterFilter {
            include_archived: true,
            include_deleted: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 1);

    assert!(WorkLeadMasterRepo::set_archived(&pool, scope, wlm, false).await.unwrap());
    // Group templates are invisible from the global scope.
    assert!(WorkLeadMasterRepo::find_in_scope(&pool, None, wlm, true)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_global_template_shares_attachments(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let global = WorkLeadMasterRepo::create(
        &pool,
        None,
        &CreateWorkLeadMaster {
            name: "Modele".into(),
            work_lead_type_id: common::first_work_lead_type(&pool).await,
            content: Some("Texte".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(global.group_id, None);

    let uploader = Uuid::new_v4();
    let file_id = Uuid::new_v4();
    FileRepo::create(
        &pool,
        &NewFile {
            id: file_id,
            origin_entity_type: EntityType::WorkLeadMaster.as_str().into(),
            origin_entity_id: global.id,
            file_type: "document".into(),
            file_name: "plan.pdf".into(),
            file_path: format!("work_lead_master/{}/{file_id}_plan.pdf", global.id),
            file_size: Some(10),
            mime_type: Some("application/pdf".into()),
            uploaded_by: uploader,
            processing_status: "ready".into(),
        },
    )
    .await
    .unwrap();

    let copy = WorkLeadMasterRepo::import_into_group(&pool, fx.group_id, global.id, uploader)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.group_id, Some(fx.group_id));
    assert_eq!(copy.name, "Modele");

    let shared = FileReferenceRepo::list_for_entity(
        &pool,
        EntityType::WorkLeadMaster,
        copy.id,
        None,
        0,
        None,
    )
    .await
    .unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].file.id, file_id);

    // Instantiating the group copy on a project carries the shared file along.
    let wl = WorkLeadRepo::instantiate_from_master(&pool, fx.project_ids[0], copy.id, None)
        .await
        .unwrap()
        .unwrap();
    let on_project =
        FileReferenceRepo::count_for_entity(&pool, EntityType::WorkLead, wl.id)
            .await
            .unwrap();
    assert_eq!(on_project, 1);

    let found = WorkLeadRepo::find_by_project_and_master(&pool, fx.project_ids[0], copy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, wl.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_copy_lookup_includes_archived(pool: PgPool) {
    let fx = group_with_projects(&pool, 1).await;
    let project_id = fx.project_ids[0];
    let wlm = group_template(&pool, fx.group_id, "Cap").await;
    let wl = WorkLeadRepo::instantiate_from_master(&pool, project_id, wlm, None)
        .await
        .unwrap()
        .unwrap();

    assert!(WorkLeadRepo::set_archived(&pool, project_id, wl.id, true).await.unwrap());
    let found = WorkLeadRepo::find_by_project_and_master(&pool, project_id, wlm)
        .await
        .unwrap();
    assert_eq!(found.map(|w| w.id), Some(wl.id));

    assert!(WorkLeadRepo::soft_delete(&pool, project_id, wl.id).await.unwrap());
    assert!(WorkLeadRepo::find_by_project_and_master(&pool, project_id, wlm)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Work-lead types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_work_lead_type_parent_can_be_cleared(pool: PgPool) {
    let root = WorkLeadTypeRepo::create(
        &pool,
        &CreateWorkLeadType {
            name: "Voile".into(),
            parent_id: None,
        },
    )
    .await
    .unwrap();
    let child = WorkLeadTypeRepo::create(
        &pool,
        &CreateWorkLeadType {
            name: "Trim".into(),
            parent_id: Some(root.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(child.parent_name.as_deref(), Some("Voile"));
    assert!(WorkLeadTypeRepo::has_children(&pool, root.id).await.unwrap());

    let candidate = WorkLeadTypeRepo::parent_candidate(&pool, child.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(candidate.parent_id, Some(root.id));

    let updated = WorkLeadTypeRepo::update(
        &pool,
        child.id,
        &UpdateWorkLeadType {
            name: None,
            parent_id: Some(None),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.parent_id, None);
    assert_eq!(updated.name, "Trim");
    assert!(!WorkLeadTypeRepo::has_children(&pool, root.id).await.unwrap());
}
