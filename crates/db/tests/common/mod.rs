//! Shared fixtures for repository tests.

#![allow(dead_code)]

use rise_core::roles::{PROFILE_TYPE_COACH, PROFILE_TYPE_NAVIGANT};
use rise_core::types::DbId;
use rise_db::models::group::CreateGroup;
use rise_db::models::profile::{CreateProfile, Profile};
use rise_db::models::project::CreateProject;
use rise_db::models::session_master::CreateSessionMaster;
use rise_db::models::work_lead_master::CreateWorkLeadMaster;
use rise_db::repositories::{GroupRepo, ProfileRepo, ProjectRepo, WorkLeadMasterRepo};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn profile(pool: &PgPool, type_profile_id: DbId) -> Profile {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            user_id: Uuid::new_v4(),
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

/// A group with one coach and `projects` navigant projects.
pub struct GroupFixture {
    pub group_id: DbId,
    pub coach: Profile,
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
        project_ids.push(project.id);
    }

    GroupFixture {
        group_id: group.id,
        coach,
        project_ids,
    }
}

pub async fn session_master_input(pool: &PgPool, name: &str) -> CreateSessionMaster {
    CreateSessionMaster {
        name: name.into(),
        type_seance_id: first_type_seance(pool).await,
        date_start: None,
        date_end: None,
        location: None,
        content: Some("Bord a bord".into()),
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
