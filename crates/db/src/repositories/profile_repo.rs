//! Repository for the `profiles` and `user_active_profiles` tables.

use rise_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile, ProfileSummary};

const COLUMNS: &str =
    "id, user_id, type_profile_id, display_name, email, is_deleted, created_at, updated_at";

/// Provides lookups over role-scoped profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, type_profile_id, display_name, email)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.user_id)
            .bind(input.type_profile_id)
            .bind(&input.display_name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's first profile, by ascending ID.
    pub async fn first_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE user_id = $1 AND is_deleted = FALSE
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List the user's profiles with their type names.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT p.id, p.type_profile_id, t.name AS type_profile_name, p.display_name
             FROM profiles p
             JOIN type_profiles t ON t.id = p.type_profile_id
             WHERE p.user_id = $1 AND p.is_deleted = FALSE
             ORDER BY p.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// The profile the user last switched to, if it is still theirs.
    pub async fn find_active(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM user_active_profiles a
             JOIN profiles p ON p.id = a.profile_id
             WHERE a.user_id = $1 AND p.user_id = $1 AND p.is_deleted = FALSE",
            prefixed("p")
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist the user's active profile choice.
    ///
    /// Uses `ON CONFLICT (user_id) DO UPDATE` to keep one row per user.
    pub async fn set_active(
        pool: &PgPool,
        user_id: UserId,
        profile_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_active_profiles (user_id, profile_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET profile_id = EXCLUDED.profile_id, updated_at = NOW()",
        )
        .bind(user_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
