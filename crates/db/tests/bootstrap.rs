use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify reference data.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    rise_db::health_check(&pool).await.unwrap();

    let tables = ["type_profiles", "type_seances", "type_supports", "work_lead_types"];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

/// Profile type ids are fixed because role checks match on them.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_type_ids_are_stable(pool: PgPool) {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM type_profiles ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    let names: Vec<_> = rows.iter().map(|(id, n)| (*id, n.as_str())).collect();
    assert_eq!(
        names,
        vec![(1, "admin"), (2, "super_coach"), (3, "coach"), (4, "navigant")]
    );
}

/// The pivot tables reject statuses outside the enumerated set.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pivot_status_check_constraint(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO session_work_leads (session_id, work_lead_id, status) VALUES (1, 1, 'NEW')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
