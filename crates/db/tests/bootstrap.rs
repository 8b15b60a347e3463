use sqlx::SqlitePool;

/// Full bootstrap test: migrate, health-check, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    // Health check
    nemon_db::health_check(&pool).await.unwrap();

    // Verify all six tables exist.
    let tables = [
        "bgp_sessions",
        "interfaces",
        "bgp_status_history",
        "interface_history",
        "events",
        "command_log",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|e| panic!("{table} lookup failed: {e}"));
        assert_eq!(count.0, 1, "{table} should exist");
    }
}

/// The dedup lookup index must exist; the alert path depends on it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_dedup_index_exists(pool: SqlitePool) {
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master \
         WHERE type = 'index' AND name = 'idx_events_type_source_created'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count.0, 1);
}
