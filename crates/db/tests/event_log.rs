//! Integration tests for the event and command log repositories:
//! - Event insert, filtered listing, stats
//! - Dedup lookback window
//! - Retention delete
//! - Command audit append and listing

use chrono::{Duration, TimeZone, Utc};
use nemon_core::types::Timestamp;
use nemon_db::models::command_log::CreateCommandLogEntry;
use nemon_db::models::event::CreateEvent;
use nemon_db::repositories::{CommandLogRepo, EventFilter, EventRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(offset_secs: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

fn event(event_type: &str, severity: &str, source: &str, at: Timestamp) -> CreateEvent {
    CreateEvent {
        event_type: event_type.to_string(),
        severity: severity.to_string(),
        source: source.to_string(),
        message: format!("{event_type} on {source}"),
        details: None,
        created_at: at,
    }
}

// ---------------------------------------------------------------------------
// Test: Insert and filtered listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_and_list_filters(pool: SqlitePool) {
    EventRepo::insert(&pool, &event("bgp_down", "critical", "BGP:10.0.0.1", ts(0)))
        .await
        .unwrap();
    EventRepo::insert(&pool, &event("bgp_up", "info", "BGP:10.0.0.1", ts(60)))
        .await
        .unwrap();
    EventRepo::insert(
        &pool,
        &event("interface_down", "critical", "Interface:Eth-Trunk1", ts(120)),
    )
    .await
    .unwrap();

    let all = EventRepo::list(&pool, &EventFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].event_type, "interface_down", "newest first");

    let filter = EventFilter {
        severity: Some("critical".to_string()),
        ..Default::default()
    };
    let critical = EventRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(critical.len(), 2);

    let filter = EventFilter {
        event_type: Some("bgp_up".to_string()),
        source: Some("BGP:10.0.0.1".to_string()),
        ..Default::default()
    };
    let matched = EventRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].message, "bgp_up on BGP:10.0.0.1");

    let filter = EventFilter {
        limit: Some(2),
        ..Default::default()
    };
    let limited = EventRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(limited.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: Dedup lookback window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_exists_window(pool: SqlitePool) {
    EventRepo::insert(&pool, &event("high_errors", "warning", "Interface:Ge0/0/1", ts(0)))
        .await
        .unwrap();

    // Inside the window.
    assert!(
        EventRepo::recent_exists(&pool, "high_errors", "Interface:Ge0/0/1", ts(-300))
            .await
            .unwrap()
    );

    // The event predates the window start.
    assert!(
        !EventRepo::recent_exists(&pool, "high_errors", "Interface:Ge0/0/1", ts(60))
            .await
            .unwrap()
    );

    // Different source or type does not match.
    assert!(
        !EventRepo::recent_exists(&pool, "high_errors", "Interface:Ge0/0/2", ts(-300))
            .await
            .unwrap()
    );
    assert!(
        !EventRepo::recent_exists(&pool, "interface_down", "Interface:Ge0/0/1", ts(-300))
            .await
            .unwrap()
    );
}

// ---------------------------------------------------------------------------
// Test: Stats aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats(pool: SqlitePool) {
    EventRepo::insert(&pool, &event("bgp_down", "critical", "BGP:10.0.0.1", ts(0)))
        .await
        .unwrap();
    EventRepo::insert(&pool, &event("bgp_down", "critical", "BGP:10.0.0.2", ts(10)))
        .await
        .unwrap();
    EventRepo::insert(&pool, &event("bgp_up", "info", "BGP:10.0.0.1", ts(20)))
        .await
        .unwrap();
    // Two days old, outside the 24h window.
    EventRepo::insert(
        &pool,
        &event(
            "interface_down",
            "critical",
            "Interface:Ge0/0/1",
            ts(0) - Duration::days(2),
        ),
    )
    .await
    .unwrap();

    let stats = EventRepo::stats(&pool, ts(3600)).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.last_24h, 3);
    assert_eq!(stats.by_severity[0].severity, "critical");
    assert_eq!(stats.by_severity[0].count, 3);
    assert_eq!(stats.by_type[0].event_type, "bgp_down");
    assert_eq!(stats.by_type[0].count, 2);
}

// ---------------------------------------------------------------------------
// Test: Retention delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_older_than(pool: SqlitePool) {
    let old = ts(0) - Duration::days(70);
    EventRepo::insert(&pool, &event("bgp_down", "critical", "BGP:10.0.0.1", old))
        .await
        .unwrap();
    EventRepo::insert(&pool, &event("bgp_up", "info", "BGP:10.0.0.1", ts(0)))
        .await
        .unwrap();

    let deleted = EventRepo::delete_older_than(&pool, ts(0) - Duration::days(60))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = EventRepo::list(&pool, &EventFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].event_type, "bgp_up");
}

// ---------------------------------------------------------------------------
// Test: Command audit append and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_command_log_append_and_list(pool: SqlitePool) {
    CommandLogRepo::insert(
        &pool,
        &CreateCommandLogEntry {
            command: "display bgp peer".to_string(),
            success: true,
            duration_ms: 420,
            error: None,
            executed_at: ts(0),
        },
    )
    .await
    .unwrap();
    CommandLogRepo::insert(
        &pool,
        &CreateCommandLogEntry {
            command: "display interface brief".to_string(),
            success: false,
            duration_ms: 30_000,
            error: Some("command timed out after 30s".to_string()),
            executed_at: ts(60),
        },
    )
    .await
    .unwrap();

    let entries = CommandLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].command, "display interface brief", "newest first");
    assert!(!entries[0].success);
    assert_eq!(entries[0].error.as_deref(), Some("command timed out after 30s"));
    assert!(entries[1].success);

    let limited = CommandLogRepo::list_recent(&pool, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}
