//! Integration tests for the event log and command audit endpoints.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use common::{body_json, get};
use nemon_core::types::Timestamp;
use nemon_db::models::command_log::CreateCommandLogEntry;
use nemon_db::models::event::CreateEvent;
use nemon_db::repositories::{CommandLogRepo, EventRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(offset_secs: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

fn event(event_type: &str, severity: &str, source: &str, offset_secs: i64) -> CreateEvent {
    CreateEvent {
        event_type: event_type.to_string(),
        severity: severity.to_string(),
        source: source.to_string(),
        message: format!("{source} changed state"),
        details: None,
        created_at: ts(offset_secs),
    }
}

async fn seed(pool: &SqlitePool) {
    let events = [
        event("bgp_down", "critical", "BGP:10.0.0.1", 0),
        event("bgp_up", "info", "BGP:10.0.0.1", 60),
        event("interface_down", "critical", "Interface:Ge0/0/1", 120),
        event("high_errors", "warning", "Interface:Ge0/0/2", 180),
    ];
    for e in &events {
        EventRepo::insert(pool, e).await.unwrap();
    }
}

// ---------------------------------------------------------------------------
// Test: list events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_events_is_newest_first(pool: SqlitePool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/events").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0]["event_type"], "high_errors");
    assert_eq!(events[3]["event_type"], "bgp_down");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_events_applies_filters(pool: SqlitePool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/events?severity=critical").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get(
        app.clone(),
        "/api/events?severity=critical&source=BGP:10.0.0.1",
    )
    .await;
    let json = body_json(response).await;
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "bgp_down");

    let response = get(app, "/api/events?limit=2").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: event stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_stats_groups_by_severity_and_type(pool: SqlitePool) {
    seed(&pool).await;
    // The seeded rows are dated June 2025; only this one lands inside
    // the rolling 24h window anchored at request time.
    EventRepo::insert(
        &pool,
        &CreateEvent {
            event_type: "bgp_down".to_string(),
            severity: "critical".to_string(),
            source: "BGP:10.0.0.2".to_string(),
            message: "BGP:10.0.0.2 changed state".to_string(),
            details: None,
            created_at: Utc::now() - Duration::minutes(5),
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let response = get(app, "/api/events/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 5);
    assert_eq!(json["data"]["last_24h"], 1);

    // Critical leads with three rows.
    let by_severity = json["data"]["by_severity"].as_array().unwrap();
    assert_eq!(by_severity[0]["severity"], "critical");
    assert_eq!(by_severity[0]["count"], 3);
    assert_eq!(by_severity.len(), 3);

    let by_type = json["data"]["by_type"].as_array().unwrap();
    assert_eq!(by_type[0]["event_type"], "bgp_down");
    assert_eq!(by_type[0]["count"], 2);
    assert_eq!(by_type.len(), 4);
}

// ---------------------------------------------------------------------------
// Test: command audit log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn command_log_lists_recent_entries(pool: SqlitePool) {
    let entries = [
        CreateCommandLogEntry {
            command: "display bgp peer".to_string(),
            success: true,
            duration_ms: 420,
            error: None,
            executed_at: ts(0),
        },
        CreateCommandLogEntry {
            command: "reboot".to_string(),
            success: false,
            duration_ms: 0,
            error: Some("Command not permitted: reboot".to_string()),
            executed_at: ts(60),
        },
    ];
    for e in &entries {
        CommandLogRepo::insert(&pool, e).await.unwrap();
    }
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/commands/log").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let log = json["data"].as_array().unwrap();
    assert_eq!(log.len(), 2);
    // Newest first; the rejected command keeps its error message.
    assert_eq!(log[0]["command"], "reboot");
    assert_eq!(log[0]["success"], false);
    assert!(log[0]["error"].as_str().unwrap().contains("not permitted"));
    assert_eq!(log[1]["command"], "display bgp peer");
    assert_eq!(log[1]["success"], true);

    let response = get(app, "/api/commands/log?limit=1").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
