//! Integration tests for the command gateway that do not need a
//! reachable device:
//! - Allow-list rejection happens before any connection attempt
//! - Connection failures surface as `Connect` errors
//! - Both outcomes land in the audit log

use std::time::Duration;

use nemon_db::repositories::CommandLogRepo;
use nemon_gateway::{CommandGateway, DeviceConfig, GatewayError};
use sqlx::SqlitePool;

/// Points at a port that nothing listens on, so any connection attempt
/// fails immediately.
fn unreachable_device() -> DeviceConfig {
    DeviceConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: "monitor".to_string(),
        password: "secret".to_string(),
        connect_timeout: Duration::from_secs(2),
        command_timeout: Duration::from_secs(2),
    }
}

// ---------------------------------------------------------------------------
// Test: Rejection path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_command_never_connects(pool: SqlitePool) {
    let gateway = CommandGateway::new(unreachable_device(), pool.clone());

    let err = gateway.execute("reboot").await.unwrap_err();
    assert!(matches!(err, GatewayError::Rejected(_)));

    // A write command hidden behind whitespace is rejected too.
    let err = gateway.execute("  system-view  ").await.unwrap_err();
    assert!(matches!(err, GatewayError::Rejected(_)));

    let entries = CommandLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(entries.len(), 2, "rejected attempts are audited");
    assert!(entries.iter().all(|e| !e.success));
    assert!(entries[0]
        .error
        .as_deref()
        .unwrap()
        .contains("Command not permitted"));
}

// ---------------------------------------------------------------------------
// Test: Connection failure path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unreachable_device_yields_connect_error(pool: SqlitePool) {
    let gateway = CommandGateway::new(unreachable_device(), pool.clone());

    let err = gateway.execute("display bgp peer").await.unwrap_err();
    assert!(
        matches!(err, GatewayError::Connect(_)),
        "expected Connect, got: {err}"
    );

    let entries = CommandLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].command, "display bgp peer");
}
