//! Alert rule evaluation.
//!
//! Three rules run over stored state: non-established BGP peers, down
//! interfaces, and high interface error counts. Each rule is isolated,
//! a failure in one never blocks the others, and every rule dedups
//! against recent events of the same type and source.

use chrono::Duration;
use nemon_core::alert::{
    EVENT_BGP_DOWN, EVENT_HIGH_ERRORS, EVENT_INTERFACE_DOWN, ERROR_ALERT_WINDOW_MINUTES,
    STATUS_ALERT_WINDOW_MINUTES,
};
use nemon_core::status::Severity;
use nemon_core::types::Timestamp;
use nemon_db::models::event::CreateEvent;
use nemon_db::repositories::{BgpSessionRepo, EventRepo, InterfaceRepo};
use nemon_db::DbPool;
use serde_json::json;

use crate::error::CollectError;

/// Alert rule settings.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub bgp_down_enabled: bool,
    pub interface_down_enabled: bool,
    /// Combined in+out error count above which an up interface alerts.
    pub error_threshold: i64,
}

impl AlertConfig {
    /// Load alert settings from environment variables.
    pub fn from_env() -> Self {
        Self {
            bgp_down_enabled: std::env::var("ALERT_BGP_DOWN_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .expect("ALERT_BGP_DOWN_ENABLED must be true or false"),
            interface_down_enabled: std::env::var("ALERT_INTERFACE_DOWN_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .expect("ALERT_INTERFACE_DOWN_ENABLED must be true or false"),
            error_threshold: std::env::var("ALERT_ERROR_THRESHOLD")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("ALERT_ERROR_THRESHOLD must be a number"),
        }
    }
}

/// Run all enabled alert rules. Returns how many alerts fired.
///
/// Rule failures are logged and absorbed here, so one broken rule can
/// neither block the others nor abort the check job.
pub async fn evaluate_alerts(pool: &DbPool, config: &AlertConfig, now: Timestamp) -> u64 {
    let mut fired = 0;

    if config.bgp_down_enabled {
        match check_bgp_peers(pool, now).await {
            Ok(n) => fired += n,
            Err(e) => tracing::error!(error = %e, "BGP peer alert rule failed"),
        }
    }

    if config.interface_down_enabled {
        match check_interface_status(pool, now).await {
            Ok(n) => fired += n,
            Err(e) => tracing::error!(error = %e, "Interface status alert rule failed"),
        }
    }

    match check_interface_errors(pool, config.error_threshold, now).await {
        Ok(n) => fired += n,
        Err(e) => tracing::error!(error = %e, "Interface error alert rule failed"),
    }

    if fired > 0 {
        tracing::info!(fired, "Alert check complete");
    }
    fired
}

/// Alert on every session not currently Established.
async fn check_bgp_peers(pool: &DbPool, now: Timestamp) -> Result<u64, CollectError> {
    let window_start = now - Duration::minutes(STATUS_ALERT_WINDOW_MINUTES);
    let mut fired = 0;

    for session in BgpSessionRepo::non_established(pool).await? {
        let source = format!("BGP:{}", session.peer_address);
        if EventRepo::recent_exists(pool, EVENT_BGP_DOWN, &source, window_start).await? {
            continue;
        }
        let event = CreateEvent {
            event_type: EVENT_BGP_DOWN.to_string(),
            severity: Severity::Critical.as_str().to_string(),
            source,
            message: format!(
                "BGP peer {} (AS{}) is {}",
                session.peer_address, session.peer_asn, session.status
            ),
            details: Some(
                json!({
                    "status": session.status,
                    "peer_asn": session.peer_asn,
                })
                .to_string(),
            ),
            created_at: now,
        };
        EventRepo::insert(pool, &event).await?;
        fired += 1;
    }

    Ok(fired)
}

/// Alert on every interface that is down or administratively down.
async fn check_interface_status(pool: &DbPool, now: Timestamp) -> Result<u64, CollectError> {
    let window_start = now - Duration::minutes(STATUS_ALERT_WINDOW_MINUTES);
    let mut fired = 0;

    for interface in InterfaceRepo::down_interfaces(pool).await? {
        let source = format!("Interface:{}", interface.name);
        if EventRepo::recent_exists(pool, EVENT_INTERFACE_DOWN, &source, window_start).await? {
            continue;
        }
        let event = CreateEvent {
            event_type: EVENT_INTERFACE_DOWN.to_string(),
            severity: Severity::Critical.as_str().to_string(),
            source,
            message: match &interface.description {
                Some(desc) => {
                    format!("Interface {} ({}) is {}", interface.name, desc, interface.status)
                }
                None => format!("Interface {} is {}", interface.name, interface.status),
            },
            details: Some(json!({ "status": interface.status }).to_string()),
            created_at: now,
        };
        EventRepo::insert(pool, &event).await?;
        fired += 1;
    }

    Ok(fired)
}

/// Alert on up interfaces whose combined error counters exceed the
/// threshold. Down interfaces are excluded; the status rule owns those.
async fn check_interface_errors(
    pool: &DbPool,
    threshold: i64,
    now: Timestamp,
) -> Result<u64, CollectError> {
    let window_start = now - Duration::minutes(ERROR_ALERT_WINDOW_MINUTES);
    let mut fired = 0;

    for interface in InterfaceRepo::high_error_interfaces(pool, threshold).await? {
        let source = format!("Interface:{}", interface.name);
        if EventRepo::recent_exists(pool, EVENT_HIGH_ERRORS, &source, window_start).await? {
            continue;
        }
        let event = CreateEvent {
            event_type: EVENT_HIGH_ERRORS.to_string(),
            severity: Severity::Warning.as_str().to_string(),
            source,
            message: format!(
                "Interface {} has {} errors (in: {}, out: {})",
                interface.name,
                interface.total_errors(),
                interface.errors_in,
                interface.errors_out
            ),
            details: Some(
                json!({
                    "errors_in": interface.errors_in,
                    "errors_out": interface.errors_out,
                    "threshold": threshold,
                })
                .to_string(),
            ),
            created_at: now,
        };
        EventRepo::insert(pool, &event).await?;
        fired += 1;
    }

    Ok(fired)
}
