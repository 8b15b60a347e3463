//! Event entity models (state transitions and alerts).

use nemon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A recorded state transition or alert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub severity: String,
    /// Origin in `BGP:<peer>` or `Interface:<name>` form.
    pub source: String,
    pub message: String,
    /// Optional JSON payload with metric context.
    pub details: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub event_type: String,
    pub severity: String,
    pub source: String,
    pub message: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Row count per severity level.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeverityCount {
    pub severity: String,
    pub count: i64,
}

/// Row count per event type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TypeCount {
    pub event_type: String,
    pub count: i64,
}

/// Assembled stats payload for the events stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EventStats {
    pub total: i64,
    /// Events recorded in the 24 hours before the query.
    pub last_24h: i64,
    pub by_severity: Vec<SeverityCount>,
    pub by_type: Vec<TypeCount>,
}
