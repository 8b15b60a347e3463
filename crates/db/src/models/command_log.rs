//! Command audit log models.

use nemon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One audited gateway command execution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommandLogEntry {
    pub id: DbId,
    pub command: String,
    pub success: bool,
    pub duration_ms: i64,
    pub error: Option<String>,
    pub executed_at: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone)]
pub struct CreateCommandLogEntry {
    pub command: String,
    pub success: bool,
    pub duration_ms: i64,
    pub error: Option<String>,
    pub executed_at: Timestamp,
}
