//! Repository for the `command_log` table (append-only audit trail).
//!
//! The audit trail is deliberately exempt from retention sweeps.

use crate::models::command_log::{CommandLogEntry, CreateCommandLogEntry};
use crate::DbPool;

/// Column list for `command_log` SELECT queries.
const COLUMNS: &str = "id, command, success, duration_ms, error, executed_at";

/// Column list for `command_log` INSERT statements.
const INSERT_COLUMNS: &str = "command, success, duration_ms, error, executed_at";

/// Provides query operations for the command audit log.
pub struct CommandLogRepo;

impl CommandLogRepo {
    /// Append one audit entry.
    pub async fn insert(
        pool: &DbPool,
        entry: &CreateCommandLogEntry,
    ) -> Result<CommandLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO command_log ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommandLogEntry>(&query)
            .bind(&entry.command)
            .bind(entry.success)
            .bind(entry.duration_ms)
            .bind(&entry.error)
            .bind(entry.executed_at)
            .fetch_one(pool)
            .await
    }

    /// Most recent audit entries, newest first.
    pub async fn list_recent(
        pool: &DbPool,
        limit: i64,
    ) -> Result<Vec<CommandLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM command_log \
             ORDER BY executed_at DESC LIMIT ?"
        );
        sqlx::query_as::<_, CommandLogEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
