//! Repository for the `events` table (state transitions and alerts).

use chrono::Duration;
use nemon_core::types::Timestamp;
use serde::Deserialize;

use crate::models::event::{CreateEvent, Event, EventStats, SeverityCount, TypeCount};
use crate::DbPool;

/// Column list for `events` SELECT queries.
const COLUMNS: &str = "id, event_type, severity, source, message, details, created_at";

/// Column list for `events` INSERT statements.
const INSERT_COLUMNS: &str = "event_type, severity, source, message, details, created_at";

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Optional filters for the event listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub severity: Option<String>,
    pub source: Option<String>,
    pub limit: Option<i64>,
}

/// Provides query operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event.
    pub async fn insert(pool: &DbPool, event: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&event.event_type)
            .bind(&event.severity)
            .bind(&event.source)
            .bind(&event.message)
            .bind(&event.details)
            .bind(event.created_at)
            .fetch_one(pool)
            .await
    }

    /// Insert a new event inside an open reconcile transaction.
    pub async fn insert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&event.event_type)
            .bind(&event.severity)
            .bind(&event.source)
            .bind(&event.message)
            .bind(&event.details)
            .bind(event.created_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// List events newest first, applying any combination of filters.
    pub async fn list(pool: &DbPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let mut query = format!("SELECT {COLUMNS} FROM events");
        let mut clauses = Vec::new();
        if filter.event_type.is_some() {
            clauses.push("event_type = ?");
        }
        if filter.severity.is_some() {
            clauses.push("severity = ?");
        }
        if filter.source.is_some() {
            clauses.push("source = ?");
        }
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC LIMIT ?");

        let mut q = sqlx::query_as::<_, Event>(&query);
        if let Some(t) = &filter.event_type {
            q = q.bind(t);
        }
        if let Some(s) = &filter.severity {
            q = q.bind(s);
        }
        if let Some(s) = &filter.source {
            q = q.bind(s);
        }
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        q.bind(limit).fetch_all(pool).await
    }

    /// Whether an event of this type from this source exists after
    /// `since`. This is the alert dedup lookup.
    pub async fn recent_exists(
        pool: &DbPool,
        event_type: &str,
        source: &str,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM events \
             WHERE event_type = ? AND source = ? AND created_at > ?",
        )
        .bind(event_type)
        .bind(source)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Aggregate counts for the stats endpoint. `now` anchors the
    /// last-24h window.
    pub async fn stats(pool: &DbPool, now: Timestamp) -> Result<EventStats, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await?;
        let last_24h: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE created_at > ?")
                .bind(now - Duration::hours(24))
                .fetch_one(pool)
                .await?;
        let by_severity = sqlx::query_as::<_, SeverityCount>(
            "SELECT severity, COUNT(*) AS count FROM events \
             GROUP BY severity ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;
        let by_type = sqlx::query_as::<_, TypeCount>(
            "SELECT event_type, COUNT(*) AS count FROM events \
             GROUP BY event_type ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(EventStats {
            total,
            last_24h,
            by_severity,
            by_type,
        })
    }

    /// Delete events older than the cutoff. Returns rows deleted.
    pub async fn delete_older_than(pool: &DbPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE created_at < ?")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
