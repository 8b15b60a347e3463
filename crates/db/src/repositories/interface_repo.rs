//! Repository for the `interfaces` table (current interface state).

use nemon_core::observation::InterfaceObservation;
use nemon_core::types::{DbId, Timestamp};

use crate::models::interface::{Interface, InterfaceSummary};
use crate::DbPool;

/// Column list for `interfaces` SELECT queries (includes `id` and `created_at`).
const COLUMNS: &str = "\
    id, name, status, description, \
    bandwidth_capacity_bps, bandwidth_in_bps, bandwidth_out_bps, \
    packets_in_pps, packets_out_pps, \
    errors_in, errors_out, discards_in, discards_out, \
    utilization_in_percent, utilization_out_percent, \
    last_state_change, last_updated, created_at";

/// Column list for `interfaces` INSERT statements (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "\
    name, status, description, \
    bandwidth_capacity_bps, bandwidth_in_bps, bandwidth_out_bps, \
    packets_in_pps, packets_out_pps, \
    errors_in, errors_out, discards_in, discards_out, \
    utilization_in_percent, utilization_out_percent, \
    last_state_change, last_updated, created_at";

/// Provides query operations for current interface state.
pub struct InterfaceRepo;

impl InterfaceRepo {
    /// List interfaces ordered by name, optionally filtered by
    /// normalized status.
    pub async fn list(
        pool: &DbPool,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Interface>, sqlx::Error> {
        let mut query = format!("SELECT {COLUMNS} FROM interfaces");
        if status.is_some() {
            query.push_str(" WHERE status = LOWER(TRIM(?))");
        }
        query.push_str(" ORDER BY name LIMIT ?");

        let mut q = sqlx::query_as::<_, Interface>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).fetch_all(pool).await
    }

    /// Look up a single interface by name.
    pub async fn get_by_name(
        pool: &DbPool,
        name: &str,
    ) -> Result<Option<Interface>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interfaces WHERE name = ?");
        sqlx::query_as::<_, Interface>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Same lookup inside an open reconcile transaction.
    pub async fn get_by_name_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        name: &str,
    ) -> Result<Option<Interface>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interfaces WHERE name = ?");
        sqlx::query_as::<_, Interface>(&query)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a newly discovered interface. All three timestamps start
    /// at `now`.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        obs: &InterfaceObservation,
        now: Timestamp,
    ) -> Result<Interface, sqlx::Error> {
        let query = format!(
            "INSERT INTO interfaces ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Interface>(&query)
            .bind(&obs.name)
            .bind(obs.status.as_str())
            .bind(&obs.description)
            .bind(obs.bandwidth_capacity_bps)
            .bind(obs.bandwidth_in_bps)
            .bind(obs.bandwidth_out_bps)
            .bind(obs.packets_in_pps)
            .bind(obs.packets_out_pps)
            .bind(obs.errors_in)
            .bind(obs.errors_out)
            .bind(obs.discards_in)
            .bind(obs.discards_out)
            .bind(obs.utilization_in_percent)
            .bind(obs.utilization_out_percent)
            .bind(now)
            .bind(now)
            .bind(now)
            .fetch_one(&mut **tx)
            .await
    }

    /// Refresh metrics for an unchanged interface. Does not touch
    /// `last_state_change`.
    pub async fn update_metrics(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: DbId,
        obs: &InterfaceObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE interfaces \
             SET description = ?, bandwidth_capacity_bps = ?, \
                 bandwidth_in_bps = ?, bandwidth_out_bps = ?, \
                 packets_in_pps = ?, packets_out_pps = ?, \
                 errors_in = ?, errors_out = ?, discards_in = ?, discards_out = ?, \
                 utilization_in_percent = ?, utilization_out_percent = ?, \
                 last_updated = ? \
             WHERE id = ?",
        )
        .bind(&obs.description)
        .bind(obs.bandwidth_capacity_bps)
        .bind(obs.bandwidth_in_bps)
        .bind(obs.bandwidth_out_bps)
        .bind(obs.packets_in_pps)
        .bind(obs.packets_out_pps)
        .bind(obs.errors_in)
        .bind(obs.errors_out)
        .bind(obs.discards_in)
        .bind(obs.discards_out)
        .bind(obs.utilization_in_percent)
        .bind(obs.utilization_out_percent)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Apply a state transition: writes the new status and moves
    /// `last_state_change` along with the metrics.
    pub async fn update_transition(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: DbId,
        obs: &InterfaceObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE interfaces \
             SET status = ?, description = ?, bandwidth_capacity_bps = ?, \
                 bandwidth_in_bps = ?, bandwidth_out_bps = ?, \
                 packets_in_pps = ?, packets_out_pps = ?, \
                 errors_in = ?, errors_out = ?, discards_in = ?, discards_out = ?, \
                 utilization_in_percent = ?, utilization_out_percent = ?, \
                 last_state_change = ?, last_updated = ? \
             WHERE id = ?",
        )
        .bind(obs.status.as_str())
        .bind(&obs.description)
        .bind(obs.bandwidth_capacity_bps)
        .bind(obs.bandwidth_in_bps)
        .bind(obs.bandwidth_out_bps)
        .bind(obs.packets_in_pps)
        .bind(obs.packets_out_pps)
        .bind(obs.errors_in)
        .bind(obs.errors_out)
        .bind(obs.discards_in)
        .bind(obs.discards_out)
        .bind(obs.utilization_in_percent)
        .bind(obs.utilization_out_percent)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Interfaces currently down or administratively down.
    pub async fn down_interfaces(pool: &DbPool) -> Result<Vec<Interface>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interfaces \
             WHERE status IN ('down', 'admin-down') \
             ORDER BY name"
        );
        sqlx::query_as::<_, Interface>(&query).fetch_all(pool).await
    }

    /// Up interfaces whose combined error counters exceed the threshold.
    pub async fn high_error_interfaces(
        pool: &DbPool,
        threshold: i64,
    ) -> Result<Vec<Interface>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interfaces \
             WHERE errors_in + errors_out > ? AND status = 'up' \
             ORDER BY name"
        );
        sqlx::query_as::<_, Interface>(&query)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }

    /// Aggregate counts for the stats endpoint.
    pub async fn summary(pool: &DbPool) -> Result<InterfaceSummary, sqlx::Error> {
        sqlx::query_as::<_, InterfaceSummary>(
            "SELECT COUNT(*) AS total, \
                    COALESCE(SUM(CASE WHEN status = 'up' THEN 1 ELSE 0 END), 0) AS up, \
                    COALESCE(SUM(CASE WHEN status = 'down' THEN 1 ELSE 0 END), 0) AS down, \
                    COALESCE(SUM(CASE WHEN status = 'admin-down' THEN 1 ELSE 0 END), 0) AS admin_down, \
                    COALESCE(SUM(errors_in + errors_out), 0) AS total_errors \
             FROM interfaces",
        )
        .fetch_one(pool)
        .await
    }
}
