//! Repository for the `interface_history` table (append-only time-series).

use nemon_core::observation::InterfaceObservation;
use nemon_core::types::Timestamp;

use crate::models::interface::InterfaceHistory;
use crate::DbPool;

/// Column list for `interface_history` SELECT queries.
const COLUMNS: &str = "\
    id, interface_name, status, \
    bandwidth_in_bps, bandwidth_out_bps, \
    utilization_in_percent, utilization_out_percent, \
    errors_in, errors_out, recorded_at";

/// Provides query operations for interface history snapshots.
pub struct InterfaceHistoryRepo;

impl InterfaceHistoryRepo {
    /// Append one per-cycle snapshot inside the reconcile transaction.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        obs: &InterfaceObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO interface_history \
                 (interface_name, status, bandwidth_in_bps, bandwidth_out_bps, \
                  utilization_in_percent, utilization_out_percent, \
                  errors_in, errors_out, recorded_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&obs.name)
        .bind(obs.status.as_str())
        .bind(obs.bandwidth_in_bps)
        .bind(obs.bandwidth_out_bps)
        .bind(obs.utilization_in_percent)
        .bind(obs.utilization_out_percent)
        .bind(obs.errors_in)
        .bind(obs.errors_out)
        .bind(now)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Most recent snapshots for one interface, newest first.
    pub async fn list_for_interface(
        pool: &DbPool,
        name: &str,
        limit: i64,
    ) -> Result<Vec<InterfaceHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interface_history \
             WHERE interface_name = ? \
             ORDER BY recorded_at DESC LIMIT ?"
        );
        sqlx::query_as::<_, InterfaceHistory>(&query)
            .bind(name)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete snapshots older than the cutoff. Returns rows deleted.
    pub async fn delete_older_than(pool: &DbPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interface_history WHERE recorded_at < ?")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
