//! Repository for the `bgp_status_history` table (append-only time-series).

use nemon_core::observation::PeerObservation;
use nemon_core::types::Timestamp;

use crate::models::bgp::BgpStatusHistory;
use crate::DbPool;

/// Column list for `bgp_status_history` SELECT queries.
const COLUMNS: &str = "\
    id, peer_address, status, uptime_seconds, \
    prefixes_received, prefixes_sent, recorded_at";

/// Provides query operations for BGP history snapshots.
pub struct BgpHistoryRepo;

impl BgpHistoryRepo {
    /// Append one per-cycle snapshot inside the reconcile transaction.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        obs: &PeerObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO bgp_status_history \
                 (peer_address, status, uptime_seconds, \
                  prefixes_received, prefixes_sent, recorded_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&obs.peer_address)
        .bind(&obs.status)
        .bind(obs.uptime_seconds)
        .bind(obs.prefixes_received)
        .bind(obs.prefixes_sent)
        .bind(now)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Most recent snapshots for one peer, newest first.
    pub async fn list_for_peer(
        pool: &DbPool,
        peer_address: &str,
        limit: i64,
    ) -> Result<Vec<BgpStatusHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bgp_status_history \
             WHERE peer_address = ? \
             ORDER BY recorded_at DESC LIMIT ?"
        );
        sqlx::query_as::<_, BgpStatusHistory>(&query)
            .bind(peer_address)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete snapshots older than the cutoff. Returns rows deleted.
    pub async fn delete_older_than(pool: &DbPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bgp_status_history WHERE recorded_at < ?")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
