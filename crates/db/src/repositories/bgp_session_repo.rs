//! Repository for the `bgp_sessions` table (current peer state).

use nemon_core::observation::PeerObservation;
use nemon_core::types::{DbId, Timestamp};

use crate::models::bgp::{BgpSession, BgpSummary};
use crate::DbPool;

/// Column list for `bgp_sessions` SELECT queries (includes `id` and `created_at`).
const COLUMNS: &str = "\
    id, peer_address, peer_asn, status, \
    uptime_seconds, prefixes_received, prefixes_sent, \
    last_state_change, last_updated, created_at";

/// Column list for `bgp_sessions` INSERT statements (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "\
    peer_address, peer_asn, status, \
    uptime_seconds, prefixes_received, prefixes_sent, \
    last_state_change, last_updated, created_at";

/// Provides query operations for current BGP peer state.
pub struct BgpSessionRepo;

impl BgpSessionRepo {
    /// List sessions ordered by peer address, optionally filtered by
    /// status (case-insensitive).
    pub async fn list(
        pool: &DbPool,
        status: Option<&str>,
        limit: i64,
    ) -> Result<Vec<BgpSession>, sqlx::Error> {
        let mut query = format!("SELECT {COLUMNS} FROM bgp_sessions");
        if status.is_some() {
            query.push_str(" WHERE LOWER(TRIM(status)) = LOWER(TRIM(?))");
        }
        query.push_str(" ORDER BY peer_address LIMIT ?");

        let mut q = sqlx::query_as::<_, BgpSession>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).fetch_all(pool).await
    }

    /// Look up a single session by peer address.
    pub async fn get_by_peer(
        pool: &DbPool,
        peer_address: &str,
    ) -> Result<Option<BgpSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bgp_sessions WHERE peer_address = ?");
        sqlx::query_as::<_, BgpSession>(&query)
            .bind(peer_address)
            .fetch_optional(pool)
            .await
    }

    /// Same lookup inside an open reconcile transaction.
    pub async fn get_by_peer_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        peer_address: &str,
    ) -> Result<Option<BgpSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bgp_sessions WHERE peer_address = ?");
        sqlx::query_as::<_, BgpSession>(&query)
            .bind(peer_address)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a newly discovered peer. All three timestamps start at `now`.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        obs: &PeerObservation,
        now: Timestamp,
    ) -> Result<BgpSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO bgp_sessions ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BgpSession>(&query)
            .bind(&obs.peer_address)
            .bind(obs.peer_asn)
            .bind(&obs.status)
            .bind(obs.uptime_seconds)
            .bind(obs.prefixes_received)
            .bind(obs.prefixes_sent)
            .bind(now)
            .bind(now)
            .bind(now)
            .fetch_one(&mut **tx)
            .await
    }

    /// Refresh metrics for an unchanged peer. Does not touch
    /// `last_state_change`.
    pub async fn update_metrics(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: DbId,
        obs: &PeerObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bgp_sessions \
             SET peer_asn = ?, uptime_seconds = ?, prefixes_received = ?, \
                 prefixes_sent = ?, last_updated = ? \
             WHERE id = ?",
        )
        .bind(obs.peer_asn)
        .bind(obs.uptime_seconds)
        .bind(obs.prefixes_received)
        .bind(obs.prefixes_sent)
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
        obs: &PeerObservation,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bgp_sessions \
             SET peer_asn = ?, status = ?, uptime_seconds = ?, prefixes_received = ?, \
                 prefixes_sent = ?, last_state_change = ?, last_updated = ? \
             WHERE id = ?",
        )
        .bind(obs.peer_asn)
        .bind(&obs.status)
        .bind(obs.uptime_seconds)
        .bind(obs.prefixes_received)
        .bind(obs.prefixes_sent)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Sessions currently not in the Established state.
    pub async fn non_established(pool: &DbPool) -> Result<Vec<BgpSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bgp_sessions \
             WHERE LOWER(TRIM(status)) <> 'established' \
             ORDER BY peer_address"
        );
        sqlx::query_as::<_, BgpSession>(&query).fetch_all(pool).await
    }

    /// Aggregate counts for the stats endpoint.
    pub async fn summary(pool: &DbPool) -> Result<BgpSummary, sqlx::Error> {
        sqlx::query_as::<_, BgpSummary>(
            "SELECT COUNT(*) AS total, \
                    COALESCE(SUM(CASE WHEN LOWER(TRIM(status)) = 'established' \
                                      THEN 1 ELSE 0 END), 0) AS established, \
                    COALESCE(SUM(CASE WHEN LOWER(TRIM(status)) <> 'established' \
                                      THEN 1 ELSE 0 END), 0) AS not_established, \
                    COALESCE(SUM(prefixes_received), 0) AS total_prefixes_received \
             FROM bgp_sessions",
        )
        .fetch_one(pool)
        .await
    }
}
