//! BGP peering entity models.

use nemon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Current state (one row per peer)
// ---------------------------------------------------------------------------

/// Current state of one BGP peer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BgpSession {
    pub id: DbId,
    pub peer_address: String,
    pub peer_asn: i64,
    /// Raw state token as reported by the device (`Established`, `Idle`,
    /// `Active`, `Idle(Admin)`, ...).
    pub status: String,
    pub uptime_seconds: i64,
    pub prefixes_received: i64,
    pub prefixes_sent: i64,
    pub last_state_change: Timestamp,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
}

impl BgpSession {
    pub fn is_established(&self) -> bool {
        nemon_core::status::is_established(&self.status)
    }
}

// ---------------------------------------------------------------------------
// History (append-only)
// ---------------------------------------------------------------------------

/// Per-cycle snapshot of one peer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BgpStatusHistory {
    pub id: DbId,
    pub peer_address: String,
    pub status: String,
    pub uptime_seconds: i64,
    pub prefixes_received: i64,
    pub prefixes_sent: i64,
    pub recorded_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Peering summary returned by the BGP stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BgpSummary {
    pub total: i64,
    pub established: i64,
    pub not_established: i64,
    pub total_prefixes_received: i64,
}
