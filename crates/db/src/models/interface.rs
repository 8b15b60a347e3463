//! Interface entity models.

use nemon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Current state (one row per interface)
// ---------------------------------------------------------------------------

/// Current state of one physical or logical interface.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interface {
    pub id: DbId,
    pub name: String,
    /// Normalized status: `up`, `down`, or `admin-down`.
    pub status: String,
    pub description: Option<String>,
    pub bandwidth_capacity_bps: i64,
    pub bandwidth_in_bps: i64,
    pub bandwidth_out_bps: i64,
    pub packets_in_pps: i64,
    pub packets_out_pps: i64,
    pub errors_in: i64,
    pub errors_out: i64,
    pub discards_in: i64,
    pub discards_out: i64,
    pub utilization_in_percent: f64,
    pub utilization_out_percent: f64,
    pub last_state_change: Timestamp,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
}

impl Interface {
    pub fn total_errors(&self) -> i64 {
        self.errors_in + self.errors_out
    }
}

// ---------------------------------------------------------------------------
// History (append-only)
// ---------------------------------------------------------------------------

/// Per-cycle snapshot of one interface.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterfaceHistory {
    pub id: DbId,
    pub interface_name: String,
    pub status: String,
    pub bandwidth_in_bps: i64,
    pub bandwidth_out_bps: i64,
    pub utilization_in_percent: f64,
    pub utilization_out_percent: f64,
    pub errors_in: i64,
    pub errors_out: i64,
    pub recorded_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Fleet summary returned by the interface stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterfaceSummary {
    pub total: i64,
    pub up: i64,
    pub down: i64,
    pub admin_down: i64,
    pub total_errors: i64,
}
