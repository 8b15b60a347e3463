//! Retention sweep for history and event tables.
//!
//! The command audit log is exempt: it is the security record of what
//! the monitor sent to the device.

use chrono::Duration;
use nemon_core::types::Timestamp;
use nemon_db::repositories::{BgpHistoryRepo, EventRepo, InterfaceHistoryRepo};
use nemon_db::DbPool;

use crate::error::CollectError;

/// How long per-cycle history snapshots are kept.
pub const HISTORY_RETENTION_DAYS: i64 = 30;

/// How long events are kept.
pub const EVENT_RETENTION_DAYS: i64 = 60;

/// Rows deleted by one sweep, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionSummary {
    pub bgp_history: u64,
    pub interface_history: u64,
    pub events: u64,
}

impl RetentionSummary {
    pub fn total(&self) -> u64 {
        self.bgp_history + self.interface_history + self.events
    }
}

/// Delete history rows and events past their retention windows.
pub async fn sweep(pool: &DbPool, now: Timestamp) -> Result<RetentionSummary, CollectError> {
    let history_cutoff = now - Duration::days(HISTORY_RETENTION_DAYS);
    let event_cutoff = now - Duration::days(EVENT_RETENTION_DAYS);

    let bgp_history = BgpHistoryRepo::delete_older_than(pool, history_cutoff).await?;
    let interface_history = InterfaceHistoryRepo::delete_older_than(pool, history_cutoff).await?;
    let events = EventRepo::delete_older_than(pool, event_cutoff).await?;

    let summary = RetentionSummary {
        bgp_history,
        interface_history,
        events,
    };
    if summary.total() > 0 {
        tracing::info!(
            bgp_history,
            interface_history,
            events,
            "Retention sweep purged old rows",
        );
    } else {
        tracing::debug!("Retention sweep found nothing to purge");
    }
    Ok(summary)
}
