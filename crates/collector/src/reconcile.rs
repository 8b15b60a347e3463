//! Per-cycle state reconciliation.
//!
//! Each reconcile runs in a single transaction: every observation is
//! either a discovery (insert), a transition (update plus event), or a
//! refresh (metrics-only update), and always appends a history row. An
//! error on any record rolls the whole cycle back so readers never see
//! a half-applied cycle.

use nemon_core::alert::{classify_interface_transition, classify_peer_transition};
use nemon_core::observation::{InterfaceObservation, PeerObservation};
use nemon_core::types::Timestamp;
use nemon_db::models::event::CreateEvent;
use nemon_db::repositories::{
    BgpHistoryRepo, BgpSessionRepo, EventRepo, InterfaceHistoryRepo, InterfaceRepo,
};
use nemon_db::DbPool;
use serde_json::json;

use crate::error::CollectError;

/// Counts of what one reconcile pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub discovered: u64,
    pub updated: u64,
    pub transitions: u64,
}

/// Reconcile one cycle of BGP observations.
pub async fn reconcile_bgp(
    pool: &DbPool,
    observations: &[PeerObservation],
    now: Timestamp,
) -> Result<ReconcileSummary, CollectError> {
    let mut summary = ReconcileSummary::default();
    let mut tx = pool.begin().await?;

    for obs in observations {
        match BgpSessionRepo::get_by_peer_tx(&mut tx, &obs.peer_address).await? {
            None => {
                BgpSessionRepo::insert(&mut tx, obs, now).await?;
                summary.discovered += 1;
                tracing::info!(
                    peer = %obs.peer_address,
                    status = %obs.status,
                    "New BGP peer discovered",
                );
            }
            Some(existing) if existing.status != obs.status => {
                BgpSessionRepo::update_transition(&mut tx, existing.id, obs, now).await?;
                let (event_type, severity) = classify_peer_transition(&obs.status);
                let event = CreateEvent {
                    event_type: event_type.to_string(),
                    severity: severity.as_str().to_string(),
                    source: format!("BGP:{}", obs.peer_address),
                    message: format!(
                        "BGP peer {} changed state: {} -> {}",
                        obs.peer_address, existing.status, obs.status
                    ),
                    details: Some(
                        json!({
                            "previous_status": existing.status,
                            "new_status": obs.status,
                            "prefixes_received": obs.prefixes_received,
                        })
                        .to_string(),
                    ),
                    created_at: now,
                };
                EventRepo::insert_tx(&mut tx, &event).await?;
                summary.transitions += 1;
            }
            Some(existing) => {
                BgpSessionRepo::update_metrics(&mut tx, existing.id, obs, now).await?;
                summary.updated += 1;
            }
        }

        BgpHistoryRepo::insert(&mut tx, obs, now).await?;
    }

    tx.commit().await?;
    Ok(summary)
}

/// Reconcile one cycle of interface observations.
pub async fn reconcile_interfaces(
    pool: &DbPool,
    observations: &[InterfaceObservation],
    now: Timestamp,
) -> Result<ReconcileSummary, CollectError> {
    let mut summary = ReconcileSummary::default();
    let mut tx = pool.begin().await?;

    for obs in observations {
        match InterfaceRepo::get_by_name_tx(&mut tx, &obs.name).await? {
            None => {
                InterfaceRepo::insert(&mut tx, obs, now).await?;
                summary.discovered += 1;
                tracing::info!(
                    interface = %obs.name,
                    status = %obs.status,
                    "New interface discovered",
                );
            }
            Some(existing) if existing.status != obs.status.as_str() => {
                InterfaceRepo::update_transition(&mut tx, existing.id, obs, now).await?;
                let (event_type, severity) = classify_interface_transition(obs.status);
                let event = CreateEvent {
                    event_type: event_type.to_string(),
                    severity: severity.as_str().to_string(),
                    source: format!("Interface:{}", obs.name),
                    message: format!(
                        "Interface {} changed state: {} -> {}",
                        obs.name, existing.status, obs.status
                    ),
                    details: Some(
                        json!({
                            "previous_status": existing.status,
                            "new_status": obs.status.as_str(),
                            "errors_in": obs.errors_in,
                            "errors_out": obs.errors_out,
                        })
                        .to_string(),
                    ),
                    created_at: now,
                };
                EventRepo::insert_tx(&mut tx, &event).await?;
                summary.transitions += 1;
            }
            Some(existing) => {
                InterfaceRepo::update_metrics(&mut tx, existing.id, obs, now).await?;
                summary.updated += 1;
            }
        }

        InterfaceHistoryRepo::insert(&mut tx, obs, now).await?;
    }

    tx.commit().await?;
    Ok(summary)
}
