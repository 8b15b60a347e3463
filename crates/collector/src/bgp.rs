//! BGP peer collection.
//!
//! One cycle runs `display bgp peer` for the peer table, then enriches
//! each peer with prefix counts from its routing-table summary.
//! Enrichment failures degrade to zero counts; only the table command
//! itself can abort the cycle.

use chrono::Utc;
use nemon_core::observation::PeerObservation;
use nemon_core::parse::bgp::{parse_peer_table, parse_prefix_summary, PrefixCounts};
use nemon_db::DbPool;
use nemon_gateway::CommandGateway;

use crate::error::CollectError;
use crate::reconcile::{reconcile_bgp, ReconcileSummary};

/// Poll the device and build one observation per peer.
pub async fn collect_bgp_observations(
    gateway: &CommandGateway,
) -> Result<Vec<PeerObservation>, CollectError> {
    let output = gateway.execute("display bgp peer").await?;
    let peers = parse_peer_table(&output);

    let mut observations = Vec::with_capacity(peers.len());
    for record in peers {
        let command = format!("display bgp routing-table peer {}", record.peer_address);
        let counts = match gateway.execute(&command).await {
            Ok(summary) => parse_prefix_summary(&summary),
            Err(e) => {
                tracing::warn!(
                    peer = %record.peer_address,
                    error = %e,
                    "Prefix enrichment failed; recording zero counts",
                );
                PrefixCounts::default()
            }
        };

        observations.push(PeerObservation {
            peer_address: record.peer_address,
            peer_asn: record.peer_asn,
            status: record.status,
            uptime_seconds: record.uptime_seconds,
            prefixes_received: counts.received,
            prefixes_sent: counts.advertised,
        });
    }

    Ok(observations)
}

/// One full BGP cycle: collect, then reconcile into the database.
pub async fn run_cycle(
    gateway: &CommandGateway,
    pool: &DbPool,
) -> Result<ReconcileSummary, CollectError> {
    let observations = collect_bgp_observations(gateway).await?;
    let summary = reconcile_bgp(pool, &observations, Utc::now()).await?;
    tracing::info!(
        peers = observations.len(),
        discovered = summary.discovered,
        transitions = summary.transitions,
        "BGP collection cycle complete",
    );
    Ok(summary)
}
