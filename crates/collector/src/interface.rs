//! Interface collection.
//!
//! One cycle runs `display interface brief` for the roster, merges in
//! the description table, then enriches each interface with its detail
//! and statistics blocks. Any enrichment failure degrades that
//! interface to brief-table data; only the brief command itself can
//! abort the cycle.

use std::collections::HashMap;

use chrono::Utc;
use nemon_core::observation::InterfaceObservation;
use nemon_core::parse::interface::{
    parse_brief_table, parse_counters_block, parse_description_table, parse_detail_block,
    BriefRecord, CounterRecord, DetailRecord,
};
use nemon_db::DbPool;
use nemon_gateway::CommandGateway;

use crate::error::CollectError;
use crate::reconcile::{reconcile_interfaces, ReconcileSummary};

/// Poll the device and build one observation per interface.
pub async fn collect_interface_observations(
    gateway: &CommandGateway,
) -> Result<Vec<InterfaceObservation>, CollectError> {
    let brief_output = gateway.execute("display interface brief").await?;
    let brief = parse_brief_table(&brief_output);

    // Best-effort description pass; a failure just leaves descriptions
    // empty for this cycle.
    let mut descriptions: HashMap<String, String> = HashMap::new();
    match gateway.execute("display interface description").await {
        Ok(output) => {
            for record in parse_description_table(&output) {
                if !record.description.is_empty() {
                    descriptions.insert(record.name, record.description);
                }
            }
        }
        Err(e) => tracing::warn!(error = %e, "Description collection failed"),
    }

    let mut observations = Vec::with_capacity(brief.len());
    for record in brief {
        let detail = match gateway
            .execute(&format!("display interface {}", record.name))
            .await
        {
            Ok(output) => parse_detail_block(&output),
            Err(e) => {
                tracing::warn!(
                    interface = %record.name,
                    error = %e,
                    "Detail enrichment failed; using brief data",
                );
                DetailRecord::default()
            }
        };

        let counters = match gateway
            .execute(&format!("display interface {} statistics", record.name))
            .await
        {
            Ok(output) => parse_counters_block(&output),
            Err(e) => {
                tracing::warn!(
                    interface = %record.name,
                    error = %e,
                    "Counter enrichment failed",
                );
                CounterRecord::default()
            }
        };

        let description = descriptions.remove(&record.name);
        observations.push(merge_observation(record, description, detail, counters));
    }

    Ok(observations)
}

/// One full interface cycle: collect, then reconcile into the database.
pub async fn run_cycle(
    gateway: &CommandGateway,
    pool: &DbPool,
) -> Result<ReconcileSummary, CollectError> {
    let observations = collect_interface_observations(gateway).await?;
    let summary = reconcile_interfaces(pool, &observations, Utc::now()).await?;
    tracing::info!(
        interfaces = observations.len(),
        discovered = summary.discovered,
        transitions = summary.transitions,
        "Interface collection cycle complete",
    );
    Ok(summary)
}

/// Fold the four per-interface sources into one observation.
///
/// Precedence: detail block, then statistics block, then the brief
/// table columns. Utilization is recomputed from rates whenever a
/// capacity is known, otherwise the brief percentages stand.
fn merge_observation(
    brief: BriefRecord,
    description: Option<String>,
    detail: DetailRecord,
    counters: CounterRecord,
) -> InterfaceObservation {
    let status = detail.status.unwrap_or(brief.status);
    let capacity = detail.bandwidth_capacity_bps.unwrap_or(0);
    let bandwidth_in = detail.bandwidth_in_bps.unwrap_or(0);
    let bandwidth_out = detail.bandwidth_out_bps.unwrap_or(0);

    let utilization_in = InterfaceObservation::utilization_for(bandwidth_in, capacity)
        .unwrap_or(brief.utilization_in_percent);
    let utilization_out = InterfaceObservation::utilization_for(bandwidth_out, capacity)
        .unwrap_or(brief.utilization_out_percent);

    InterfaceObservation {
        name: brief.name,
        status,
        description: description.or(detail.description),
        bandwidth_capacity_bps: capacity,
        bandwidth_in_bps: bandwidth_in,
        bandwidth_out_bps: bandwidth_out,
        packets_in_pps: detail.packets_in_pps.unwrap_or(0),
        packets_out_pps: detail.packets_out_pps.unwrap_or(0),
        errors_in: detail
            .errors_in
            .or(counters.errors_in)
            .unwrap_or(brief.errors_in),
        errors_out: detail
            .errors_out
            .or(counters.errors_out)
            .unwrap_or(brief.errors_out),
        discards_in: detail.discards_in.or(counters.discards_in).unwrap_or(0),
        discards_out: detail.discards_out.or(counters.discards_out).unwrap_or(0),
        utilization_in_percent: utilization_in,
        utilization_out_percent: utilization_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemon_core::status::LinkStatus;

    fn brief(name: &str) -> BriefRecord {
        BriefRecord {
            name: name.to_string(),
            status: LinkStatus::Up,
            utilization_in_percent: 45.0,
            utilization_out_percent: 30.0,
            errors_in: 12,
            errors_out: 7,
        }
    }

    // -- merge_observation --

    #[test]
    fn detail_values_take_precedence() {
        let detail = DetailRecord {
            status: Some(LinkStatus::Down),
            description: Some("from detail".to_string()),
            bandwidth_capacity_bps: Some(1_000_000_000),
            bandwidth_in_bps: Some(250_000_000),
            bandwidth_out_bps: Some(100_000_000),
            packets_in_pps: Some(15_000),
            packets_out_pps: Some(12_000),
            errors_in: Some(99),
            errors_out: Some(98),
            discards_in: Some(3),
            discards_out: Some(1),
        };
        let obs = merge_observation(brief("Ge0/0/1"), None, detail, CounterRecord::default());

        assert_eq!(obs.status, LinkStatus::Down);
        assert_eq!(obs.description.as_deref(), Some("from detail"));
        assert_eq!(obs.errors_in, 99);
        // Recomputed from rates, not the brief columns.
        assert!((obs.utilization_in_percent - 25.0).abs() < 1e-9);
        assert!((obs.utilization_out_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_brief_when_detail_is_empty() {
        let obs = merge_observation(
            brief("Ge0/0/1"),
            None,
            DetailRecord::default(),
            CounterRecord::default(),
        );

        assert_eq!(obs.status, LinkStatus::Up);
        assert_eq!(obs.errors_in, 12);
        assert_eq!(obs.errors_out, 7);
        // No capacity known: the device-reported percentages stand.
        assert!((obs.utilization_in_percent - 45.0).abs() < f64::EPSILON);
        assert_eq!(obs.bandwidth_capacity_bps, 0);
    }

    #[test]
    fn counters_fill_gaps_left_by_detail() {
        let counters = CounterRecord {
            errors_in: Some(40),
            errors_out: Some(20),
            discards_in: Some(5),
            discards_out: Some(2),
            ..Default::default()
        };
        let obs = merge_observation(brief("Ge0/0/1"), None, DetailRecord::default(), counters);

        assert_eq!(obs.errors_in, 40);
        assert_eq!(obs.errors_out, 20);
        assert_eq!(obs.discards_in, 5);
        assert_eq!(obs.discards_out, 2);
    }

    #[test]
    fn description_table_wins_over_detail_description() {
        let detail = DetailRecord {
            description: Some("from detail".to_string()),
            ..Default::default()
        };
        let obs = merge_observation(
            brief("Ge0/0/1"),
            Some("from table".to_string()),
            detail,
            CounterRecord::default(),
        );
        assert_eq!(obs.description.as_deref(), Some("from table"));
    }
}
