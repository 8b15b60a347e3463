//! Snapshot types produced by the collectors and consumed by the
//! reconciler. One observation is one entity as seen in one cycle,
//! already enriched and normalized.

use crate::status::LinkStatus;

/// A BGP peer as observed in a single collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerObservation {
    pub peer_address: String,
    pub peer_asn: i64,
    /// Raw state token as reported by the device (`Established`, `Idle`, ...).
    pub status: String,
    pub uptime_seconds: i64,
    pub prefixes_received: i64,
    pub prefixes_sent: i64,
}

/// An interface as observed in a single collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceObservation {
    pub name: String,
    pub status: LinkStatus,
    pub description: Option<String>,
    /// Configured line capacity in bits/sec; 0 when the device did not
    /// report one.
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
}

impl InterfaceObservation {
    /// Percent utilization for an observed rate, or `None` when the
    /// capacity is unknown (callers then fall back to the device's own
    /// utilization columns).
    pub fn utilization_for(rate_bps: i64, capacity_bps: i64) -> Option<f64> {
        if capacity_bps > 0 {
            Some(rate_bps as f64 / capacity_bps as f64 * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_computed_when_capacity_known() {
        let pct = InterfaceObservation::utilization_for(250_000_000, 1_000_000_000).unwrap();
        assert!((pct - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn utilization_unknown_without_capacity() {
        assert_eq!(InterfaceObservation::utilization_for(1000, 0), None);
    }
}
