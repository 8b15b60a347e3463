//! Parsers for `display bgp peer` and `display bgp routing-table peer`.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::text::{is_prompt_line, parse_uptime};

/// One row of the `display bgp peer` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerRecord {
    pub peer_address: String,
    pub peer_asn: i64,
    pub uptime_seconds: i64,
    /// Raw state token (`Established`, `Idle`, `Idle(Admin)`, ...).
    pub status: String,
}

/// Prefix counters extracted from a per-peer routing-table summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrefixCounts {
    pub received: i64,
    pub advertised: i64,
}

/// Matches a peer table row:
/// `Peer V AS MsgRcvd MsgSent OutQ Up/Down State [PrefRcv]`.
static PEER_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:\.\d{1,3}){3})\s+\d+\s+(\d+)\s+\d+\s+\d+\s+\d+\s+(\S+)\s+([A-Za-z]\S*)")
        .expect("valid regex")
});

static PREFIXES_RECEIVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)received.*?:\s*(\d+)").expect("valid regex"));
static PREFIXES_ADVERTISED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:advertised|sent).*?:\s*(\d+)").expect("valid regex"));

/// Parse the `display bgp peer` summary table.
///
/// ```text
///  BGP local router ID : 192.168.1.1
///  Local AS number : 65000
///  Total number of peers : 2                 Peers in established state : 1
///
///   Peer            V          AS  MsgRcvd  MsgSent  OutQ  Up/Down       State
///   10.0.0.1        4       65001   123456   123457     0  00:05:23  Established
///   10.0.0.2        4       65002        0        0     0     Never         Idle
/// ```
///
/// Banner, header, separator, and prompt lines are skipped; rows that do
/// not match the column shape are ignored. Prefix counters are left at
/// zero here and filled in by the per-peer enrichment command.
pub fn parse_peer_table(output: &str) -> Vec<PeerRecord> {
    let mut peers = Vec::new();

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.contains("Peer")
            || line.contains("BGP")
            || line.contains("---")
            || is_prompt_line(line)
        {
            continue;
        }

        let Some(caps) = PEER_ROW_RE.captures(line) else {
            continue;
        };

        let peer_asn = match caps[2].parse::<i64>() {
            Ok(asn) => asn,
            Err(_) => continue,
        };

        peers.push(PeerRecord {
            peer_address: caps[1].to_string(),
            peer_asn,
            uptime_seconds: parse_uptime(&caps[3]),
            status: caps[4].to_string(),
        });
    }

    if peers.is_empty() && !output.trim().is_empty() {
        tracing::warn!("No BGP peers recognized in peer table output");
    }

    peers
}

/// Parse prefix counters from `display bgp routing-table peer <ip>`.
///
/// Scans for `received ...: N` and `advertised ...: N` (or `sent`) lines
/// case-insensitively; a counter with no matching line stays zero.
pub fn parse_prefix_summary(output: &str) -> PrefixCounts {
    let mut counts = PrefixCounts::default();

    if let Some(caps) = PREFIXES_RECEIVED_RE.captures(output) {
        counts.received = caps[1].parse().unwrap_or(0);
    }
    if let Some(caps) = PREFIXES_ADVERTISED_RE.captures(output) {
        counts.advertised = caps[1].parse().unwrap_or(0);
    }

    counts
}
