//! Parsers for the interface-side `display` commands: the brief table,
//! the description table, the per-interface detail block, and the
//! per-interface statistics block.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::text::{is_prompt_line, scale_bps};
use crate::status::LinkStatus;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the `display interface brief` table.
#[derive(Debug, Clone, PartialEq)]
pub struct BriefRecord {
    pub name: String,
    pub status: LinkStatus,
    /// Device-reported utilization columns; used when no capacity is
    /// known to compute utilization from rates.
    pub utilization_in_percent: f64,
    pub utilization_out_percent: f64,
    pub errors_in: i64,
    pub errors_out: i64,
}

/// One row of the `display interface description` table.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionRecord {
    pub name: String,
    pub description: String,
}

/// Fields extracted from a `display interface <name>` detail block.
///
/// Every field is optional: `None` means the block did not contain the
/// corresponding line, letting the collector fall back to coarser data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailRecord {
    pub status: Option<LinkStatus>,
    pub description: Option<String>,
    pub bandwidth_capacity_bps: Option<i64>,
    pub bandwidth_in_bps: Option<i64>,
    pub bandwidth_out_bps: Option<i64>,
    pub packets_in_pps: Option<i64>,
    pub packets_out_pps: Option<i64>,
    pub errors_in: Option<i64>,
    pub errors_out: Option<i64>,
    pub discards_in: Option<i64>,
    pub discards_out: Option<i64>,
}

/// Totals extracted from a `display interface <name> statistics` block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterRecord {
    pub packets_in: Option<i64>,
    pub packets_out: Option<i64>,
    pub errors_in: Option<i64>,
    pub errors_out: Option<i64>,
    pub discards_in: Option<i64>,
    pub discards_out: Option<i64>,
}

// ---------------------------------------------------------------------------
// Regexes (compiled once)
// ---------------------------------------------------------------------------

static PHY_STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*\S+\s+current state\s*:\s*(\S+)").expect("valid regex"));
static PROTO_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*line protocol current state\s*:\s*(\S+)").expect("valid regex")
});
static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*description\s*:\s*(.*)").expect("valid regex"));
static BANDWIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)current\s+BW\s*:\s*(\d+)\s*([KMGkmg]?)(?:bps)?").expect("valid regex")
});
static INPUT_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)input rate:?\s+(\d+)\s+(?:bits/sec|bps)").expect("valid regex")
});
static OUTPUT_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)output rate:?\s+(\d+)\s+(?:bits/sec|bps)").expect("valid regex")
});
static INPUT_PPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)input rate[^\r\n]*?(\d+)\s+(?:packets/sec|pps)").expect("valid regex")
});
static OUTPUT_PPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)output rate[^\r\n]*?(\d+)\s+(?:packets/sec|pps)").expect("valid regex")
});
static INPUT_ERRORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)input\s+errors?\s*:\s*(\d+)").expect("valid regex"));
static OUTPUT_ERRORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)output\s+errors?\s*:\s*(\d+)").expect("valid regex"));
static INPUT_DISCARDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)input[^\r\n]*?(?:discard|drop)s?\s*:\s*(\d+)").expect("valid regex")
});
static OUTPUT_DISCARDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)output[^\r\n]*?(?:discard|drop)s?\s*:\s*(\d+)").expect("valid regex")
});
static INPUT_PACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)input\s*:\s*(\d+)\s+packets").expect("valid regex"));
static OUTPUT_PACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)output\s*:\s*(\d+)\s+packets").expect("valid regex"));

// ---------------------------------------------------------------------------
// Table parsers
// ---------------------------------------------------------------------------

/// Parse the `display interface brief` table.
///
/// ```text
/// PHY: Physical
/// *down: administratively down
/// ^down: standby
/// InUti/OutUti: input utility rate/output utility rate
/// Interface                   PHY     Protocol  InUti OutUti   inErrors  outErrors
/// 100GE1/0/1                  up      up          45%    30%          0          0
/// GigabitEthernet0/0/2        *down   down         0%     0%          0          0
/// ```
///
/// Rows are recognized by shape: at least seven columns with a state
/// token in the PHY position. Legend, header, separator, and prompt
/// lines all fail that shape and are skipped.
pub fn parse_brief_table(output: &str) -> Vec<BriefRecord> {
    let mut records = Vec::new();

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.contains("---")
            || line.starts_with("Interface")
            || is_prompt_line(line)
        {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 7 || !is_state_token(tokens[1]) {
            continue;
        }

        records.push(BriefRecord {
            name: tokens[0].to_string(),
            status: LinkStatus::from_state_tokens(tokens[1], tokens[2]),
            utilization_in_percent: parse_percent(tokens[3]),
            utilization_out_percent: parse_percent(tokens[4]),
            errors_in: tokens[5].parse().unwrap_or(0),
            errors_out: tokens[6].parse().unwrap_or(0),
        });
    }

    if records.is_empty() && !output.trim().is_empty() {
        tracing::warn!("No interfaces recognized in brief table output");
    }

    records
}

/// Parse the `display interface description` table.
///
/// Rows share the brief-table shape (`name PHY Protocol description...`);
/// the description is everything after the protocol column and may be
/// empty.
pub fn parse_description_table(output: &str) -> Vec<DescriptionRecord> {
    let mut records = Vec::new();

    for raw_line in output.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.contains("---")
            || line.starts_with("Interface")
            || is_prompt_line(line)
        {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 || !is_state_token(tokens[1]) {
            continue;
        }

        records.push(DescriptionRecord {
            name: tokens[0].to_string(),
            description: tokens[3..].join(" "),
        });
    }

    records
}

// ---------------------------------------------------------------------------
// Block parsers
// ---------------------------------------------------------------------------

/// Parse a `display interface <name>` detail block.
///
/// ```text
/// GigabitEthernet0/0/1 current state : UP (ifindex: 16)
/// Line protocol current state : UP
/// Description: Link to Provider A
/// Current BW: 1000 Mbps
/// Last 300 seconds input rate: 125000000 bits/sec, 15000 packets/sec
/// Last 300 seconds output rate: 98000000 bits/sec, 12000 packets/sec
/// Input errors: 5, runts: 0, giants: 0
/// Output errors: 2
/// Input discard: 3
/// Output discard: 1
/// ```
pub fn parse_detail_block(output: &str) -> DetailRecord {
    let phy = PHY_STATE_RE.captures(output).and_then(|c| c.get(1));
    let proto = PROTO_STATE_RE.captures(output).and_then(|c| c.get(1));
    let status = phy.map(|p| {
        let phy_token = p.as_str();
        let proto_token = proto.map_or(phy_token, |m| m.as_str());
        LinkStatus::from_state_tokens(phy_token, proto_token)
    });

    let description = DESCRIPTION_RE
        .captures(output)
        .map(|c| c[1].trim().to_string())
        .filter(|d| !d.is_empty());

    let bandwidth_capacity_bps = BANDWIDTH_RE
        .captures(output)
        .and_then(|c| c[1].parse::<i64>().ok().map(|v| scale_bps(v, &c[2])));

    DetailRecord {
        status,
        description,
        bandwidth_capacity_bps,
        bandwidth_in_bps: capture_i64(&INPUT_RATE_RE, output),
        bandwidth_out_bps: capture_i64(&OUTPUT_RATE_RE, output),
        packets_in_pps: capture_i64(&INPUT_PPS_RE, output),
        packets_out_pps: capture_i64(&OUTPUT_PPS_RE, output),
        errors_in: capture_i64(&INPUT_ERRORS_RE, output),
        errors_out: capture_i64(&OUTPUT_ERRORS_RE, output),
        discards_in: capture_i64(&INPUT_DISCARDS_RE, output),
        discards_out: capture_i64(&OUTPUT_DISCARDS_RE, output),
    }
}

/// Parse a `display interface <name> statistics` block.
///
/// ```text
/// Statistics last cleared: never
/// Input:  123456789 packets, 987654321 bytes
/// Output: 112233445 packets, 556677889 bytes
/// Input errors:  5, drops: 0
/// Output errors: 2, drops: 1
/// ```
pub fn parse_counters_block(output: &str) -> CounterRecord {
    CounterRecord {
        packets_in: capture_i64(&INPUT_PACKETS_RE, output),
        packets_out: capture_i64(&OUTPUT_PACKETS_RE, output),
        errors_in: capture_i64(&INPUT_ERRORS_RE, output),
        errors_out: capture_i64(&OUTPUT_ERRORS_RE, output),
        discards_in: capture_i64(&INPUT_DISCARDS_RE, output),
        discards_out: capture_i64(&OUTPUT_DISCARDS_RE, output),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn capture_i64(re: &Regex, output: &str) -> Option<i64> {
    re.captures(output).and_then(|c| c[1].parse().ok())
}

fn is_state_token(token: &str) -> bool {
    let t = token.to_ascii_lowercase();
    matches!(t.as_str(), "up" | "down" | "*down" | "^down" | "offline")
}

fn parse_percent(token: &str) -> f64 {
    token.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}
