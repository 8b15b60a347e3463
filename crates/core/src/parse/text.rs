//! Shared text helpers for VRP output: uptime and capacity conversion,
//! prompt detection, and echo/prompt stripping of captured shell output.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the day component of a compound uptime token (`1d00h05m`).
static UPTIME_DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)d").expect("valid regex"));
static UPTIME_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)h").expect("valid regex"));
static UPTIME_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)m").expect("valid regex"));

/// Convert a VRP uptime token to seconds.
///
/// Supported forms:
/// - `HH:MM:SS` and `MM:SS`
/// - compound `1d00h05m` (each unit optional)
/// - `Never` or an empty token, meaning the session never came up
///
/// Anything unrecognized maps to 0.
pub fn parse_uptime(raw: &str) -> i64 {
    let token = raw.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("never") {
        return 0;
    }

    if token.contains(':') {
        let parts: Vec<i64> = token
            .split(':')
            .map(|p| p.parse::<i64>().unwrap_or(-1))
            .collect();
        if parts.iter().any(|&p| p < 0) {
            return 0;
        }
        return match parts.as_slice() {
            [h, m, s] => h * 3600 + m * 60 + s,
            [m, s] => m * 60 + s,
            _ => 0,
        };
    }

    let mut total = 0i64;
    if let Some(c) = UPTIME_DAYS_RE.captures(token) {
        total += c[1].parse::<i64>().unwrap_or(0) * 86_400;
    }
    if let Some(c) = UPTIME_HOURS_RE.captures(token) {
        total += c[1].parse::<i64>().unwrap_or(0) * 3600;
    }
    if let Some(c) = UPTIME_MINUTES_RE.captures(token) {
        total += c[1].parse::<i64>().unwrap_or(0) * 60;
    }
    total
}

/// Scale a bandwidth figure to bits/sec from its unit prefix.
///
/// `unit` is the text following the number in a `Current BW` field:
/// `Gbps`, `Mbps`, `Kbps`, a bare `G`/`M`/`K`, or empty for plain bps.
pub fn scale_bps(value: i64, unit: &str) -> i64 {
    match unit.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('G') => value * 1_000_000_000,
        Some('M') => value * 1_000_000,
        Some('K') => value * 1_000,
        _ => value,
    }
}

/// Whether a line is a VRP prompt (`<host>` in user view, `[host]` in
/// system view). Prompt host names carry no whitespace.
pub fn is_prompt_line(line: &str) -> bool {
    let t = line.trim();
    if t.len() < 3 || t.contains(char::is_whitespace) {
        return false;
    }
    (t.starts_with('<') && t.ends_with('>')) || (t.starts_with('[') && t.ends_with(']'))
}

/// Strip the echoed command and the trailing prompt from captured shell
/// output, normalizing line endings.
///
/// The interactive shell echoes the sent command (possibly prefixed by
/// the prompt, as in `<ne8000>display bgp peer`) before the payload and
/// prints a fresh prompt after it; neither belongs to the command output.
pub fn clean_output(raw: &str, command: &str) -> String {
    let command = command.trim();
    let mut lines: Vec<&str> = raw.lines().map(|l| l.trim_end_matches('\r')).collect();

    while let Some(last) = lines.last() {
        let t = last.trim();
        if t.is_empty() || is_prompt_line(t) {
            lines.pop();
        } else {
            break;
        }
    }

    while let Some(first) = lines.first() {
        let t = first.trim();
        let is_echo = !command.is_empty() && t.ends_with(command);
        if t.is_empty() || is_echo || is_prompt_line(t) {
            lines.remove(0);
        } else {
            break;
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_uptime --

    #[test]
    fn uptime_hms() {
        assert_eq!(parse_uptime("00:05:23"), 323);
        assert_eq!(parse_uptime("01:00:00"), 3600);
    }

    #[test]
    fn uptime_ms() {
        assert_eq!(parse_uptime("05:23"), 323);
    }

    #[test]
    fn uptime_compound() {
        assert_eq!(parse_uptime("1d00h05m"), 86_700);
        assert_eq!(parse_uptime("2d"), 172_800);
        assert_eq!(parse_uptime("3h10m"), 11_400);
    }

    #[test]
    fn uptime_never_and_empty_are_zero() {
        assert_eq!(parse_uptime("Never"), 0);
        assert_eq!(parse_uptime("never"), 0);
        assert_eq!(parse_uptime(""), 0);
        assert_eq!(parse_uptime("   "), 0);
    }

    #[test]
    fn uptime_garbage_is_zero() {
        assert_eq!(parse_uptime("ab:cd:ef"), 0);
        assert_eq!(parse_uptime("???"), 0);
    }

    // -- scale_bps --

    #[test]
    fn capacity_units_scale() {
        assert_eq!(scale_bps(1, "Gbps"), 1_000_000_000);
        assert_eq!(scale_bps(1000, "Mbps"), 1_000_000_000);
        assert_eq!(scale_bps(64, "kbps"), 64_000);
        assert_eq!(scale_bps(512, ""), 512);
        assert_eq!(scale_bps(10, "G"), 10_000_000_000);
    }

    // -- is_prompt_line --

    #[test]
    fn prompt_lines_detected() {
        assert!(is_prompt_line("<ne8000>"));
        assert!(is_prompt_line("  <ne8000-lab> "));
        assert!(is_prompt_line("[~ne8000]"));
    }

    #[test]
    fn non_prompt_lines_rejected() {
        assert!(!is_prompt_line("GigabitEthernet0/0/1  up  up"));
        assert!(!is_prompt_line("<a b>"));
        assert!(!is_prompt_line(""));
        assert!(!is_prompt_line("<>"));
    }

    // -- clean_output --

    #[test]
    fn strips_echo_and_prompt() {
        let raw = "<ne8000>display bgp peer\r\n line one\r\n line two\r\n<ne8000>";
        assert_eq!(clean_output(raw, "display bgp peer"), " line one\n line two");
    }

    #[test]
    fn strips_bare_echo_without_prompt_prefix() {
        let raw = "display version\nVRP (R) software\n<ne8000>\n";
        assert_eq!(clean_output(raw, "display version"), "VRP (R) software");
    }

    #[test]
    fn keeps_payload_untouched_when_nothing_to_strip() {
        let raw = "only payload\nsecond line";
        assert_eq!(clean_output(raw, "display bgp peer"), raw);
    }

    #[test]
    fn empty_capture_stays_empty() {
        assert_eq!(clean_output("", "display bgp peer"), "");
        assert_eq!(clean_output("<ne8000>", "display bgp peer"), "");
    }
}
