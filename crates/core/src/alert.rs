//! Alert policy: transition classification and suppression windows.
//!
//! The reconciler calls the `classify_*` functions when a stored status
//! differs from a freshly observed one; the alert evaluator uses the
//! window constants to decide whether a matching event already exists.

use crate::status::{is_established, LinkStatus, Severity};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

pub const EVENT_BGP_UP: &str = "bgp_up";
pub const EVENT_BGP_DOWN: &str = "bgp_down";
pub const EVENT_BGP_FLAPPING: &str = "bgp_flapping";
pub const EVENT_INTERFACE_UP: &str = "interface_up";
pub const EVENT_INTERFACE_DOWN: &str = "interface_down";
pub const EVENT_HIGH_ERRORS: &str = "high_errors";

// ---------------------------------------------------------------------------
// Suppression windows
// ---------------------------------------------------------------------------

/// Window for `bgp_down` / `interface_down` alerts: a new event is
/// suppressed while one of the same type and source is younger than this.
pub const STATUS_ALERT_WINDOW_MINUTES: i64 = 5;

/// Window for `high_errors` alerts.
pub const ERROR_ALERT_WINDOW_MINUTES: i64 = 10;

// ---------------------------------------------------------------------------
// Transition classification
// ---------------------------------------------------------------------------

/// Classify a BGP peer status transition into an event type and severity.
///
/// Reaching `Established` is recovery (info), reaching `Down` is an
/// outage (critical), and any other movement between intermediate FSM
/// states is treated as flapping (warning).
pub fn classify_peer_transition(new_status: &str) -> (&'static str, Severity) {
    if is_established(new_status) {
        (EVENT_BGP_UP, Severity::Info)
    } else if new_status.trim().eq_ignore_ascii_case("down") {
        (EVENT_BGP_DOWN, Severity::Critical)
    } else {
        (EVENT_BGP_FLAPPING, Severity::Warning)
    }
}

/// Classify an interface status transition into an event type and severity.
pub fn classify_interface_transition(new_status: LinkStatus) -> (&'static str, Severity) {
    match new_status {
        LinkStatus::Up => (EVENT_INTERFACE_UP, Severity::Info),
        LinkStatus::Down | LinkStatus::AdminDown => (EVENT_INTERFACE_DOWN, Severity::Critical),
    }
}
