//! Status vocabulary for monitored entities.
//!
//! BGP peers keep the raw state token reported by the device (the VRP
//! vocabulary is open-ended: `Established`, `Idle`, `Idle(Admin)`, ...).
//! Interface state is derived from the PHY/Protocol column pair and
//! canonicalized to [`LinkStatus`].

use std::fmt;

/// Event severity, stored as lowercase text in the events table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical operational state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Up,
    Down,
    AdminDown,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Up => "up",
            LinkStatus::Down => "down",
            LinkStatus::AdminDown => "admin-down",
        }
    }

    /// Derive the canonical state from a PHY/Protocol token pair.
    ///
    /// Accepts both the `display interface brief` column tokens
    /// (`up`, `down`, `*down`, `^down`) and the state-line tokens of the
    /// per-interface detail output (`UP`, `DOWN`, `Administratively`).
    /// An interface is `Up` only when both sides report up; the `*down`
    /// marker and `Administratively DOWN` map to `AdminDown`; every other
    /// pairing is `Down`.
    pub fn from_state_tokens(physical: &str, protocol: &str) -> LinkStatus {
        let phy = physical.trim().to_ascii_lowercase();
        if phy.starts_with("*down") || phy.starts_with("admin") {
            return LinkStatus::AdminDown;
        }

        let proto = protocol.trim().to_ascii_lowercase();
        // Huawei suffixes the protocol column for special modes, e.g. "up(s)".
        let proto_up = proto == "up" || proto.starts_with("up(");
        if phy == "up" && proto_up {
            LinkStatus::Up
        } else {
            LinkStatus::Down
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a raw BGP peer state token means the session is fully up.
pub fn is_established(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("established")
}
