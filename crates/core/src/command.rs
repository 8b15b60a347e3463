//! Read-only command policy for the managed device.
//!
//! The monitor must never be able to change device state, so every
//! command is checked against an explicit allow-list before it is sent.
//! A command is permitted iff it starts with one of the allow-listed
//! prefixes (case-insensitive); nothing else reaches the device.

use crate::error::CoreError;

/// Commands the gateway may send, as case-insensitive prefixes.
///
/// Only `display` forms are listed: the device account is treated as
/// read-write, so read-only operation is enforced here rather than
/// assumed from device-side permissions.
pub const ALLOWED_COMMANDS: &[&str] = &[
    "display bgp peer",
    "display bgp routing-table peer",
    "display interface brief",
    "display interface",
    "display interface statistics",
    "display ip interface brief",
    "display cpu-usage",
    "display memory-usage",
    "display version",
    "display current-configuration interface",
];

/// Command words that must never reach the device.
///
/// This list is documentation of the hazard class, not the enforcement
/// mechanism: validation is decided by [`ALLOWED_COMMANDS`] alone, so a
/// permitted read command containing one of these substrings (e.g.
/// `display interface brief` contains `"interface "`) still passes.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "system-view",
    "interface ",
    "undo ",
    "shutdown",
    "reset",
    "save",
    "commit",
    "delete",
    "set ",
    "config",
    "configure",
    "write",
    "erase",
    "clear",
];

/// Validate a command against the read-only allow-list.
///
/// The comparison is on the lowercased, trimmed command. Returns
/// `CoreError::Validation` for anything that does not start with an
/// allow-listed prefix.
pub fn validate(command: &str) -> Result<(), CoreError> {
    let normalized = command.trim().to_ascii_lowercase();

    for allowed in ALLOWED_COMMANDS {
        if normalized.starts_with(allowed) {
            return Ok(());
        }
    }

    Err(CoreError::Validation(format!(
        "Command not permitted: '{}'. Only read-only display commands are allowed.",
        command.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn allow_listed_commands_pass() {
        for allowed in ALLOWED_COMMANDS {
            assert!(validate(allowed).is_ok(), "rejected: {allowed}");
        }
    }

    #[test]
    fn prefix_match_accepts_arguments() {
        assert!(validate("display bgp routing-table peer 10.0.0.1").is_ok());
        assert!(validate("display interface GigabitEthernet0/0/1").is_ok());
        // The description listing rides on the "display interface" prefix.
        assert!(validate("display interface description").is_ok());
    }

    #[test]
    fn validation_is_case_insensitive() {
        assert!(validate("Display BGP Peer").is_ok());
        assert!(validate("  display version  ").is_ok());
    }

    #[test]
    fn non_display_commands_rejected() {
        assert_matches!(validate("reboot"), Err(CoreError::Validation(_)));
        assert_matches!(validate("system-view"), Err(CoreError::Validation(_)));
        assert_matches!(
            validate("interface GigabitEthernet0/0/1"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn empty_command_rejected() {
        assert_matches!(validate(""), Err(CoreError::Validation(_)));
        assert_matches!(validate("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn display_prefix_alone_is_not_enough() {
        // "display" by itself is not an allow-listed prefix.
        assert_matches!(validate("display"), Err(CoreError::Validation(_)));
        assert_matches!(validate("display arp"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn allow_list_decides_despite_forbidden_substrings() {
        // "display interface brief" contains the forbidden keyword
        // "interface " yet is allow-listed, so it must pass.
        assert!(FORBIDDEN_KEYWORDS.contains(&"interface "));
        assert!(validate("display interface brief").is_ok());
        assert!(validate("display current-configuration interface").is_ok());
    }

    #[test]
    fn rejection_message_names_the_command() {
        let err = validate("save").unwrap_err();
        assert!(err.to_string().contains("'save'"));
    }
}
