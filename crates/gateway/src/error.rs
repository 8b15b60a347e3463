//! Gateway error taxonomy.

/// Errors that can occur when executing a command on the device.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The command failed allow-list validation and was never sent.
    #[error(transparent)]
    Rejected(#[from] nemon_core::error::CoreError),

    /// Could not establish or authenticate the SSH session.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The device did not finish responding within the command timeout.
    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    /// A transport-level failure on an established session.
    #[error("Session error: {0}")]
    Session(String),
}

impl GatewayError {
    /// Whether the persistent session should be discarded so the next
    /// call reconnects from scratch.
    pub fn poisons_session(&self) -> bool {
        matches!(self, GatewayError::Timeout(_) | GatewayError::Session(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemon_core::command::validate;

    #[test]
    fn rejected_keeps_validation_message() {
        let err = GatewayError::from(validate("reboot").unwrap_err());
        assert!(err.to_string().contains("Command not permitted"));
        assert!(!err.poisons_session());
    }

    #[test]
    fn transport_failures_poison_the_session() {
        assert!(GatewayError::Timeout(30).poisons_session());
        assert!(GatewayError::Session("channel closed".into()).poisons_session());
        assert!(!GatewayError::Connect("refused".into()).poisons_session());
    }
}
