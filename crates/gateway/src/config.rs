//! Device connection configuration.

use std::time::Duration;

/// SSH connection settings for the monitored device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl DeviceConfig {
    /// Load the device configuration from environment variables.
    ///
    /// Panics when a required variable is missing or malformed; the
    /// monitor cannot run without a device to talk to.
    pub fn from_env() -> Self {
        let host = std::env::var("SSH_HOST").expect("SSH_HOST must be set");
        let port = std::env::var("SSH_PORT")
            .unwrap_or_else(|_| "22".to_string())
            .parse()
            .expect("SSH_PORT must be a valid port number");
        let username = std::env::var("SSH_USER").expect("SSH_USER must be set");
        let password = std::env::var("SSH_PASSWORD").expect("SSH_PASSWORD must be set");
        let connect_timeout = Duration::from_secs(
            std::env::var("SSH_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("SSH_CONNECT_TIMEOUT_SECS must be a number"),
        );
        let command_timeout = Duration::from_secs(
            std::env::var("SSH_COMMAND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("SSH_COMMAND_TIMEOUT_SECS must be a number"),
        );

        Self {
            host,
            port,
            username,
            password,
            connect_timeout,
            command_timeout,
        }
    }
}
