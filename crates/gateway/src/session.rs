//! Persistent SSH shell session.
//!
//! Huawei VRP restricts some `display` output on exec channels, so the
//! gateway drives a single interactive shell (PTY + `shell` request)
//! and reads replies until the prompt returns or the device goes quiet.

use std::sync::Arc;
use std::time::Duration;

use nemon_core::parse::text::is_prompt_line;
use russh::client::{self, Handle};
use russh::{Channel, ChannelMsg, Disconnect};

use crate::config::DeviceConfig;
use crate::error::GatewayError;

/// Fallback delimiter: the device is considered done replying once no
/// data has arrived for this long, even if no prompt was recognized.
const QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Accept-any-host-key handler.
///
/// The monitor talks to one operator-configured device on a management
/// network; host key pinning is left to the deployment.
struct AcceptingHandler;

impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// A live authenticated shell on the device.
pub(crate) struct ShellSession {
    handle: Handle<AcceptingHandler>,
    channel: Channel<client::Msg>,
}

impl ShellSession {
    /// Connect, authenticate, and open an interactive shell.
    ///
    /// Drains the login banner and first prompt before returning so the
    /// first command starts from a quiet channel.
    pub(crate) async fn open(config: &DeviceConfig) -> Result<Self, GatewayError> {
        let ssh_config = Arc::new(client::Config::default());

        let mut handle = tokio::time::timeout(
            config.connect_timeout,
            client::connect(
                ssh_config,
                (config.host.as_str(), config.port),
                AcceptingHandler,
            ),
        )
        .await
        .map_err(|_| {
            GatewayError::Connect(format!(
                "Connection to {}:{} timed out after {:?}",
                config.host, config.port, config.connect_timeout
            ))
        })?
        .map_err(|e| {
            GatewayError::Connect(format!(
                "Failed to connect to {}:{}: {e}",
                config.host, config.port
            ))
        })?;

        let auth = handle
            .authenticate_password(config.username.clone(), config.password.clone())
            .await
            .map_err(|e| GatewayError::Connect(format!("Authentication error: {e}")))?;
        if !auth.success() {
            return Err(GatewayError::Connect(format!(
                "Authentication failed for user {}",
                config.username
            )));
        }

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| GatewayError::Connect(format!("Failed to open channel: {e}")))?;
        channel
            .request_pty(false, "xterm", 80, 24, 0, 0, &[])
            .await
            .map_err(|e| GatewayError::Connect(format!("Failed to request PTY: {e}")))?;
        channel
            .request_shell(false)
            .await
            .map_err(|e| GatewayError::Connect(format!("Failed to start shell: {e}")))?;

        let mut session = Self { handle, channel };

        tokio::time::timeout(config.connect_timeout, session.read_until_quiet())
            .await
            .map_err(|_| {
                GatewayError::Connect("Timed out waiting for shell prompt".to_string())
            })??;

        Ok(session)
    }

    /// Send one command line and capture everything the device prints
    /// until the next prompt, or until the quiet window expires.
    pub(crate) async fn run(
        &mut self,
        command: &str,
        command_timeout: Duration,
    ) -> Result<String, GatewayError> {
        let line = format!("{command}\n");
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(|e| GatewayError::Session(format!("Failed to send command: {e}")))?;

        tokio::time::timeout(command_timeout, self.read_until_quiet())
            .await
            .map_err(|_| GatewayError::Timeout(command_timeout.as_secs()))?
    }

    /// Accumulate channel data until the capture ends in a fresh prompt
    /// line, or until no message arrives within [`QUIET_WINDOW`].
    async fn read_until_quiet(&mut self) -> Result<String, GatewayError> {
        let mut output = String::new();
        loop {
            match tokio::time::timeout(QUIET_WINDOW, self.channel.wait()).await {
                // Quiet window expired: the device is done replying.
                Err(_) => break,
                Ok(Some(ChannelMsg::Data { data })) => {
                    output.push_str(&String::from_utf8_lossy(&data));
                    if ends_with_prompt(&output) {
                        break;
                    }
                }
                Ok(Some(ChannelMsg::ExtendedData { data, .. })) => {
                    output.push_str(&String::from_utf8_lossy(&data));
                }
                Ok(Some(ChannelMsg::Eof)) | Ok(Some(ChannelMsg::Close)) | Ok(None) => {
                    return Err(GatewayError::Session(
                        "Channel closed by device".to_string(),
                    ));
                }
                Ok(Some(_)) => {}
            }
        }
        Ok(output)
    }

    /// Disconnect cleanly. Failures are ignored; the session is gone
    /// either way.
    pub(crate) async fn close(self) {
        let _ = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await;
    }
}

/// Whether the capture so far ends in a bare `<host>` / `[host]` prompt
/// line, meaning the device has finished the previous command. The
/// echoed command line does not qualify because it carries the command
/// text after the prompt.
fn ends_with_prompt(output: &str) -> bool {
    output
        .rsplit('\n')
        .next()
        .is_some_and(is_prompt_line)
}
