//! The command gateway: the single path between the monitor and the
//! device.

use std::time::Instant;

use chrono::Utc;
use nemon_core::parse::text::clean_output;
use nemon_db::models::command_log::CreateCommandLogEntry;
use nemon_db::repositories::CommandLogRepo;
use nemon_db::DbPool;
use tokio::sync::Mutex;

use crate::config::DeviceConfig;
use crate::error::GatewayError;
use crate::session::ShellSession;

/// Serialized, allow-list-checked command execution against the device.
///
/// Holds at most one shell session, opened lazily on first use and
/// replaced transparently after transport failures. The internal mutex
/// serializes callers so interleaved output from the shared shell is
/// impossible.
pub struct CommandGateway {
    config: DeviceConfig,
    pool: DbPool,
    session: Mutex<Option<ShellSession>>,
}

impl CommandGateway {
    pub fn new(config: DeviceConfig, pool: DbPool) -> Self {
        Self {
            config,
            pool,
            session: Mutex::new(None),
        }
    }

    /// Validate, execute, and clean one command. Every attempt lands in
    /// the audit log, including rejected and failed ones.
    pub async fn execute(&self, command: &str) -> Result<String, GatewayError> {
        let started = Instant::now();
        let result = self.execute_inner(command).await;
        let duration_ms = started.elapsed().as_millis() as i64;

        match &result {
            Ok(output) => tracing::debug!(
                command,
                duration_ms,
                bytes = output.len(),
                "Command executed",
            ),
            Err(e) => tracing::warn!(command, duration_ms, error = %e, "Command failed"),
        }

        self.audit(command, &result, duration_ms).await;
        result
    }

    async fn execute_inner(&self, command: &str) -> Result<String, GatewayError> {
        // Reject before taking the session lock; a forbidden command
        // must never even queue behind a running one.
        nemon_core::command::validate(command)?;

        let mut guard = self.session.lock().await;

        if guard.is_none() {
            let session = ShellSession::open(&self.config).await?;
            tracing::info!(
                host = %self.config.host,
                port = self.config.port,
                "Connected to device"
            );
            *guard = Some(session);
        }
        let session = guard
            .as_mut()
            .ok_or_else(|| GatewayError::Session("Session unavailable".to_string()))?;

        let result = session.run(command, self.config.command_timeout).await;

        match result {
            Ok(raw) => Ok(clean_output(&raw, command)),
            Err(e) => {
                if e.poisons_session() {
                    if let Some(dead) = guard.take() {
                        dead.close().await;
                    }
                    tracing::warn!(
                        host = %self.config.host,
                        error = %e,
                        "Session discarded; next command will reconnect",
                    );
                }
                Err(e)
            }
        }
    }

    /// Record the attempt in the audit log. Audit failures are logged
    /// and swallowed so a broken log table cannot block collection.
    async fn audit(&self, command: &str, result: &Result<String, GatewayError>, duration_ms: i64) {
        let entry = CreateCommandLogEntry {
            command: command.to_string(),
            success: result.is_ok(),
            duration_ms,
            error: result.as_ref().err().map(|e| e.to_string()),
            executed_at: Utc::now(),
        };
        if let Err(e) = CommandLogRepo::insert(&self.pool, &entry).await {
            tracing::warn!(error = %e, "Failed to record command audit entry");
        }
    }
}
