//! Collection error taxonomy.

/// Errors that can abort a collection cycle or alert check.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The gateway could not execute a required command.
    #[error(transparent)]
    Gateway(#[from] nemon_gateway::GatewayError),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
