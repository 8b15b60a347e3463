//! SSH command gateway for the monitored device.
//!
//! All device access flows through [`CommandGateway`]: commands are
//! checked against a read-only allow-list, executed over a persistent
//! shell session, cleaned of echo and prompt noise, and audited to the
//! command log.

pub mod config;
pub mod error;
pub mod gateway;
mod session;

pub use config::DeviceConfig;
pub use error::GatewayError;
pub use gateway::CommandGateway;
