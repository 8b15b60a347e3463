//! Collection pipeline: polls the device through the gateway, parses
//! telemetry into observations, reconciles them against stored state,
//! evaluates alert rules, and prunes old rows.

pub mod alerts;
pub mod bgp;
pub mod error;
pub mod interface;
pub mod reconcile;
pub mod retention;
pub mod scheduler;

pub use error::CollectError;
