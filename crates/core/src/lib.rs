//! Domain logic for the nemon telemetry monitor.
//!
//! Everything in this crate is pure: command validation, CLI output
//! parsing, status classification, and alert policy. No I/O happens
//! here -- the gateway, collector, and db crates drive these functions.

pub mod alert;
pub mod command;
pub mod error;
pub mod observation;
pub mod parse;
pub mod status;
pub mod types;
