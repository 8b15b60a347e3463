//! Entity models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where the row is not built from a
//!   collector observation
//! - Aggregate structs returned by the stats queries

pub mod bgp;
pub mod command_log;
pub mod event;
pub mod interface;
