//! Parsers for Huawei VRP `display` command output.
//!
//! All parsers are pure `&str -> typed records` functions and never
//! fail: missing or malformed sections yield empty collections or
//! `None`/zero fields, with a diagnostic on the `tracing` warn level.
//! Layout conventions (header tokens, `---` separators, `<host>` prompt
//! lines) are fixed heuristics, not configuration.

pub mod bgp;
pub mod interface;
pub mod text;
