//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&DbPool` as the first argument. Methods that must run
//! inside a reconcile cycle take the open transaction instead.

pub mod bgp_history_repo;
pub mod bgp_session_repo;
pub mod command_log_repo;
pub mod event_repo;
pub mod interface_history_repo;
pub mod interface_repo;

pub use bgp_history_repo::BgpHistoryRepo;
pub use bgp_session_repo::BgpSessionRepo;
pub use command_log_repo::CommandLogRepo;
pub use event_repo::{EventFilter, EventRepo};
pub use interface_history_repo::InterfaceHistoryRepo;
pub use interface_repo::InterfaceRepo;
