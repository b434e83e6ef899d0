//! Infrastructure layer for syslink.
//!
//! Contains implementations of the ports defined in `syslink-core`:
//! SQLite link storage, a channel-based confirmation prompt for chat
//! transports, and configuration loading.

pub mod config;
pub mod prompt;
pub mod sqlite;
