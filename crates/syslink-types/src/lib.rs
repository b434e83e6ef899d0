//! Shared domain types for syslink.
//!
//! This crate contains the core domain types used across the workspace:
//! System and Account identifiers, the link outcome and notification types,
//! configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod account;
pub mod config;
pub mod error;
pub mod outcome;
pub mod system;
