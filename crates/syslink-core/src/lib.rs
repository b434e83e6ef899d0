//! Business logic and port trait definitions for syslink.
//!
//! This crate defines the "ports" (repository and prompt traits) that the
//! infrastructure layer implements. It depends only on `syslink-types` --
//! never on `syslink-infra` or any database/IO crate.

pub mod context;
pub mod prompt;
pub mod repository;
pub mod service;
