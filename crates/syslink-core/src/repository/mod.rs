//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (syslink-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod link;
