//! Configuration types for syslink.
//!
//! `LinkConfig` represents the top-level `config.toml` that controls the
//! confirmation timeout and database location.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.syslink/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Seconds to wait for a yes/no answer before treating it as "no".
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Override for the SQLite database URL. Defaults to `{data_dir}/syslink.db`.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_confirm_timeout_secs() -> u64 {
    300
}

impl LinkConfig {
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            confirm_timeout_secs: default_confirm_timeout_secs(),
            database_url: None,
        }
    }
}
