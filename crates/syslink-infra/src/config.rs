//! Configuration loader and data directory resolution.
//!
//! Reads `config.toml` from the data directory (`~/.syslink/` in production)
//! and deserializes it into [`LinkConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use syslink_types::config::LinkConfig;

use crate::sqlite::pool::database_url_for;

/// Shortest confirmation window accepted from configuration.
const MIN_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SYSLINK_DATA_DIR` environment variable
/// 2. `~/.syslink`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SYSLINK_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".syslink");
    }

    // Last resort: current directory
    PathBuf::from(".syslink")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`LinkConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> LinkConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return LinkConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return LinkConfig::default();
        }
    };

    match toml::from_str::<LinkConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            LinkConfig::default()
        }
    }
}

/// Confirmation timeout with a floor, so a typo cannot make prompts unanswerable.
pub fn resolve_confirm_timeout(config: &LinkConfig) -> Duration {
    config.confirm_timeout().max(MIN_CONFIRM_TIMEOUT)
}

/// Database URL from config, or `{data_dir}/syslink.db`.
pub fn resolve_database_url(config: &LinkConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_for(data_dir))
}
