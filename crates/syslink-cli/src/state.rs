//! Application state wiring the link service to its concrete adapters.
//!
//! The service is generic over repository/prompt traits; AppState pins it to
//! SQLite storage and the terminal prompt.

use std::path::PathBuf;
use std::sync::Arc;

use syslink_core::service::link::AccountLinkService;
use syslink_infra::config::{
    load_config, resolve_confirm_timeout, resolve_data_dir, resolve_database_url,
};
use syslink_infra::sqlite::link::SqliteLinkRepository;
use syslink_infra::sqlite::pool::DatabasePool;

use crate::prompt::TerminalPrompt;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteLinkService = AccountLinkService<SqliteLinkRepository, TerminalPrompt>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<ConcreteLinkService>,
    /// Separate handle for system registration and listings, which are not
    /// part of the link service.
    pub systems: Arc<SqliteLinkRepository>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_url = resolve_database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;

        let link_service = AccountLinkService::new(
            SqliteLinkRepository::new(db_pool.clone()),
            TerminalPrompt,
            resolve_confirm_timeout(&config),
        );

        Ok(Self {
            link_service: Arc::new(link_service),
            systems: Arc::new(SqliteLinkRepository::new(db_pool.clone())),
            data_dir,
            db_pool,
        })
    }
}
