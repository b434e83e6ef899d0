//! SQLite link repository implementation.
//!
//! Implements `LinkRepository` from `syslink-core` using sqlx with split
//! read/write pools. Both link rules are enforced by the database itself:
//! `accounts.uid` is the primary key (one owner per account) and removals are
//! a conditional delete inside a writer transaction (never the last account).

use chrono::{DateTime, Utc};
use sqlx::Row;
use syslink_core::repository::link::LinkRepository;
use syslink_types::account::AccountId;
use syslink_types::error::RepositoryError;
use syslink_types::system::SystemId;
use tracing::debug;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `LinkRepository`.
pub struct SqliteLinkRepository {
    pool: DatabasePool,
}

/// A system row with its current account count (CLI listings).
#[derive(Debug, Clone)]
pub struct SystemRecord {
    pub id: SystemId,
    pub created_at: DateTime<Utc>,
    pub account_count: i64,
}

impl SqliteLinkRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Register a new system owned by `owner`.
    ///
    /// Fails with `RepositoryError::Conflict` if `owner` already belongs to a system.
    pub async fn create_system(&self, owner: AccountId) -> Result<SystemId, RepositoryError> {
        let id = SystemId::new();

        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("INSERT INTO systems (id, created_at) VALUES (?, ?)")
            .bind(id.to_string())
            .bind(format_datetime(&Utc::now()))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        sqlx::query("INSERT INTO accounts (uid, system_id) VALUES (?, ?)")
            .bind(account_to_db(owner))
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, owner))?;

        tx.commit().await.map_err(query_error)?;

        debug!(system = %id, %owner, "system created");
        Ok(id)
    }

    /// List all systems, newest first.
    pub async fn list_systems(&self) -> Result<Vec<SystemRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT s.id, s.created_at, COUNT(a.uid) AS account_count
             FROM systems s LEFT JOIN accounts a ON a.system_id = s.id
             GROUP BY s.id
             ORDER BY s.created_at DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(query_error)?;
                let created_at: String = row.try_get("created_at").map_err(query_error)?;
                let account_count: i64 = row.try_get("account_count").map_err(query_error)?;
                Ok(SystemRecord {
                    id: parse_system_id(&id)?,
                    created_at: parse_datetime(&created_at)?,
                    account_count,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// SQLite integers are signed; platform ids fit in 63 bits, and the cast is
// lossless both ways regardless.
fn account_to_db(account: AccountId) -> i64 {
    account.0 as i64
}

fn account_from_db(uid: i64) -> AccountId {
    AccountId(uid as u64)
}

fn parse_system_id(s: &str) -> Result<SystemId, RepositoryError> {
    s.parse::<SystemId>()
        .map_err(|e| RepositoryError::Query(format!("invalid system id: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn map_insert_error(e: sqlx::Error, account: AccountId) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let message = db_err.message();
        if message.contains("UNIQUE") {
            return RepositoryError::Conflict(format!(
                "account {account} is already linked to a system"
            ));
        }
        if message.contains("FOREIGN KEY") {
            return RepositoryError::NotFound;
        }
    }
    query_error(e)
}

impl LinkRepository for SqliteLinkRepository {
    async fn linked_accounts(&self, system: &SystemId) -> Result<Vec<AccountId>, RepositoryError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT uid FROM accounts WHERE system_id = ? ORDER BY uid")
                .bind(system.to_string())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_error)?;

        Ok(rows.into_iter().map(|(uid,)| account_from_db(uid)).collect())
    }

    async fn owning_system(&self, account: AccountId) -> Result<Option<SystemId>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT system_id FROM accounts WHERE uid = ?")
            .bind(account_to_db(account))
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|(id,)| parse_system_id(&id)).transpose()
    }

    async fn add_link(&self, system: &SystemId, account: AccountId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO accounts (uid, system_id) VALUES (?, ?)")
            .bind(account_to_db(account))
            .bind(system.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_insert_error(e, account))?;

        Ok(())
    }

    async fn remove_link(&self, system: &SystemId, account: AccountId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        let deleted = sqlx::query(
            "DELETE FROM accounts
             WHERE uid = ? AND system_id = ?
               AND (SELECT COUNT(*) FROM accounts WHERE system_id = ?) > 1",
        )
        .bind(account_to_db(account))
        .bind(system.to_string())
        .bind(system.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_error)?
        .rows_affected();

        if deleted == 0 {
            let linked: Option<(i64,)> =
                sqlx::query_as("SELECT uid FROM accounts WHERE uid = ? AND system_id = ?")
                    .bind(account_to_db(account))
                    .bind(system.to_string())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(query_error)?;
            tx.rollback().await.map_err(query_error)?;

            return Err(match linked {
                Some(_) => RepositoryError::Conflict(format!(
                    "account {account} is the last account linked to system {system}"
                )),
                None => RepositoryError::NotFound,
            });
        }

        tx.commit().await.map_err(query_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url_for;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url_for(dir.path());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_system_links_owner() {
        let repo = SqliteLinkRepository::new(test_pool().await);

        let system = repo.create_system(AccountId(100)).await.unwrap();

        assert_eq!(repo.linked_accounts(&system).await.unwrap(), vec![AccountId(100)]);
        assert_eq!(repo.owning_system(AccountId(100)).await.unwrap(), Some(system));
    }

    #[tokio::test]
    async fn test_create_system_for_linked_account_conflicts() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        repo.create_system(AccountId(100)).await.unwrap();

        let err = repo.create_system(AccountId(100)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.list_systems().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_and_list_links() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let system = repo.create_system(AccountId(300)).await.unwrap();

        repo.add_link(&system, AccountId(200)).await.unwrap();
        repo.add_link(&system, AccountId(u64::MAX)).await.unwrap();

        assert_eq!(
            repo.linked_accounts(&system).await.unwrap().len(),
            3,
        );
        assert_eq!(
            repo.owning_system(AccountId(u64::MAX)).await.unwrap(),
            Some(system)
        );
    }

    #[tokio::test]
    async fn test_add_link_to_other_system_conflicts() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let s1 = repo.create_system(AccountId(1)).await.unwrap();
        let s2 = repo.create_system(AccountId(2)).await.unwrap();

        let err = repo.add_link(&s1, AccountId(2)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.owning_system(AccountId(2)).await.unwrap(), Some(s2));
    }

    #[tokio::test]
    async fn test_add_link_to_unknown_system_is_not_found() {
        let repo = SqliteLinkRepository::new(test_pool().await);

        let err = repo.add_link(&SystemId::new(), AccountId(5)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_owning_system_unknown_account() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        assert_eq!(repo.owning_system(AccountId(42)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_link() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let system = repo.create_system(AccountId(1)).await.unwrap();
        repo.add_link(&system, AccountId(2)).await.unwrap();

        repo.remove_link(&system, AccountId(2)).await.unwrap();

        assert_eq!(repo.linked_accounts(&system).await.unwrap(), vec![AccountId(1)]);
        assert_eq!(repo.owning_system(AccountId(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_last_link_is_refused() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let system = repo.create_system(AccountId(1)).await.unwrap();

        let err = repo.remove_link(&system, AccountId(1)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.linked_accounts(&system).await.unwrap(), vec![AccountId(1)]);
    }

    #[tokio::test]
    async fn test_remove_unlinked_account_is_not_found() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let s1 = repo.create_system(AccountId(1)).await.unwrap();
        repo.add_link(&s1, AccountId(2)).await.unwrap();
        let s2 = repo.create_system(AccountId(3)).await.unwrap();

        let err = repo.remove_link(&s1, AccountId(3)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(repo.owning_system(AccountId(3)).await.unwrap(), Some(s2));
    }

    #[tokio::test]
    async fn test_concurrent_removals_keep_one_account() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let system = repo.create_system(AccountId(1)).await.unwrap();
        repo.add_link(&system, AccountId(2)).await.unwrap();

        let (a, b) = tokio::join!(
            repo.remove_link(&system, AccountId(1)),
            repo.remove_link(&system, AccountId(2)),
        );

        assert!(a.is_ok() != b.is_ok(), "exactly one removal must win");
        assert_eq!(repo.linked_accounts(&system).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_systems_counts_accounts() {
        let repo = SqliteLinkRepository::new(test_pool().await);
        let s1 = repo.create_system(AccountId(1)).await.unwrap();
        repo.add_link(&s1, AccountId(2)).await.unwrap();
        repo.create_system(AccountId(3)).await.unwrap();

        let systems = repo.list_systems().await.unwrap();

        assert_eq!(systems.len(), 2);
        let first = systems.iter().find(|s| s.id == s1).unwrap();
        assert_eq!(first.account_count, 2);
    }
}
