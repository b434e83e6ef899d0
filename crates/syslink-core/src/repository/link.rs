//! Link repository trait definition.

use syslink_types::account::AccountId;
use syslink_types::error::RepositoryError;
use syslink_types::system::SystemId;

/// Repository trait for (System, Account) link persistence.
///
/// Implementations live in syslink-infra (e.g., SqliteLinkRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait LinkRepository: Send + Sync {
    /// All accounts currently linked to `system`.
    fn linked_accounts(
        &self,
        system: &SystemId,
    ) -> impl std::future::Future<Output = Result<Vec<AccountId>, RepositoryError>> + Send;

    /// The system currently owning `account`, if any.
    fn owning_system(
        &self,
        account: AccountId,
    ) -> impl std::future::Future<Output = Result<Option<SystemId>, RepositoryError>> + Send;

    /// Link `account` to `system`.
    ///
    /// Must fail with `RepositoryError::Conflict` if the account is already
    /// owned by any system, so that concurrent links cannot break the
    /// one-owner rule.
    fn add_link(
        &self,
        system: &SystemId,
        account: AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the link between `system` and `account`.
    ///
    /// Must be atomic with respect to the last-account rule: returns
    /// `RepositoryError::Conflict` instead of removing the only remaining
    /// account, and `RepositoryError::NotFound` if the link does not exist.
    fn remove_link(
        &self,
        system: &SystemId,
        account: AccountId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
