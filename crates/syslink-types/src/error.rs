use thiserror::Error;

use crate::system::SystemId;

/// Message used whenever an account argument is missing or cannot be parsed.
pub const MISSING_ACCOUNT_REFERENCE: &str = "missing account reference";

/// Broad classification of a [`LinkError`], used by callers to pick how an
/// outcome is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller has no system.
    Precondition,
    /// Missing or unparsable account reference.
    Syntax,
    /// Account already linked, not linked, or owned elsewhere.
    Conflict,
    /// Unlink would leave the system without accounts.
    Invariant,
    /// Confirmation declined, timed out, or the command was aborted.
    Cancelled,
    /// Storage read or write failure.
    Repository,
}

/// Errors related to account link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("You do not have a system registered. Create one with `syslink system new`.")]
    NoSystem,

    #[error("You must pass an account to link with (either ID or @mention): {0}.")]
    Syntax(String),

    #[error("That account is already linked to your system.")]
    AccountAlreadyLinked,

    #[error("The mentioned account is already linked to another system ({0}).")]
    AccountInOtherSystem(SystemId),

    #[error("That account isn't linked to your system.")]
    AccountNotLinked,

    #[error(
        "Since this is the only account linked to this system, you cannot unlink it (as that would leave your system account-less)."
    )]
    UnlinkingLastAccount,

    #[error("Account link cancelled.")]
    LinkCancelled,

    #[error("Account unlink cancelled.")]
    UnlinkCancelled,

    #[error("Command aborted before any change was made.")]
    Aborted,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl LinkError {
    /// Shorthand for the "missing account reference" syntax error.
    pub fn missing_account() -> Self {
        LinkError::Syntax(MISSING_ACCOUNT_REFERENCE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::NoSystem => ErrorKind::Precondition,
            LinkError::Syntax(_) => ErrorKind::Syntax,
            LinkError::AccountAlreadyLinked
            | LinkError::AccountInOtherSystem(_)
            | LinkError::AccountNotLinked => ErrorKind::Conflict,
            LinkError::UnlinkingLastAccount => ErrorKind::Invariant,
            LinkError::LinkCancelled | LinkError::UnlinkCancelled | LinkError::Aborted => {
                ErrorKind::Cancelled
            }
            LinkError::Storage(_) => ErrorKind::Repository,
        }
    }

    /// Whether this outcome should be shown as a neutral notice rather than an error.
    pub fn is_cancellation(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

/// Errors from repository operations (used by trait definitions in syslink-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_error_kinds() {
        assert_eq!(LinkError::NoSystem.kind(), ErrorKind::Precondition);
        assert_eq!(LinkError::missing_account().kind(), ErrorKind::Syntax);
        assert_eq!(LinkError::AccountAlreadyLinked.kind(), ErrorKind::Conflict);
        assert_eq!(
            LinkError::AccountInOtherSystem(SystemId::new()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(LinkError::AccountNotLinked.kind(), ErrorKind::Conflict);
        assert_eq!(LinkError::UnlinkingLastAccount.kind(), ErrorKind::Invariant);
        assert_eq!(LinkError::LinkCancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(LinkError::UnlinkCancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(LinkError::Aborted.kind(), ErrorKind::Cancelled);
        assert_eq!(
            LinkError::Storage(RepositoryError::Connection).kind(),
            ErrorKind::Repository
        );
    }

    #[test]
    fn test_other_system_message_names_the_system() {
        let other = SystemId::new();
        let err = LinkError::AccountInOtherSystem(other);
        assert!(err.to_string().contains(&other.to_string()));
    }

    #[test]
    fn test_syntax_message_carries_detail() {
        let err = LinkError::missing_account();
        assert!(err.to_string().contains(MISSING_ACCOUNT_REFERENCE));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_error_converts_into_storage() {
        let err: LinkError = RepositoryError::NotFound.into();
        assert!(matches!(err, LinkError::Storage(RepositoryError::NotFound)));
    }
}
