//! Operation outcomes and the single human-readable notification each
//! link/unlink command produces.

use serde::Serialize;

use crate::account::AccountId;
use crate::error::{ErrorKind, LinkError};
use crate::system::SystemId;

/// Successful result of a link or unlink operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum LinkOutcome {
    Linked {
        system: SystemId,
        account: AccountId,
    },
    Unlinked {
        system: SystemId,
        account: AccountId,
    },
}

impl LinkOutcome {
    pub fn account(&self) -> AccountId {
        match self {
            LinkOutcome::Linked { account, .. } | LinkOutcome::Unlinked { account, .. } => {
                *account
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LinkOutcome::Linked { .. } => "Account linked to system.",
            LinkOutcome::Unlinked { .. } => "Account unlinked.",
        }
    }
}

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    /// Cancellations: not an error, just a notice.
    Neutral,
    Error,
}

/// The one message reported back to the invoker of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub tone: Tone,
    pub message: String,
}

impl Notification {
    /// Build the notification for an operation result.
    ///
    /// Storage failures are reported generically; their detail belongs in logs.
    pub fn from_result(result: &Result<LinkOutcome, LinkError>) -> Self {
        match result {
            Ok(outcome) => Self {
                tone: Tone::Success,
                message: outcome.message().to_string(),
            },
            Err(err) => match err.kind() {
                ErrorKind::Cancelled => Self {
                    tone: Tone::Neutral,
                    message: err.to_string(),
                },
                ErrorKind::Repository => Self {
                    tone: Tone::Error,
                    message: "Something went wrong while saving. Please try again.".to_string(),
                },
                _ => Self {
                    tone: Tone::Error,
                    message: err.to_string(),
                },
            },
        }
    }
}
