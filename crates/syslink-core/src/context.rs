//! Per-command context passed explicitly into each link operation.

use tokio_util::sync::CancellationToken;

use syslink_types::account::AccountId;
use syslink_types::error::LinkError;
use syslink_types::system::SystemId;

/// Everything a link/unlink command knows about who invoked it and on what.
///
/// Built by the session layer (chat transport or CLI) after it has resolved
/// the invoking account to a system.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// The caller's system, or `None` if the caller has not registered one.
    pub caller_system: Option<SystemId>,
    /// The account that issued the command.
    pub caller_account: AccountId,
    /// Raw target argument (id or mention), exactly as typed.
    pub target: Option<String>,
    /// Cancelled when the surrounding command is abandoned (caller disconnects).
    pub cancellation: CancellationToken,
}

impl CommandContext {
    pub fn new(caller_account: AccountId, caller_system: Option<SystemId>) -> Self {
        Self {
            caller_system,
            caller_account,
            target: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// The caller's system, or `LinkError::NoSystem`.
    pub fn require_system(&self) -> Result<SystemId, LinkError> {
        self.caller_system.ok_or(LinkError::NoSystem)
    }

    /// Resolve the explicit target argument; absent or unparsable is a syntax error.
    pub fn required_target(&self) -> Result<AccountId, LinkError> {
        self.target
            .as_deref()
            .and_then(AccountId::parse_reference)
            .ok_or_else(LinkError::missing_account)
    }

    /// Resolve the target argument, defaulting to the caller when none was given.
    pub fn target_or_self(&self) -> Result<AccountId, LinkError> {
        match self.target.as_deref().map(str::trim) {
            None | Some("") => Ok(self.caller_account),
            Some(raw) => AccountId::parse_reference(raw).ok_or_else(LinkError::missing_account),
        }
    }
}
