//! Account link service.
//!
//! Links external accounts to a system and unlinks them again. Each operation
//! validates against the repository, asks the right account for confirmation,
//! and only then writes:
//!
//! ```text
//! Validating -> AwaitingConfirmation -> Mutating -> Succeeded | Cancelled
//!     \-> Rejected
//! ```
//!
//! Confirmation is never requested unless every conflict check passed.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use syslink_types::account::AccountId;
use syslink_types::error::{ErrorKind, LinkError, RepositoryError};
use syslink_types::outcome::LinkOutcome;

use crate::context::CommandContext;
use crate::prompt::{ConfirmationPrompt, PromptAnswer, PromptRequest};
use crate::repository::link::LinkRepository;

/// Where a link/unlink command currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPhase {
    Validating,
    AwaitingConfirmation,
    Mutating,
    Succeeded,
    Cancelled,
    Rejected,
}

impl fmt::Display for LinkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkPhase::Validating => write!(f, "validating"),
            LinkPhase::AwaitingConfirmation => write!(f, "awaiting_confirmation"),
            LinkPhase::Mutating => write!(f, "mutating"),
            LinkPhase::Succeeded => write!(f, "succeeded"),
            LinkPhase::Cancelled => write!(f, "cancelled"),
            LinkPhase::Rejected => write!(f, "rejected"),
        }
    }
}

impl LinkPhase {
    /// Terminal phase reached by a finished operation.
    pub fn terminal(result: &Result<LinkOutcome, LinkError>) -> Self {
        match result {
            Ok(_) => LinkPhase::Succeeded,
            Err(err) if err.is_cancellation() => LinkPhase::Cancelled,
            Err(_) => LinkPhase::Rejected,
        }
    }
}

/// Service orchestrating account link and unlink commands.
///
/// Generic over the repository and prompt traits; syslink-core never depends
/// on syslink-infra.
pub struct AccountLinkService<R: LinkRepository, P: ConfirmationPrompt> {
    repo: R,
    prompt: P,
    confirm_timeout: Duration,
}

impl<R: LinkRepository, P: ConfirmationPrompt> AccountLinkService<R, P> {
    /// Create a new AccountLinkService.
    ///
    /// - `repo`: persistence for system/account links
    /// - `prompt`: interactive yes/no backend
    /// - `confirm_timeout`: how long to wait for an answer before treating it as "no"
    pub fn new(repo: R, prompt: P, confirm_timeout: Duration) -> Self {
        Self {
            repo,
            prompt,
            confirm_timeout,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Link the account named in `ctx.target` to the caller's system.
    ///
    /// The confirmation is addressed to the target account, not the caller:
    /// the caller is proposing the link on that account's behalf.
    #[tracing::instrument(
        name = "link_account",
        skip(self, ctx),
        fields(caller = %ctx.caller_account)
    )]
    pub async fn link_account(&self, ctx: &CommandContext) -> Result<LinkOutcome, LinkError> {
        let result = self.try_link(ctx).await;
        log_terminal(&result);
        result
    }

    /// Unlink the account named in `ctx.target`, or the caller's own account
    /// when no target was given.
    #[tracing::instrument(
        name = "unlink_account",
        skip(self, ctx),
        fields(caller = %ctx.caller_account)
    )]
    pub async fn unlink_account(&self, ctx: &CommandContext) -> Result<LinkOutcome, LinkError> {
        let result = self.try_unlink(ctx).await;
        log_terminal(&result);
        result
    }

    /// Accounts linked to the caller's system.
    pub async fn list_accounts(&self, ctx: &CommandContext) -> Result<Vec<AccountId>, LinkError> {
        let system = ctx.require_system()?;
        Ok(self.repo.linked_accounts(&system).await?)
    }

    async fn try_link(&self, ctx: &CommandContext) -> Result<LinkOutcome, LinkError> {
        debug!(phase = %LinkPhase::Validating);
        let system = ctx.require_system()?;
        let account = ctx.required_target()?;

        let linked = self.read(ctx, self.repo.linked_accounts(&system)).await?;
        if linked.contains(&account) {
            return Err(LinkError::AccountAlreadyLinked);
        }

        match self.read(ctx, self.repo.owning_system(account)).await? {
            Some(owner) if owner == system => return Err(LinkError::AccountAlreadyLinked),
            Some(owner) => return Err(LinkError::AccountInOtherSystem(owner)),
            None => {}
        }

        let request = PromptRequest {
            message: format!("{}, please confirm the link.", account.mention()),
            responder: account,
            accept_label: "Confirm",
        };
        if !self.confirm(ctx, &request).await?.is_yes() {
            return Err(LinkError::LinkCancelled);
        }

        self.begin_mutation(ctx)?;
        match self.repo.add_link(&system, account).await {
            Ok(()) => {}
            // Another command linked the account while we were waiting.
            Err(RepositoryError::Conflict(msg)) => {
                return Err(match self.repo.owning_system(account).await {
                    Ok(Some(owner)) if owner == system => LinkError::AccountAlreadyLinked,
                    Ok(Some(owner)) => LinkError::AccountInOtherSystem(owner),
                    _ => LinkError::Storage(RepositoryError::Conflict(msg)),
                });
            }
            Err(e) => return Err(e.into()),
        }

        Ok(LinkOutcome::Linked { system, account })
    }

    async fn try_unlink(&self, ctx: &CommandContext) -> Result<LinkOutcome, LinkError> {
        debug!(phase = %LinkPhase::Validating);
        let system = ctx.require_system()?;
        let account = ctx.target_or_self()?;

        let linked = self.read(ctx, self.repo.linked_accounts(&system)).await?;
        if !linked.contains(&account) {
            return Err(LinkError::AccountNotLinked);
        }
        if linked.len() == 1 {
            return Err(LinkError::UnlinkingLastAccount);
        }

        let request = PromptRequest {
            message: format!(
                "Are you sure you want to unlink {} from your system?",
                account.mention()
            ),
            responder: ctx.caller_account,
            accept_label: "Unlink",
        };
        if !self.confirm(ctx, &request).await?.is_yes() {
            return Err(LinkError::UnlinkCancelled);
        }

        self.begin_mutation(ctx)?;
        match self.repo.remove_link(&system, account).await {
            Ok(()) => Ok(LinkOutcome::Unlinked { system, account }),
            // The repository refused: state changed while we were waiting.
            Err(RepositoryError::Conflict(_)) => Err(LinkError::UnlinkingLastAccount),
            Err(RepositoryError::NotFound) => Err(LinkError::AccountNotLinked),
            Err(e) => Err(e.into()),
        }
    }

    /// Ask for confirmation, bounded by the configured timeout and the
    /// command's cancellation token.
    async fn confirm(
        &self,
        ctx: &CommandContext,
        request: &PromptRequest,
    ) -> Result<PromptAnswer, LinkError> {
        debug!(
            phase = %LinkPhase::AwaitingConfirmation,
            responder = %request.responder,
        );

        let answer = tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => return Err(LinkError::Aborted),
            answer = tokio::time::timeout(self.confirm_timeout, self.prompt.ask(request)) => {
                answer.unwrap_or(PromptAnswer::Timeout)
            }
        };

        debug!(?answer, "confirmation resolved");
        Ok(answer)
    }

    /// Run a validation read, abandoning it if the command is cancelled.
    async fn read<T>(
        &self,
        ctx: &CommandContext,
        query: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, LinkError> {
        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => Err(LinkError::Aborted),
            result = query => Ok(result?),
        }
    }

    fn begin_mutation(&self, ctx: &CommandContext) -> Result<(), LinkError> {
        if ctx.cancellation.is_cancelled() {
            return Err(LinkError::Aborted);
        }
        debug!(phase = %LinkPhase::Mutating);
        Ok(())
    }
}

fn log_terminal(result: &Result<LinkOutcome, LinkError>) {
    let phase = LinkPhase::terminal(result);
    match result {
        Ok(outcome) => info!(%phase, ?outcome, "link state changed"),
        Err(err) if err.kind() == ErrorKind::Repository => {
            warn!(%phase, error = %err, "link storage failure");
        }
        Err(err) => debug!(%phase, reason = %err),
    }
}
