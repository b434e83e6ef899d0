//! Session resolution: turns `--as` into a caller account and looks up the
//! system that account belongs to.

use anyhow::{Context, Result, anyhow};
use tokio_util::sync::CancellationToken;

use syslink_core::context::CommandContext;
use syslink_core::repository::link::LinkRepository;
use syslink_types::account::AccountId;

use crate::state::AppState;

/// Parse the `--as` argument.
pub fn caller_account(raw: Option<&str>) -> Result<AccountId> {
    let raw = raw.ok_or_else(|| {
        anyhow!("no calling account: pass --as <ACCOUNT> or set SYSLINK_ACCOUNT")
    })?;
    AccountId::parse_reference(raw).ok_or_else(|| anyhow!("invalid calling account '{raw}'"))
}

/// Build the command context for the calling account.
///
/// The context's cancellation token fires on Ctrl+C. The link service races
/// its validation reads and the confirmation prompt against it and checks it
/// once more before writing; a write already in flight runs to completion.
pub async fn resolve(
    state: &AppState,
    caller: Option<&str>,
    target: Option<String>,
) -> Result<CommandContext> {
    let caller = caller_account(caller)?;
    let system = state
        .link_service
        .repository()
        .owning_system(caller)
        .await
        .context("failed to look up the calling account's system")?;

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling command");
            on_interrupt.cancel();
        }
    });

    let mut ctx = CommandContext::new(caller, system).with_cancellation(cancellation);
    ctx.target = target;
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_account_accepts_mentions() {
        assert_eq!(caller_account(Some("<@!12>")).unwrap(), AccountId(12));
        assert_eq!(caller_account(Some("12")).unwrap(), AccountId(12));
    }

    #[test]
    fn test_caller_account_missing_or_invalid() {
        assert!(caller_account(None).is_err());
        assert!(caller_account(Some("me")).is_err());
    }
}
