//! Confirmation prompt port.
//!
//! A prompt is a yes/no question addressed to one specific account. Only
//! that account's answer counts; enforcing this is the transport adapter's
//! job (see `syslink-infra::prompt::ChannelPrompt`).

use syslink_types::account::AccountId;

/// A yes/no question sent to a specific responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    /// The only account whose answer is accepted.
    pub responder: AccountId,
    /// Label for the affirmative choice ("Confirm", "Unlink").
    pub accept_label: &'static str,
}

/// Resolution of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Yes,
    No,
    Timeout,
}

impl PromptAnswer {
    /// Only an explicit yes confirms; a timeout counts as no.
    pub fn is_yes(self) -> bool {
        self == PromptAnswer::Yes
    }
}

/// Trait for interactive confirmation backends (chat transport, terminal).
///
/// Transport failures should resolve to `No` or `Timeout` rather than
/// surface as errors: an unanswered prompt never confirms anything.
pub trait ConfirmationPrompt: Send + Sync {
    fn ask(
        &self,
        request: &PromptRequest,
    ) -> impl std::future::Future<Output = PromptAnswer> + Send;
}
