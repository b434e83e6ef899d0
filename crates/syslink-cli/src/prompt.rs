//! Terminal confirmation prompt.
//!
//! The terminal cannot tell who is typing, so the responder is named in the
//! question instead of enforced.

use console::style;
use dialoguer::Confirm;
use tokio::sync::oneshot;

use syslink_core::prompt::{ConfirmationPrompt, PromptAnswer, PromptRequest};

/// `ConfirmationPrompt` that asks on the controlling terminal with dialoguer.
pub struct TerminalPrompt;

impl ConfirmationPrompt for TerminalPrompt {
    async fn ask(&self, request: &PromptRequest) -> PromptAnswer {
        let question = format!(
            "{} [{}]",
            request.message,
            style(request.accept_label).yellow().bold()
        );
        let responder = request.responder;

        // Detached thread: a pending stdin read must not hold up runtime shutdown.
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let answer = Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact_opt();
            let _ = tx.send(answer);
        });

        match rx.await {
            Ok(Ok(Some(true))) => PromptAnswer::Yes,
            Ok(Ok(_)) => PromptAnswer::No,
            Ok(Err(e)) => {
                tracing::warn!(%responder, "terminal prompt failed: {e}");
                PromptAnswer::No
            }
            Err(_) => PromptAnswer::No,
        }
    }
}
