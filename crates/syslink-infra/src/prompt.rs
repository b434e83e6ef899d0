//! Channel-based confirmation prompt for chat transports.
//!
//! `ChannelPrompt` publishes each question as a [`PendingPrompt`] on an mpsc
//! channel that the transport drains (posting the message with yes/no
//! buttons or reactions). When someone answers, the transport calls
//! [`ChannelPrompt::respond`] with the prompt id and the answering account.
//!
//! Replies are correlated by prompt id, so concurrent commands never see each
//! other's answers, and only the addressed responder's reply is accepted.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use syslink_core::prompt::{ConfirmationPrompt, PromptAnswer, PromptRequest};
use syslink_types::account::AccountId;

/// A question waiting to be delivered by the transport.
#[derive(Debug, Clone)]
pub struct PendingPrompt {
    pub id: Uuid,
    pub responder: AccountId,
    pub message: String,
    pub accept_label: &'static str,
}

/// Result of delivering a reply to [`ChannelPrompt::respond`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// The reply resolved the prompt.
    Accepted,
    /// The prompt exists but is addressed to someone else; the reply was ignored.
    WrongResponder,
    /// No such prompt (already answered, timed out, or never existed).
    Unknown,
}

struct Waiter {
    responder: AccountId,
    reply: oneshot::Sender<bool>,
}

/// Confirmation prompt backed by a transport channel.
///
/// Cheap to clone; clones share the same pending-reply registry.
#[derive(Clone)]
pub struct ChannelPrompt {
    outbound: mpsc::Sender<PendingPrompt>,
    pending: Arc<DashMap<Uuid, Waiter>>,
}

impl ChannelPrompt {
    /// Create a prompt and the receiver the transport reads questions from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PendingPrompt>) {
        let (outbound, rx) = mpsc::channel(capacity);
        let prompt = Self {
            outbound,
            pending: Arc::new(DashMap::new()),
        };
        (prompt, rx)
    }

    /// Deliver an answer from `from` to prompt `id`.
    pub fn respond(&self, id: Uuid, from: AccountId, yes: bool) -> ReplyStatus {
        if let Some((_, waiter)) = self.pending.remove_if(&id, |_, w| w.responder == from) {
            if waiter.reply.send(yes).is_err() {
                debug!(%id, "prompt answered after its caller stopped waiting");
            }
            return ReplyStatus::Accepted;
        }

        if self.pending.contains_key(&id) {
            debug!(%id, %from, "ignoring reply from non-addressed account");
            ReplyStatus::WrongResponder
        } else {
            ReplyStatus::Unknown
        }
    }

    /// Number of prompts still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Removes the registry entry when `ask` finishes or is dropped (timeout,
/// cancellation), so abandoned prompts cannot accumulate.
struct PendingGuard<'a> {
    pending: &'a DashMap<Uuid, Waiter>,
    id: Uuid,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

impl ConfirmationPrompt for ChannelPrompt {
    async fn ask(&self, request: &PromptRequest) -> PromptAnswer {
        let id = Uuid::now_v7();
        let (reply, answer) = oneshot::channel();

        self.pending.insert(
            id,
            Waiter {
                responder: request.responder,
                reply,
            },
        );
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        let question = PendingPrompt {
            id,
            responder: request.responder,
            message: request.message.clone(),
            accept_label: request.accept_label,
        };
        if self.outbound.send(question).await.is_err() {
            warn!(%id, "prompt transport closed; treating as declined");
            return PromptAnswer::No;
        }

        match answer.await {
            Ok(true) => PromptAnswer::Yes,
            Ok(false) => PromptAnswer::No,
            Err(_) => PromptAnswer::No,
        }
    }
}
