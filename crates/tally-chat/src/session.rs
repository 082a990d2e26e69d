//! Chat session: the transcript, a backend, and the interpreter wired
//! together behind the send operation.
//!
//! Every failure is converted into a visible assistant turn here; nothing
//! propagates past [`ChatSession::dispatch`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use tally_core::config::ChatConfig;
use tally_core::ResolveMode;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::AskBackend;
use crate::interpreter::ResponseInterpreter;
use crate::payload::ResponsePayload;
use crate::state::ConversationState;
use crate::turn::{ChatTurn, RequestId};

/// A message accepted into the transcript and awaiting a backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request: RequestId,
    pub text: String,
}

/// One independent conversation with the expense backend.
pub struct ChatSession<B> {
    id: Uuid,
    backend: B,
    interpreter: ResponseInterpreter,
    state: Mutex<ConversationState>,
}

impl<B: AskBackend> ChatSession<B> {
    pub fn new(backend: B, interpreter: ResponseInterpreter, mode: ResolveMode) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, mode = %mode, "Chat session started");
        Self {
            id,
            backend,
            interpreter,
            state: Mutex::new(ConversationState::new(mode)),
        }
    }

    pub fn from_config(backend: B, config: &ChatConfig) -> Self {
        Self::new(
            backend,
            ResponseInterpreter::from_config(config),
            config.resolve_mode,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Record the user's message and a status turn.
    ///
    /// Returns `None` for blank input, in which case nothing is recorded
    /// and no request should be made.
    pub fn submit(&self, text: &str) -> Option<Submission> {
        let request = self.state().append_user_and_status(text)?;
        Some(Submission {
            request,
            text: text.to_string(),
        })
    }

    /// Ask the backend, render the answer, and resolve the submission.
    ///
    /// Returns the assistant turns appended to the transcript.
    pub async fn dispatch(&self, submission: Submission) -> Vec<ChatTurn> {
        let result = self.backend.ask(&submission.text).await;

        let turns = match result {
            Ok(value) => {
                let payload = ResponsePayload::decode(&value);
                info!(
                    session = %self.id,
                    request = %submission.request,
                    kind = payload.kind(),
                    "Backend answered"
                );
                self.interpreter.render(&payload)
            }
            Err(e) => {
                warn!(
                    session = %self.id,
                    request = %submission.request,
                    error = %e,
                    "Request failed"
                );
                vec![ResponseInterpreter::error_turn(&e)]
            }
        };

        self.state().resolve(submission.request, turns.clone());
        turns
    }

    /// Submit and dispatch in one step. Blank input is a no-op.
    pub async fn send(&self, text: &str) -> Vec<ChatTurn> {
        match self.submit(text) {
            Some(submission) => self.dispatch(submission).await,
            None => Vec::new(),
        }
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.state().turns().to_vec()
    }

    /// Number of requests still showing a status turn.
    pub fn pending(&self) -> usize {
        self.state().pending()
    }

    pub fn clear(&self) {
        self.state().clear();
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        // The log is left consistent by every mutator, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Tests
// =============================================================================
