//! Conversation transcript and its two mutators.
//!
//! The log is append-only apart from status turns, which are removed when
//! the request that produced them resolves.

use tally_core::ResolveMode;
use tracing::debug;

use crate::turn::{ChatTurn, RequestId};

/// Text of the placeholder turn shown while a request is in flight.
pub const STATUS_TEXT: &str = "Sending...";

/// Ordered chat transcript owned by one conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    turns: Vec<ChatTurn>,
    next_request: u64,
    mode: ResolveMode,
}

impl ConversationState {
    /// Create an empty transcript with the given resolve mode.
    pub fn new(mode: ResolveMode) -> Self {
        Self {
            turns: Vec::new(),
            next_request: 0,
            mode,
        }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Append the user's message followed by a status turn.
    ///
    /// Blank input is ignored and yields `None`; otherwise the returned id
    /// tags the new status turn and must be passed back to [`resolve`].
    ///
    /// [`resolve`]: ConversationState::resolve
    pub fn append_user_and_status(&mut self, text: &str) -> Option<RequestId> {
        if text.trim().is_empty() {
            return None;
        }

        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.turns.push(ChatTurn::user(text));
        self.turns.push(ChatTurn::status(STATUS_TEXT, request));
        debug!(request = %request, "Status turn appended");
        Some(request)
    }

    /// Complete a request: drop its status turn(s), then append `turns`.
    ///
    /// In [`ResolveMode::Legacy`] every status turn is dropped, including
    /// those owned by other in-flight requests.
    pub fn resolve(&mut self, request: RequestId, turns: Vec<ChatTurn>) {
        let before = self.turns.len();
        match self.mode {
            ResolveMode::Correlated => self
                .turns
                .retain(|t| !(t.is_status() && t.request == Some(request))),
            ResolveMode::Legacy => self.turns.retain(|t| !t.is_status()),
        }
        debug!(
            request = %request,
            removed = before - self.turns.len(),
            appended = turns.len(),
            "Request resolved"
        );
        self.turns.extend(turns);
    }

    /// All turns in display order.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of status turns still awaiting resolution.
    pub fn pending(&self) -> usize {
        self.turns.iter().filter(|t| t.is_status()).count()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop the whole transcript. Request ids keep increasing.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
