//! Transcript entries.

use serde::{Deserialize, Serialize};

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    /// Placeholder shown while a request is in flight.
    Status,
}

/// Identifies one in-flight request within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    /// Display text, possibly spanning several lines.
    pub content: String,
    /// Owning request; only set on status turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestId>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            request: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            request: None,
        }
    }

    pub fn status(content: impl Into<String>, request: RequestId) -> Self {
        Self {
            role: ChatRole::Status,
            content: content.into(),
            request: Some(request),
        }
    }

    pub fn is_status(&self) -> bool {
        self.role == ChatRole::Status
    }
}
