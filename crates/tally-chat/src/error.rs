//! Error types for the conversational interface.
//!
//! Display strings are shown to the user verbatim after an `Error: `
//! prefix, so they stay short and free of internal detail.

use tally_core::error::TallyError;

/// Errors from talking to the expense backend.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Connection failure, timeout, or an unreadable body.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx response carrying a `detail` message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    /// Non-2xx response without a usable `detail`.
    #[error("request failed with status {0}")]
    HttpStatus(u16),
    /// 2xx response whose body is not JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
    #[error("backend unhealthy: {0}")]
    Unhealthy(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<TallyError> for ChatError {
    fn from(err: TallyError) -> Self {
        ChatError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Transport(format!("connection failed: {}", err))
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
