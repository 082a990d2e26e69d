//! Conversational interface for Tally.
//!
//! Holds the chat transcript, decodes backend payloads into typed
//! responses, renders them as assistant turns, and talks to the expense
//! backend over HTTP.

pub mod backend;
pub mod error;
pub mod interpreter;
pub mod payload;
pub mod session;
pub mod state;
pub mod turn;

pub use backend::{AskBackend, HttpBackend};
pub use error::ChatError;
pub use interpreter::ResponseInterpreter;
pub use payload::{
    Amount, BreakdownEntry, ExpenseView, ResponsePayload, SplitView, SqlResult, SummaryView,
};
pub use session::{ChatSession, Submission};
pub use state::{ConversationState, STATUS_TEXT};
pub use turn::{ChatRole, ChatTurn, RequestId};
