//! AI-generated report summaries.
//!
//! # Responsibility
//! - Extract plain text from attached HTML reports.
//! - Request a fixed four-section markdown summary through an injected
//!   chat-completion capability.
//! - Store and read the API credential through the key-value capability.
//!
//! # Invariants
//! - Report text and credentials never appear in log events.
//! - Every failure mode maps to a distinct user-facing message.

use crate::store::StoreError;
use thiserror::Error;

pub mod client;
pub mod extract;
pub mod service;

pub use client::{ChatCompletionClient, ChatMessage, ChatRequest, UreqChatClient};
pub use extract::extract_report_text;
pub use service::{SummaryService, SummarySettings, API_KEY_STORE_KEY, SUMMARY_TEMPLATE};

/// Summary request failures, each rendered as a user-facing message.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(
        "not enough readable text in the report ({found} characters, need at least {required})"
    )]
    InsufficientText { found: usize, required: usize },
    #[error("no API key configured; save one before requesting a summary")]
    MissingCredential,
    #[error("summary request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("summary request could not be sent: {0}")]
    Transport(String),
    #[error("summary response could not be read: {0}")]
    InvalidResponse(String),
    #[error("summary response contained no text")]
    EmptyResponse,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SummaryError {
    /// Stable, content-free code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientText { .. } => "insufficient_text",
            Self::MissingCredential => "missing_credential",
            Self::Http { .. } => "http_status",
            Self::Transport(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
            Self::EmptyResponse => "empty_response",
            Self::Store(_) => "store",
        }
    }
}
