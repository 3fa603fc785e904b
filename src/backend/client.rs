use std::fmt;

use async_trait::async_trait;

use super::types::{BotReply, HistoryEntry, SessionSummary};

/// Errors from talking to the chat backend.
///
/// The UI collapses all of these into one "connectivity" condition; the
/// variants exist for logging.
#[derive(Debug)]
pub enum BackendError {
    /// Transport failure (DNS, refused connection, timeout).
    Network(String),
    /// The backend answered with a non-2xx status.
    Status { status: u16, message: String },
    /// The body could not be decoded into anything we understand.
    Decode(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Status { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            BackendError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Everything the app needs from the Mercodex backend.
///
/// No method retries on its own; retrying is a user action.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Base URL the backend is reached at (used to absolutize report links).
    fn base_url(&self) -> &str;

    /// Send one user message in the given session and return the decoded reply.
    async fn send_message(
        &self,
        session_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<BotReply, BackendError>;

    /// Fetch all session summaries for a user.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, BackendError>;

    /// Fetch the message history of one session.
    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError>;

    /// Fetch a report artifact by absolute URL.
    async fn download_report(&self, url: &str) -> Result<Vec<u8>, BackendError>;

    /// Manual reachability check. Never fails; returns whether the backend answered.
    async fn probe(&self, user_id: &str) -> bool;
}
