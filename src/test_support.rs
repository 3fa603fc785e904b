//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{BackendError, BotReply, ChatBackend, HistoryEntry, SessionSummary};
use crate::core::state::App;

pub const TEST_BASE_URL: &str = "http://test.local";

/// A backend that answers from a script and records what it was sent.
/// Unscripted calls fail with a network error.
#[derive(Default)]
pub struct MockBackend {
    pub replies: Mutex<VecDeque<Result<BotReply, BackendError>>>,
    pub sessions: Mutex<Option<Vec<SessionSummary>>>,
    pub history: Mutex<Option<Vec<HistoryEntry>>>,
    pub reachable: bool,
    /// `(session_id, user_id, text)` of every send
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl MockBackend {
    pub fn with_reply(reply: BotReply) -> Self {
        let backend = Self::default();
        backend.push_reply(Ok(reply));
        backend
    }

    pub fn push_reply(&self, reply: Result<BotReply, BackendError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

fn unscripted(what: &str) -> BackendError {
    BackendError::Network(format!("no scripted {what}"))
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn base_url(&self) -> &str {
        TEST_BASE_URL
    }

    async fn send_message(
        &self,
        session_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<BotReply, BackendError> {
        self.sent.lock().unwrap().push((
            session_id.to_string(),
            user_id.to_string(),
            text.to_string(),
        ));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("reply")))
    }

    async fn list_sessions(&self, _user_id: &str) -> Result<Vec<SessionSummary>, BackendError> {
        self.sessions
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unscripted("session list"))
    }

    async fn session_history(&self, _session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        self.history
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unscripted("history"))
    }

    async fn download_report(&self, url: &str) -> Result<Vec<u8>, BackendError> {
        Ok(url.as_bytes().to_vec())
    }

    async fn probe(&self, _user_id: &str) -> bool {
        self.reachable
    }
}

/// Creates a test App backed by an unscripted MockBackend.
pub fn test_app() -> App {
    App::new(Arc::new(MockBackend::default()), "U-test".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, Effect, update};

    /// Drives one send through the app the way the event loop does.
    #[test]
    fn test_scripted_send_round_trip() {
        let backend = Arc::new(MockBackend::with_reply(BotReply::Message(
            "Great battery life".into(),
        )));
        let mut app = App::new(backend.clone(), "U-1".to_string());

        let Effect::SendMessage { session_id, text } =
            update(&mut app, Action::Submit("Pixel 8 reviews".into()))
        else {
            panic!("expected a send");
        };
        let reply = tokio_test::block_on(backend.send_message(&session_id, "U-1", &text));
        let action = match reply {
            Ok(reply) => Action::ReplyReceived(reply),
            Err(e) => Action::SendFailed(e.to_string()),
        };
        update(&mut app, action);

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[1].text, "Great battery life");
        assert_eq!(app.active_session_id.as_deref(), Some(session_id.as_str()));
        let sent = backend.sent.lock().unwrap();
        assert_eq!(sent[0], (session_id, "U-1".to_string(), "Pixel 8 reviews".to_string()));
    }

    #[test]
    fn test_unscripted_calls_fail() {
        let backend = MockBackend::default();
        assert!(tokio_test::block_on(backend.list_sessions("U-1")).is_err());
        assert!(tokio_test::block_on(backend.send_message("s", "U-1", "hi")).is_err());
        assert!(!tokio_test::block_on(backend.probe("U-1")));
    }
}
