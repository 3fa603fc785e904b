//! # Application State
//!
//! Core business state for Mercodex. This module contains domain logic only,
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // HTTP client (or a test double)
//! ├── user_id: String                 // fixed user identifier
//! ├── sessions: Vec<ChatSession>      // sidebar contents, display order
//! ├── active_session_id: Option<..>   // None = new chat / welcome
//! ├── messages: Vec<ChatMessage>      // what the thread view shows
//! ├── is_loading: bool                // a send is in flight
//! ├── connection_error: bool          // drives the banner
//! ├── show_welcome: bool              // welcome screen requested
//! ├── pending_send: Option<..>        // snapshot for the in-flight send
//! └── view_epoch: u64                 // bumps whenever the visible conversation changes
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::backend::ChatBackend;
use crate::core::config::ResolvedConfig;
use crate::core::types::{ChatMessage, ChatSession};

/// What the orchestrator remembers about the send currently in flight.
#[derive(Debug, Clone)]
pub struct PendingSend {
    /// Active session at send time (`None` = the send starts a new session).
    pub session_id: Option<String>,
    /// Session id put on the wire; reused for the synthesized session.
    pub wire_session_id: String,
    /// Conversation including the optimistic user message.
    pub messages: Vec<ChatMessage>,
    /// `App::view_epoch` at send time.
    pub view_epoch: u64,
}

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub user_id: String,
    pub sessions: Vec<ChatSession>,
    pub active_session_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    pub connection_error: bool,
    pub show_welcome: bool,
    pub status_message: String,
    pub suggestions: Vec<String>,
    pub pending_send: Option<PendingSend>,
    pub view_epoch: u64,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, user_id: String) -> Self {
        Self {
            backend,
            user_id,
            sessions: Vec::new(),
            active_session_id: None,
            messages: Vec::new(),
            is_loading: false,
            connection_error: false,
            show_welcome: true,
            status_message: String::from("Welcome to Mercodex!"),
            suggestions: ResolvedConfig::default().suggestions,
            pending_send: None,
            view_epoch: 0,
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        Self {
            suggestions: config.suggestions.clone(),
            ..Self::new(backend, config.user_id.clone())
        }
    }

    /// Base URL of the backend, used to absolutize report links.
    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    /// The welcome screen shows only for an empty, fresh conversation.
    pub fn welcome_visible(&self) -> bool {
        self.show_welcome && self.messages.is_empty()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Mercodex!");
        assert!(!app.is_loading);
        assert!(!app.connection_error);
        assert!(app.welcome_visible());
        assert!(app.active_session().is_none());
        assert_eq!(app.suggestions.len(), 4);
    }
}
