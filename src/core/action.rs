//! # Actions
//!
//! Everything that can happen in Mercodex becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplyReceived(reply)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the adapter should
//! start. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Send pipeline
//!
//! ```text
//!            Submit (guard: non-blank, nothing in flight)
//!   Idle ─────────────────────────────────────────────▶ Sending
//!    ▲                                                    │
//!    │        ReplyReceived → bot message                 │
//!    └──────── SendFailed    → error message + banner ◀───┘
//! ```
//!
//! Either way the finished conversation is reconciled into the session list.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::backend::{BotReply, HistoryEntry, SessionSummary};
use crate::core::report::extract_report;
use crate::core::session;
use crate::core::state::{App, PendingSend};
use crate::core::types::{ChatMessage, ChatSession, ReportLink, Sender, new_id};

#[derive(Debug)]
pub enum Action {
    /// User text from the input box or a welcome suggestion.
    Submit(String),
    ReplyReceived(BotReply),
    SendFailed(String),
    /// (Re)load the session list; also the banner's retry.
    LoadSessions,
    SessionsLoaded(Vec<SessionSummary>),
    SessionsFailed(String),
    SelectSession(String),
    HistoryLoaded {
        session_id: String,
        entries: Vec<HistoryEntry>,
    },
    HistoryFailed {
        session_id: String,
        error: String,
    },
    NewChat,
    RenameSession {
        id: String,
        title: String,
    },
    DeleteSession(String),
    ProbeConnection,
    ProbeFinished(bool),
    DownloadReport {
        message_id: String,
    },
    ReportSaved(PathBuf),
    ReportFailed(String),
    Quit,
}

/// I/O the adapter should start after an `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SendMessage { session_id: String, text: String },
    LoadSessions,
    LoadHistory(String),
    Probe,
    DownloadReport(ReportLink),
    Quit,
}

/// Status line text while a send is in flight.
pub const ANALYZING_STATUS: &str = "Analyzing...";

/// Bot message shown in the thread when a send fails.
pub fn connection_error_text(base_url: &str) -> String {
    format!("Connection error\n\nCheck that the backend is running at {base_url}")
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, text),
        Action::ReplyReceived(reply) => {
            let Some(pending) = app.pending_send.take() else {
                warn!("Reply received with no send in flight, ignoring");
                return Effect::None;
            };
            let extracted = extract_report(&reply.into_text(), app.base_url(), Utc::now());
            if extracted.report.is_some() {
                info!("Reply carries a report link");
            }
            finish_send(app, pending, ChatMessage::bot(extracted.text, extracted.report));
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::SendFailed(error) => {
            let Some(pending) = app.pending_send.take() else {
                warn!("Send failure with no send in flight: {}", error);
                return Effect::None;
            };
            warn!("Send failed: {}", error);
            app.connection_error = true;
            let message = ChatMessage::error(connection_error_text(app.base_url()));
            finish_send(app, pending, message);
            app.status_message = String::from("Connection error");
            Effect::None
        }
        Action::LoadSessions => {
            app.connection_error = false;
            Effect::LoadSessions
        }
        Action::SessionsLoaded(summaries) => {
            let now = Utc::now();
            let base_url = app.base_url().to_string();
            app.sessions = summaries
                .into_iter()
                .map(|summary| summary_to_session(summary, &base_url, now))
                .collect();
            info!("Session list replaced ({} sessions)", app.sessions.len());
            Effect::None
        }
        Action::SessionsFailed(error) => {
            warn!("Loading sessions failed: {}", error);
            app.connection_error = true;
            app.sessions.clear();
            Effect::None
        }
        Action::SelectSession(id) => {
            let Some(session) = app.sessions.iter().find(|s| s.id == id) else {
                warn!("Selected unknown session {}", id);
                return Effect::None;
            };
            app.messages = session.messages.clone();
            app.active_session_id = Some(id.clone());
            app.show_welcome = false;
            app.connection_error = false;
            app.view_epoch += 1;
            Effect::LoadHistory(id)
        }
        Action::HistoryLoaded {
            session_id,
            entries,
        } => {
            if app.active_session_id.as_deref() != Some(session_id.as_str()) {
                debug!("Discarding stale history for {}", session_id);
                return Effect::None;
            }
            let messages = history_to_messages(entries, app.base_url(), Utc::now());
            if let Some(session) = app.sessions.iter_mut().find(|s| s.id == session_id) {
                session.messages = messages.clone();
            }
            app.messages = messages;
            Effect::None
        }
        Action::HistoryFailed { session_id, error } => {
            warn!("Loading history for {} failed: {}", session_id, error);
            app.connection_error = true;
            if app.active_session_id.as_deref() == Some(session_id.as_str()) {
                app.messages.clear();
            }
            Effect::None
        }
        Action::NewChat => {
            reset_to_welcome(app);
            Effect::None
        }
        Action::RenameSession { id, title } => {
            if session::rename(&mut app.sessions, &id, &title) {
                app.status_message = format!("Renamed to \"{}\"", title.trim());
            }
            Effect::None
        }
        Action::DeleteSession(id) => {
            if session::delete(&mut app.sessions, &id) {
                info!("Session {} deleted", id);
                app.status_message = String::from("Conversation deleted");
            }
            if app.active_session_id.as_deref() == Some(id.as_str()) {
                reset_to_welcome(app);
            }
            Effect::None
        }
        Action::ProbeConnection => {
            app.status_message = String::from("Testing connection...");
            Effect::Probe
        }
        Action::ProbeFinished(reachable) => {
            app.status_message = if reachable {
                String::from("Connection OK")
            } else {
                format!("Backend unreachable at {}", app.base_url())
            };
            Effect::None
        }
        Action::DownloadReport { message_id } => {
            let report = app
                .messages
                .iter()
                .find(|m| m.id == message_id)
                .and_then(|m| m.report.clone());
            match report {
                Some(link) => {
                    app.status_message = format!("Downloading {}...", link.file_name);
                    Effect::DownloadReport(link)
                }
                None => Effect::None,
            }
        }
        Action::ReportSaved(path) => {
            app.status_message = format!("Report saved to {}", path.display());
            Effect::None
        }
        Action::ReportFailed(error) => {
            warn!("Report download failed: {}", error);
            app.status_message = format!("Report download failed: {}", error);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    if app.is_loading {
        debug!("Send already in flight, dropping submit");
        return Effect::None;
    }
    if text.trim().is_empty() {
        return Effect::None;
    }

    app.show_welcome = false;
    app.messages.push(ChatMessage::user(text.clone()));
    app.is_loading = true;
    app.connection_error = false;
    app.status_message = String::from(ANALYZING_STATUS);

    let wire_session_id = app.active_session_id.clone().unwrap_or_else(new_id);
    app.pending_send = Some(PendingSend {
        session_id: app.active_session_id.clone(),
        wire_session_id: wire_session_id.clone(),
        messages: app.messages.clone(),
        view_epoch: app.view_epoch,
    });

    Effect::SendMessage {
        session_id: wire_session_id,
        text,
    }
}

/// Append the bot message to the pending conversation and reconcile it.
/// The thread view is only touched if the user is still looking at it.
fn finish_send(app: &mut App, pending: PendingSend, bot_message: ChatMessage) {
    app.is_loading = false;

    // A new chat has no id yet, so only the epoch can tell it is still open
    let on_screen = match (pending.session_id.as_deref(), app.active_session_id.as_deref()) {
        (Some(origin), Some(active)) => origin == active,
        (None, None) => app.view_epoch == pending.view_epoch,
        _ => false,
    };

    let mut messages = pending.messages;
    messages.push(bot_message);

    let held_by = session::reconcile(
        &mut app.sessions,
        pending.session_id.as_deref(),
        &pending.wire_session_id,
        &messages,
        Utc::now(),
    );

    if on_screen {
        app.messages = messages;
        if pending.session_id.is_none() {
            app.active_session_id = held_by;
        }
    } else {
        debug!("Conversation changed during send; reply stored in session only");
    }
}

fn reset_to_welcome(app: &mut App) {
    app.active_session_id = None;
    app.messages.clear();
    app.show_welcome = true;
    app.view_epoch += 1;
}

fn history_to_messages(
    entries: Vec<HistoryEntry>,
    base_url: &str,
    now: DateTime<Utc>,
) -> Vec<ChatMessage> {
    entries
        .into_iter()
        .map(|entry| match entry.sender {
            Sender::User => ChatMessage::user(entry.text),
            Sender::Bot => {
                let extracted = extract_report(&entry.text, base_url, now);
                ChatMessage::bot(extracted.text, extracted.report)
            }
        })
        .collect()
}

fn summary_to_session(summary: SessionSummary, base_url: &str, now: DateTime<Utc>) -> ChatSession {
    ChatSession {
        id: summary.id,
        title: summary.title,
        preview: summary.preview,
        timestamp: summary.timestamp,
        messages: history_to_messages(summary.messages, base_url, now),
    }
}
