//! # Message and Session Types
//!
//! The shapes every other layer agrees on. A `ChatMessage` is immutable once
//! created; a `ChatSession` owns an ordered list of them plus the metadata the
//! sidebar needs (title, preview, last-activity time).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A downloadable report attached to a bot message.
///
/// URL and filename travel together, so a message either has both or neither.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    /// Absolute URL (`{base}/api/reports/download/...`)
    pub url: String,
    /// Suggested filename when saving (e.g. `report_1718000000000.pdf`)
    pub file_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportLink>,
    /// Set on the connectivity-error message appended when a send fails.
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            sender: Sender::User,
            report: None,
            is_error: false,
        }
    }

    pub fn bot(text: impl Into<String>, report: Option<ReportLink>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            sender: Sender::Bot,
            report,
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::bot(text, None)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub preview: String,
    /// Last-activity time; drives sidebar bucketing.
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

/// Generate a fresh client-side identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_error_message_is_bot_without_report() {
        let msg = ChatMessage::error("offline");
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.is_error);
        assert!(msg.report.is_none());
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
    }
}
