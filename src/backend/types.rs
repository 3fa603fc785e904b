//! Wire types for the Mercodex chat backend and their adaptation into
//! domain types.
//!
//! The backend is loose about field names (`id_session` vs `id`,
//! `last_message` vs `preview`, `message` vs `text`) and about reply shape
//! (bare string vs object). Everything is normalized here, once, so the rest
//! of the app only sees `BotReply`, `SessionSummary` and `HistoryEntry`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::core::types::{Sender, new_id};

// ============================================================================
// Outgoing
// ============================================================================

/// One message in the outgoing envelope.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
}

/// Body of `POST /api/chatBot`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub id_session: String,
    pub user_id: String,
    pub messages: Vec<OutgoingMessage>,
}

impl ChatRequest {
    /// Envelope carrying a single user-authored message.
    pub fn user_message(session_id: &str, user_id: &str, text: &str) -> Self {
        Self {
            id_session: session_id.to_string(),
            user_id: user_id.to_string(),
            messages: vec![OutgoingMessage {
                kind: "user",
                message: text.to_string(),
            }],
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

/// Text fallback when the reply carries nothing we recognize.
pub const UNPROCESSABLE_REPLY: &str = "Sorry, your message could not be processed.";

/// A decoded chat reply, classified by where its text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotReply {
    /// The body was a bare JSON string.
    Text(String),
    /// Object with a non-empty `message` field.
    Message(String),
    /// Object with a non-empty `reply` field (and no usable `message`).
    Reply(String),
    /// Anything else: null, numbers, objects without either field.
    Unrecognized,
}

impl BotReply {
    /// Classify a decoded JSON body: string, then `message`, then `reply`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => BotReply::Text(s.clone()),
            Value::Object(map) => {
                if let Some(text) = map.get("message").and_then(non_empty_str) {
                    BotReply::Message(text.to_string())
                } else if let Some(text) = map.get("reply").and_then(non_empty_str) {
                    BotReply::Reply(text.to_string())
                } else {
                    BotReply::Unrecognized
                }
            }
            _ => BotReply::Unrecognized,
        }
    }

    /// The text to display, falling back to [`UNPROCESSABLE_REPLY`].
    pub fn into_text(self) -> String {
        match self {
            BotReply::Text(s) | BotReply::Message(s) | BotReply::Reply(s) => s,
            BotReply::Unrecognized => UNPROCESSABLE_REPLY.to_string(),
        }
    }
}

// ============================================================================
// Session list / history
// ============================================================================

/// Title given to backend sessions that arrive without one.
pub const UNTITLED_SESSION: &str = "Conversation";

/// One entry of `GET /api/chatBot/myHistory/{user_id}`, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<HistoryEntry>,
}

impl SessionSummary {
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        let messages = value
            .get("messages")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(HistoryEntry::from_value).collect())
            .unwrap_or_default();

        Self {
            id: first_string(value, &["id_session", "id"]).unwrap_or_else(new_id),
            title: first_string(value, &["title"]).unwrap_or_else(|| UNTITLED_SESSION.to_string()),
            preview: first_string(value, &["last_message", "preview"]).unwrap_or_default(),
            timestamp: value
                .get("timestamp")
                .and_then(parse_timestamp)
                .unwrap_or(now),
            messages,
        }
    }
}

/// One message of `GET /api/chatBot/history/{session_id}`, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub text: String,
    pub sender: Sender,
}

impl HistoryEntry {
    pub fn from_value(value: &Value) -> Self {
        let sender = match value.get("type").and_then(Value::as_str) {
            Some("user") => Sender::User,
            _ => Sender::Bot,
        };
        Self {
            text: first_string(value, &["message", "text"]).unwrap_or_default(),
            sender,
        }
    }
}

/// Locate the message array in a history body: either the body itself or
/// its `messages` field. Returns `None` for any other shape.
pub fn history_items(body: &Value) -> Option<&Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("messages").and_then(Value::as_array),
        _ => None,
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// First non-empty value among `keys`, as a string. Numbers are accepted
/// (backends sometimes send numeric ids).
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts RFC 3339, naive ISO datetimes (assumed UTC), or epoch millis.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        _ => None,
    }
}
