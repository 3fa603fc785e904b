//! # Session Bookkeeping
//!
//! Sessions live in memory only. This module holds the pure operations the
//! orchestrator runs over the session list:
//!
//! - deriving titles and previews from messages
//! - reconciling a conversation's latest messages into the list
//! - rename and delete
//! - grouping sessions into relative-time buckets for the sidebar
//!
//! Nothing here does I/O; callers pass `now` in explicitly.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::core::types::{ChatMessage, ChatSession, Sender};

/// Max characters kept from the first user message for a session title.
pub const TITLE_MAX_CHARS: usize = 50;
/// Max characters kept from the last message for a session preview.
pub const PREVIEW_MAX_CHARS: usize = 60;
/// Title used when a conversation has no user message yet.
pub const DEFAULT_TITLE: &str = "New conversation";

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Derive a title from the first user message in the conversation.
pub fn derive_title(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .find(|m| m.sender == Sender::User)
        .map(|m| truncate_chars(&m.text, TITLE_MAX_CHARS))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Derive a preview from the most recent message.
pub fn derive_preview(messages: &[ChatMessage]) -> String {
    messages
        .last()
        .map(|m| truncate_chars(&m.text, PREVIEW_MAX_CHARS))
        .unwrap_or_default()
}

/// Fold the full, updated message sequence of one conversation into `sessions`.
///
/// - `active_id = Some(id)`: the session with that id is updated in place
///   (messages replaced, preview recomputed, timestamp refreshed).
/// - `active_id = None`: a new session with id `new_id` is prepended.
///
/// Returns the id of the session that now holds the conversation, or `None`
/// when the targeted session no longer exists (deleted mid-flight).
pub fn reconcile(
    sessions: &mut Vec<ChatSession>,
    active_id: Option<&str>,
    new_id: &str,
    messages: &[ChatMessage],
    now: DateTime<Utc>,
) -> Option<String> {
    let preview = derive_preview(messages);

    match active_id {
        Some(id) => {
            let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
                warn!("Reconcile target {} no longer exists, dropping update", id);
                return None;
            };
            session.messages = messages.to_vec();
            session.preview = preview;
            session.timestamp = now;
            debug!("Session {} updated ({} messages)", id, messages.len());
            Some(id.to_string())
        }
        None => {
            let session = ChatSession {
                id: new_id.to_string(),
                title: derive_title(messages),
                preview,
                timestamp: now,
                messages: messages.to_vec(),
            };
            debug!("Session {} created: {:?}", session.id, session.title);
            sessions.insert(0, session);
            Some(new_id.to_string())
        }
    }
}

/// Rename a session. Titles that are empty after trimming are ignored.
///
/// Returns `true` if a title changed.
pub fn rename(sessions: &mut [ChatSession], id: &str, title: &str) -> bool {
    let title = title.trim();
    if title.is_empty() {
        return false;
    }
    match sessions.iter_mut().find(|s| s.id == id) {
        Some(session) => {
            session.title = title.to_string();
            true
        }
        None => false,
    }
}

/// Remove a session from the list. Returns `true` if something was removed.
pub fn delete(sessions: &mut Vec<ChatSession>, id: &str) -> bool {
    let before = sessions.len();
    sessions.retain(|s| s.id != id);
    sessions.len() != before
}

// ============================================================================
// Relative-time buckets
// ============================================================================

/// Sidebar grouping, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeBucket {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    Older,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 5] = [
        TimeBucket::Today,
        TimeBucket::Yesterday,
        TimeBucket::Last7Days,
        TimeBucket::Last30Days,
        TimeBucket::Older,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Today => "Today",
            TimeBucket::Yesterday => "Yesterday",
            TimeBucket::Last7Days => "Last 7 days",
            TimeBucket::Last30Days => "Last 30 days",
            TimeBucket::Older => "Older",
        }
    }

    /// Bucket for a whole-day count.
    pub fn from_days(days: i64) -> Self {
        match days {
            ..=0 => TimeBucket::Today,
            1 => TimeBucket::Yesterday,
            2..=6 => TimeBucket::Last7Days,
            7..=29 => TimeBucket::Last30Days,
            _ => TimeBucket::Older,
        }
    }

    /// Bucket for a timestamp relative to `now`.
    ///
    /// Days are whole 24h periods elapsed; timestamps in the future count as today.
    pub fn for_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = now.signed_duration_since(timestamp);
        let days = elapsed.num_milliseconds().div_euclid(Duration::days(1).num_milliseconds());
        Self::from_days(days)
    }
}

/// Partition sessions into buckets, keeping their relative order.
/// Buckets come back in display order; empty ones are omitted.
pub fn group_by_bucket(
    sessions: &[ChatSession],
    now: DateTime<Utc>,
) -> Vec<(TimeBucket, Vec<&ChatSession>)> {
    let mut groups: Vec<(TimeBucket, Vec<&ChatSession>)> =
        TimeBucket::ALL.iter().map(|b| (*b, Vec::new())).collect();

    for session in sessions {
        let bucket = TimeBucket::for_timestamp(session.timestamp, now);
        // ALL is in enum order, so the discriminant indexes it
        groups[bucket as usize].1.push(session);
    }

    groups.retain(|(_, members)| !members.is_empty());
    groups
}
