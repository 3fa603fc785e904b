//! # Backend Client
//!
//! Everything that crosses the network lives here. The [`ChatBackend`] trait
//! is the seam the orchestrator talks to; [`HttpBackend`] is the reqwest
//! implementation used at runtime, and tests substitute their own.

pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend};
pub use http::HttpBackend;
pub use types::{BotReply, ChatRequest, HistoryEntry, SessionSummary};
