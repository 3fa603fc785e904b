//! # Core Application Logic
//!
//! Mercodex's business logic. It knows nothing about any specific UI
//! technology and performs no I/O: the reducer hands back an `Effect` and
//! the adapter decides how to run it.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │  Backend   │
//!          │  Adapter   │ ─── spawns ──▶ │  (reqwest) │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`]: messages, sessions, report links
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`session`]: titles, previews, reconciliation, time buckets
//! - [`report`]: report-link extraction from bot replies
//! - [`config`]: config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod report;
pub mod session;
pub mod state;
pub mod types;
