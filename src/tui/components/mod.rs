//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: product name, active conversation and status line
//! - `ConnectionBanner`: backend-unreachable warning
//! - `Message`: a single chat bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep persistent state and emit events:
//! - `InputBox`: multi-line composer
//! - `MessageList`: scrollable thread with layout caching
//! - `Sidebar`: session history grouped by time bucket
//! - `Welcome`: landing view with suggested prompts
//!
//! Persistent state lives in a `*State` type (or the component itself for
//! `InputBox`); the render wrapper is rebuilt every frame with fresh props.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── banner.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── sidebar.rs
//! ├── welcome.rs
//! └── input_box/
//! ```

mod banner;
mod title_bar;
pub use banner::{BANNER_HEIGHT, ConnectionBanner};
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod welcome;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{SIDEBAR_WIDTH, Sidebar, SidebarEvent, SidebarState};
pub use welcome::{Welcome, WelcomeEvent, WelcomeState};
