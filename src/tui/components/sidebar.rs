//! # Session Sidebar Component
//!
//! Left-hand pane listing past conversations grouped by relative time
//! (Today / Yesterday / Last 7 days / Last 30 days / Older).
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` and is re-synced from the app's
//!   session list every frame
//! - `Sidebar` is created each frame with borrowed state and props
//!
//! Keys while focused: ↑/↓ move, Enter opens, `n` new chat, `r` rename,
//! `d` twice deletes, `m` opens the Rename/Delete menu.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::core::session::{TimeBucket, group_by_bucket};
use crate::core::types::ChatSession;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const SIDEBAR_WIDTH: u16 = 32;

/// Entries of the per-item overflow menu, in display order.
const MENU_ENTRIES: [&str; 2] = ["Rename", "Delete"];

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    Select(String),
    NewChat,
    Rename { id: String, title: String },
    Delete(String),
    /// Esc while browsing: hand focus back to the input
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Header(TimeBucket),
    Item {
        id: String,
        title: String,
        preview: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    ConfirmDelete,
    Menu { cursor: usize },
    Rename { buffer: String },
}

/// Persistent state for the sidebar.
pub struct SidebarState {
    pub open: bool,
    rows: Vec<Row>,
    selected_id: Option<String>,
    mode: Mode,
    list_state: ListState,
}

impl SidebarState {
    pub fn new(open: bool) -> Self {
        Self {
            open,
            rows: Vec::new(),
            selected_id: None,
            mode: Mode::Browse,
            list_state: ListState::default(),
        }
    }

    /// Rebuild the grouped rows from the session list, keeping the selection
    /// on the same session when it still exists.
    pub fn sync(&mut self, sessions: &[ChatSession], now: DateTime<Utc>) {
        self.rows = group_by_bucket(sessions, now)
            .into_iter()
            .flat_map(|(bucket, members)| {
                std::iter::once(Row::Header(bucket)).chain(members.into_iter().map(|s| {
                    Row::Item {
                        id: s.id.clone(),
                        title: s.title.clone(),
                        preview: s.preview.clone(),
                    }
                }))
            })
            .collect();

        let still_there = self
            .selected_id
            .as_deref()
            .is_some_and(|id| self.row_of(id).is_some());
        if !still_there {
            let first = self.item_ids().next().map(str::to_string);
            self.selected_id = first;
            self.mode = Mode::Browse;
        }
        let selected_row = self.selected_id.as_deref().and_then(|id| self.row_of(id));
        self.list_state.select(selected_row);
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Move the selection onto a given session (e.g. the active one).
    pub fn select(&mut self, id: &str) {
        if let Some(row) = self.row_of(id) {
            self.selected_id = Some(id.to_string());
            self.list_state.select(Some(row));
        }
    }

    pub fn is_renaming(&self) -> bool {
        matches!(self.mode, Mode::Rename { .. })
    }

    /// Focus left the sidebar: an in-progress rename commits, anything else
    /// pending is dropped.
    pub fn blur(&mut self) -> Option<SidebarEvent> {
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);
        match mode {
            Mode::Rename { buffer } => self.commit_rename(buffer),
            _ => None,
        }
    }

    pub fn help_text(&self) -> &'static str {
        match self.mode {
            Mode::Browse => " n new  r rename  d delete  m menu ",
            Mode::ConfirmDelete => " Press d again to delete ",
            Mode::Menu { .. } => " Enter choose  Esc close ",
            Mode::Rename { .. } => " Enter save  Esc cancel ",
        }
    }

    fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| match row {
            Row::Item { id, .. } => Some(id.as_str()),
            Row::Header(_) => None,
        })
    }

    fn row_of(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| matches!(row, Row::Item { id: row_id, .. } if row_id == id))
    }

    fn selected_title(&self) -> Option<&str> {
        let row = self.row_of(self.selected_id.as_deref()?)?;
        match &self.rows[row] {
            Row::Item { title, .. } => Some(title.as_str()),
            Row::Header(_) => None,
        }
    }

    fn move_selection(&mut self, down: bool) {
        let ids: Vec<&str> = self.item_ids().collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .selected_id
            .as_deref()
            .and_then(|id| ids.iter().position(|i| *i == id));
        let next = match (current, down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(ids.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        let id = ids[next].to_string();
        self.select(&id);
    }

    fn commit_rename(&self, buffer: String) -> Option<SidebarEvent> {
        let title = buffer.trim();
        if title.is_empty() {
            return None;
        }
        self.selected_id.as_ref().map(|id| SidebarEvent::Rename {
            id: id.clone(),
            title: title.to_string(),
        })
    }

    fn start_rename(&mut self) {
        if let Some(title) = self.selected_title() {
            self.mode = Mode::Rename {
                buffer: title.to_string(),
            };
        }
    }

    fn handle_browse(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        match event {
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.move_selection(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_selection(true);
                None
            }
            TuiEvent::Submit => self.selected_id.clone().map(SidebarEvent::Select),
            TuiEvent::InputChar('n') => Some(SidebarEvent::NewChat),
            TuiEvent::InputChar('r') => {
                self.start_rename();
                None
            }
            TuiEvent::InputChar('d') => {
                if self.selected_id.is_some() {
                    self.mode = Mode::ConfirmDelete;
                }
                None
            }
            TuiEvent::InputChar('m') => {
                if self.selected_id.is_some() {
                    self.mode = Mode::Menu { cursor: 0 };
                }
                None
            }
            _ => None,
        }
    }
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match &mut self.mode {
            Mode::Browse => self.handle_browse(event),
            Mode::ConfirmDelete => {
                self.mode = Mode::Browse;
                if matches!(event, TuiEvent::InputChar('d')) {
                    self.selected_id.clone().map(SidebarEvent::Delete)
                } else {
                    // Any other key cancels and is handled normally
                    self.handle_browse(event)
                }
            }
            Mode::Menu { cursor } => match event {
                TuiEvent::CursorUp => {
                    *cursor = cursor.saturating_sub(1);
                    None
                }
                TuiEvent::CursorDown => {
                    *cursor = (*cursor + 1).min(MENU_ENTRIES.len() - 1);
                    None
                }
                TuiEvent::Submit => {
                    let choice = *cursor;
                    self.mode = Mode::Browse;
                    match MENU_ENTRIES[choice] {
                        "Rename" => {
                            self.start_rename();
                            None
                        }
                        _ => self.selected_id.clone().map(SidebarEvent::Delete),
                    }
                }
                TuiEvent::Escape => {
                    self.mode = Mode::Browse;
                    None
                }
                _ => None,
            },
            Mode::Rename { buffer } => match event {
                TuiEvent::InputChar('\n') => None,
                TuiEvent::InputChar(c) => {
                    buffer.push(*c);
                    None
                }
                TuiEvent::Paste(text) => {
                    buffer.extend(text.chars().filter(|c| !c.is_control()));
                    None
                }
                TuiEvent::Backspace => {
                    buffer.pop();
                    None
                }
                TuiEvent::Submit => {
                    let buffer = std::mem::take(buffer);
                    self.mode = Mode::Browse;
                    self.commit_rename(buffer)
                }
                TuiEvent::Escape => {
                    self.mode = Mode::Browse;
                    None
                }
                _ => None,
            },
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub active_id: Option<&'a str>,
    pub focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState, active_id: Option<&'a str>, focused: bool) -> Self {
        Self {
            state,
            active_id,
            focused,
        }
    }

    fn item_lines(&self, id: &str, title: &str, preview: &str, width: usize) -> Vec<Line<'static>> {
        let is_selected = self.focused && self.state.selected_id.as_deref() == Some(id);
        let is_active = self.active_id == Some(id);

        let marker = if is_active { "▌" } else { " " };
        let mut title_style = if is_active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if is_selected {
            title_style = title_style.add_modifier(Modifier::REVERSED);
            if self.state.mode == Mode::ConfirmDelete {
                title_style = title_style.fg(Color::Red);
            }
        }

        let title_text = match &self.state.mode {
            Mode::Rename { buffer } if is_selected => format!("✎ {buffer}▏"),
            _ => title.to_string(),
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(truncate_to_width(&title_text, width.saturating_sub(1)), title_style),
        ])];

        if let Mode::Menu { cursor } = self.state.mode
            && is_selected
        {
            let spans: Vec<Span> = MENU_ENTRIES
                .iter()
                .enumerate()
                .flat_map(|(i, entry)| {
                    let style = if i == cursor {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Cyan)
                    };
                    [Span::raw("  "), Span::styled(format!(" {entry} "), style)]
                })
                .collect();
            lines.push(Line::from(spans));
        } else if !preview.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" {}", truncate_to_width(preview, width.saturating_sub(1))),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Conversations ");
        if self.focused {
            block = block.title_bottom(Line::from(self.state.help_text()).centered());
        }

        if self.state.rows.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(Span::styled(
                    "No conversations yet.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "Press n to start one.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .state
            .rows
            .iter()
            .map(|row| match row {
                Row::Header(bucket) => ListItem::new(Line::from(Span::styled(
                    bucket.label(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ))),
                Row::Item { id, title, preview } => {
                    ListItem::new(self.item_lines(id, title, preview, width))
                }
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}

/// Cut `s` to at most `max` display columns, ending in "…" when shortened.
fn truncate_to_width(s: &str, max: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}
