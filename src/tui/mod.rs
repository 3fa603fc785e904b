//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and runs the
//! `Effect`s that `update()` asks for as background tasks.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (a send is in flight): draws every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   results or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use chrono::Utc;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::ChatBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::types::ReportLink;
use crate::tui::component::EventHandler;
use crate::tui::components::input_box::{CONVERSATION_PLACEHOLDER, WELCOME_PLACEHOLDER};
use crate::tui::components::{
    InputBox, InputEvent, MessageListState, SidebarEvent, SidebarState, WelcomeEvent,
    WelcomeState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    /// Thread navigation: select messages, download reports
    Messages,
    Sidebar,
    /// Suggested prompts on the welcome screen
    Suggestions,
}

/// Tab order: input, then the thread (or the suggestions on the welcome
/// screen), then the sidebar when it is open.
pub fn next_focus(current: Focus, sidebar_open: bool, welcome_visible: bool) -> Focus {
    let middle = if welcome_visible {
        Focus::Suggestions
    } else {
        Focus::Messages
    };
    match current {
        Focus::Input => middle,
        Focus::Messages | Focus::Suggestions if sidebar_open => Focus::Sidebar,
        _ => Focus::Input,
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub sidebar: SidebarState,
    pub welcome: WelcomeState,
    pub focus: Focus,
    /// `App::view_epoch` the message list was last laid out for
    pub seen_epoch: u64,
}

impl TuiState {
    pub fn new(app: &App, sidebar_open: bool) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            sidebar: SidebarState::new(sidebar_open),
            welcome: WelcomeState::new(app.suggestions.clone()),
            focus: Focus::Input, // User expects to type immediately
            seen_epoch: app.view_epoch,
        }
    }

    /// Bring presentation state in line with the app before drawing.
    pub fn sync(&mut self, app: &App) {
        if self.seen_epoch != app.view_epoch {
            self.message_list = MessageListState::new();
            self.seen_epoch = app.view_epoch;
        }

        let welcome = app.welcome_visible();
        self.focus = match self.focus {
            Focus::Suggestions if !welcome => Focus::Input,
            Focus::Messages if welcome => Focus::Input,
            Focus::Sidebar if !self.sidebar.open => Focus::Input,
            other => other,
        };

        self.sidebar.sync(&app.sessions, Utc::now());
        if self.focus != Focus::Sidebar
            && let Some(id) = app.active_session_id.as_deref()
        {
            self.sidebar.select(id);
        }

        self.input_box.disabled = app.is_loading;
        self.input_box.focused = self.focus == Focus::Input;
        self.input_box.placeholder = if welcome {
            WELCOME_PLACEHOLDER
        } else {
            CONVERSATION_PLACEHOLDER
        };
    }

    /// Key hints for the title bar.
    pub fn hints(&self) -> &'static str {
        match self.focus {
            Focus::Input => "Enter send  Tab focus  ^N new  ^B sidebar  ^C quit",
            Focus::Messages => "↑/↓ select  Enter/o download  Esc input",
            Focus::Suggestions => "↑/↓ choose  Enter send  Esc input",
            Focus::Sidebar => self.sidebar.help_text().trim(),
        }
    }

    fn leave_sidebar(&mut self) -> Option<Action> {
        match self.sidebar.blur() {
            Some(SidebarEvent::Rename { id, title }) => Some(Action::RenameSession { id, title }),
            _ => None,
        }
    }

    fn focus_input(&mut self) {
        self.message_list.selected_index = None;
        self.focus = Focus::Input;
    }
}

/// Translate one terminal event into actions, updating presentation state
/// (focus, selection, scroll) along the way. Leaving the sidebar mid-rename
/// commits the rename ahead of whatever the key itself does.
pub fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Vec<Action> {
    match event {
        TuiEvent::ForceQuit => vec![Action::Quit],
        TuiEvent::Resize => Vec::new(),
        TuiEvent::NewChat => {
            let rename = tui.leave_sidebar();
            tui.focus_input();
            rename.into_iter().chain([Action::NewChat]).collect()
        }
        TuiEvent::ToggleSidebar => {
            tui.sidebar.open = !tui.sidebar.open;
            if tui.sidebar.open {
                tui.focus = Focus::Sidebar;
                return Vec::new();
            }
            let rename = tui.leave_sidebar();
            tui.focus_input();
            rename.into_iter().collect()
        }
        TuiEvent::RetryConnection => vec![Action::LoadSessions],
        TuiEvent::ProbeConnection => vec![Action::ProbeConnection],
        TuiEvent::FocusNext => {
            let next = next_focus(tui.focus, tui.sidebar.open, app.welcome_visible());
            let rename = if tui.focus == Focus::Sidebar {
                tui.leave_sidebar()
            } else {
                None
            };
            if next == Focus::Input {
                tui.focus_input();
            } else {
                tui.focus = next;
            }
            rename.into_iter().collect()
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            Vec::new()
        }
        _ => route_focused(app, tui, event).into_iter().collect(),
    }
}

/// Keys that belong to whichever pane has focus.
fn route_focused(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match tui.focus {
        Focus::Input => {
            if matches!(event, TuiEvent::Escape) {
                if !app.welcome_visible() && !app.messages.is_empty() {
                    tui.focus = Focus::Messages;
                    tui.message_list.select_prev(app.messages.len());
                }
                return None;
            }
            match tui.input_box.handle_event(event)? {
                InputEvent::Submit(text) => Some(Action::Submit(text)),
                InputEvent::ContentChanged => None,
            }
        }
        Focus::Messages => match event {
            TuiEvent::CursorUp => {
                tui.message_list.select_prev(app.messages.len());
                None
            }
            TuiEvent::CursorDown => {
                tui.message_list.select_next(app.messages.len());
                None
            }
            TuiEvent::CursorEnd => {
                tui.message_list.handle_event(event);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar('o') => {
                let index = tui.message_list.selected_index?;
                let message = app.messages.get(index)?;
                Some(Action::DownloadReport {
                    message_id: message.id.clone(),
                })
            }
            TuiEvent::Escape => {
                tui.focus_input();
                None
            }
            // Typing jumps back to the input and keeps the keystroke
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                tui.focus_input();
                tui.input_box.handle_event(event);
                None
            }
            _ => None,
        },
        Focus::Suggestions => {
            if matches!(event, TuiEvent::Escape) {
                tui.focus_input();
                return None;
            }
            match tui.welcome.handle_event(event)? {
                WelcomeEvent::Suggestion(text) => {
                    tui.focus_input();
                    Some(Action::Submit(text))
                }
            }
        }
        Focus::Sidebar => match tui.sidebar.handle_event(event)? {
            SidebarEvent::Select(id) => {
                tui.focus_input();
                Some(Action::SelectSession(id))
            }
            SidebarEvent::NewChat => {
                tui.focus_input();
                Some(Action::NewChat)
            }
            SidebarEvent::Rename { id, title } => Some(Action::RenameSession { id, title }),
            SidebarEvent::Delete(id) => Some(Action::DeleteSession(id)),
            SidebarEvent::Dismiss => {
                tui.focus_input();
                None
            }
        },
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig, backend: Arc<dyn ChatBackend>) -> std::io::Result<()> {
    let mut app = App::from_config(backend, &config);
    let mut tui = TuiState::new(&app, config.sidebar_open);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Initial session list
    let effect = update(&mut app, Action::LoadSessions);
    run_effect(&app, effect, &tx);

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    while !should_quit {
        tui.sync(&app);
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Short timeout while the spinner runs, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in route_event(&app, &mut tui, &event) {
                let effect = update(&mut app, action);
                if effect == Effect::Quit {
                    should_quit = true;
                }
                run_effect(&app, effect, &tx);
            }
            if should_quit {
                break;
            }
            tui.sync(&app);
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            run_effect(&app, effect, &tx);
        }
    }

    info!("Mercodex shutting down");
    ratatui::restore();
    Ok(())
}

/// Start the I/O an `Effect` asks for. Every task reports back through `tx`.
fn run_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) {
    match effect {
        Effect::None | Effect::Quit => {}
        Effect::SendMessage { session_id, text } => {
            spawn_send(app.backend.clone(), session_id, app.user_id.clone(), text, tx.clone())
        }
        Effect::LoadSessions => {
            spawn_load_sessions(app.backend.clone(), app.user_id.clone(), tx.clone())
        }
        Effect::LoadHistory(session_id) => {
            spawn_load_history(app.backend.clone(), session_id, tx.clone())
        }
        Effect::Probe => spawn_probe(app.backend.clone(), app.user_id.clone(), tx.clone()),
        Effect::DownloadReport(link) => spawn_download(app.backend.clone(), link, tx.clone()),
    }
}

fn send_action(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to send background result: receiver dropped");
    }
}

fn spawn_send(
    backend: Arc<dyn ChatBackend>,
    session_id: String,
    user_id: String,
    text: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning send (session={})", session_id);
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let action = match backend.send_message(&session_id, &user_id, &text).await {
            Ok(reply) => {
                debug!("Reply after {}ms", started.elapsed().as_millis());
                Action::ReplyReceived(reply)
            }
            Err(e) => Action::SendFailed(e.to_string()),
        };
        send_action(&tx, action);
    });
}

fn spawn_load_sessions(backend: Arc<dyn ChatBackend>, user_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning session list load for {}", user_id);
    tokio::spawn(async move {
        let action = match backend.list_sessions(&user_id).await {
            Ok(sessions) => Action::SessionsLoaded(sessions),
            Err(e) => Action::SessionsFailed(e.to_string()),
        };
        send_action(&tx, action);
    });
}

fn spawn_load_history(backend: Arc<dyn ChatBackend>, session_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning history load for {}", session_id);
    tokio::spawn(async move {
        let action = match backend.session_history(&session_id).await {
            Ok(entries) => Action::HistoryLoaded {
                session_id,
                entries,
            },
            Err(e) => Action::HistoryFailed {
                session_id,
                error: e.to_string(),
            },
        };
        send_action(&tx, action);
    });
}

fn spawn_probe(backend: Arc<dyn ChatBackend>, user_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning connection probe");
    tokio::spawn(async move {
        let reachable = backend.probe(&user_id).await;
        send_action(&tx, Action::ProbeFinished(reachable));
    });
}

fn spawn_download(backend: Arc<dyn ChatBackend>, link: ReportLink, tx: mpsc::Sender<Action>) {
    info!("Spawning report download: {}", link.url);
    tokio::spawn(async move {
        let action = match backend.download_report(&link.url).await {
            Ok(bytes) => {
                let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
                let path = report_destination(&dir, &link.file_name);
                match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => {
                        info!("Saved {} bytes to {}", bytes.len(), path.display());
                        Action::ReportSaved(path)
                    }
                    Err(e) => Action::ReportFailed(format!("{}: {}", path.display(), e)),
                }
            }
            Err(e) => Action::ReportFailed(e.to_string()),
        };
        send_action(&tx, action);
    });
}

/// Where a downloaded report is written. Only the final path component of
/// the advertised file name is used.
fn report_destination(dir: &Path, file_name: &str) -> PathBuf {
    let name = Path::new(file_name)
        .file_name()
        .filter(|n| !n.is_empty())
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "report.pdf".into());
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HistoryEntry;
    use crate::core::types::ChatMessage;
    use crate::test_support::test_app;

    // ========================================================================
    // Focus order
    // ========================================================================

    #[test]
    fn test_focus_cycle_on_welcome_with_sidebar() {
        let mut focus = Focus::Input;
        let mut seen = Vec::new();
        for _ in 0..3 {
            focus = next_focus(focus, true, true);
            seen.push(focus);
        }
        assert_eq!(seen, vec![Focus::Suggestions, Focus::Sidebar, Focus::Input]);
    }

    #[test]
    fn test_focus_cycle_in_conversation_without_sidebar() {
        assert_eq!(next_focus(Focus::Input, false, false), Focus::Messages);
        assert_eq!(next_focus(Focus::Messages, false, false), Focus::Input);
        assert_eq!(next_focus(Focus::Sidebar, false, false), Focus::Input);
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    fn type_text(app: &App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            assert!(route_event(app, tui, &TuiEvent::InputChar(c)).is_empty());
        }
    }

    #[test]
    fn test_typing_then_enter_submits() {
        let app = test_app();
        let mut tui = TuiState::new(&app, true);
        tui.sync(&app);
        type_text(&app, &mut tui, "best phone");
        match route_event(&app, &mut tui, &TuiEvent::Submit).as_slice() {
            [Action::Submit(text)] => assert_eq!(text, "best phone"),
            other => panic!("expected submit, got {other:?}"),
        }
        assert_eq!(tui.input_box.text(), "");
    }

    #[test]
    fn test_input_is_disabled_while_loading() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".into()));
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);
        type_text(&app, &mut tui, "second");
        assert!(route_event(&app, &mut tui, &TuiEvent::Submit).is_empty());
        assert_eq!(tui.input_box.text(), "");
    }

    #[test]
    fn test_suggestion_is_submitted_from_welcome() {
        let app = test_app();
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);
        route_event(&app, &mut tui, &TuiEvent::FocusNext);
        assert_eq!(tui.focus, Focus::Suggestions);

        match route_event(&app, &mut tui, &TuiEvent::Submit).as_slice() {
            [Action::Submit(text)] => assert_eq!(text, &app.suggestions[0]),
            other => panic!("expected submit, got {other:?}"),
        }
        assert_eq!(tui.focus, Focus::Input);
    }

    #[test]
    fn test_global_shortcuts() {
        let app = test_app();
        let mut tui = TuiState::new(&app, false);
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::ForceQuit).as_slice(),
            [Action::Quit]
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::NewChat).as_slice(),
            [Action::NewChat]
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::RetryConnection).as_slice(),
            [Action::LoadSessions]
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::ProbeConnection).as_slice(),
            [Action::ProbeConnection]
        ));
    }

    #[test]
    fn test_toggle_sidebar_moves_focus() {
        let app = test_app();
        let mut tui = TuiState::new(&app, false);
        assert!(route_event(&app, &mut tui, &TuiEvent::ToggleSidebar).is_empty());
        assert!(tui.sidebar.open);
        assert_eq!(tui.focus, Focus::Sidebar);

        route_event(&app, &mut tui, &TuiEvent::ToggleSidebar);
        assert!(!tui.sidebar.open);
        assert_eq!(tui.focus, Focus::Input);
    }

    fn app_with_report() -> App {
        let mut app = test_app();
        update(&mut app, Action::Submit("analyze".into()));
        update(
            &mut app,
            Action::ReplyReceived(crate::backend::BotReply::Text(
                "Done. Download: /api/reports/download/r.pdf".into(),
            )),
        );
        app
    }

    #[test]
    fn test_escape_selects_last_message_and_enter_downloads() {
        let app = app_with_report();
        assert!(app.messages[1].report.is_some());
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);

        route_event(&app, &mut tui, &TuiEvent::Escape);
        assert_eq!(tui.focus, Focus::Messages);
        assert_eq!(tui.message_list.selected_index, Some(1));

        match route_event(&app, &mut tui, &TuiEvent::InputChar('o')).as_slice() {
            [Action::DownloadReport { message_id }] => {
                assert_eq!(message_id, &app.messages[1].id)
            }
            other => panic!("expected download, got {other:?}"),
        }
    }

    #[test]
    fn test_typing_in_messages_returns_to_input() {
        let app = app_with_report();
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);
        route_event(&app, &mut tui, &TuiEvent::Escape);

        route_event(&app, &mut tui, &TuiEvent::InputChar('x'));
        assert_eq!(tui.focus, Focus::Input);
        assert_eq!(tui.message_list.selected_index, None);
        assert_eq!(tui.input_box.text(), "x");
    }

    #[test]
    fn test_sidebar_select_loads_session() {
        let mut app = app_with_report();
        update(&mut app, Action::NewChat);
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);

        route_event(&app, &mut tui, &TuiEvent::ToggleSidebar);
        assert_eq!(tui.focus, Focus::Sidebar);
        let id = app.sessions[0].id.clone();
        match route_event(&app, &mut tui, &TuiEvent::Submit).as_slice() {
            [Action::SelectSession(selected)] => assert_eq!(selected, &id),
            other => panic!("expected select, got {other:?}"),
        }
        assert_eq!(tui.focus, Focus::Input);
    }

    #[test]
    fn test_tab_out_of_sidebar_commits_rename() {
        let app = app_with_report();
        let mut tui = TuiState::new(&app, true);
        tui.sync(&app);
        tui.focus = Focus::Sidebar;

        route_event(&app, &mut tui, &TuiEvent::InputChar('r'));
        assert!(tui.sidebar.is_renaming());
        for c in "Phones".chars() {
            route_event(&app, &mut tui, &TuiEvent::InputChar(c));
        }

        match route_event(&app, &mut tui, &TuiEvent::FocusNext).as_slice() {
            [Action::RenameSession { id, title }] => {
                assert_eq!(id, &app.sessions[0].id);
                assert!(title.ends_with("Phones"));
            }
            other => panic!("expected rename, got {other:?}"),
        }
        assert_eq!(tui.focus, Focus::Input);
    }

    #[test]
    fn test_new_chat_during_rename_commits_first() {
        let app = app_with_report();
        let mut tui = TuiState::new(&app, true);
        tui.sync(&app);
        tui.focus = Focus::Sidebar;
        route_event(&app, &mut tui, &TuiEvent::InputChar('r'));

        let actions = route_event(&app, &mut tui, &TuiEvent::NewChat);
        assert!(matches!(
            actions.as_slice(),
            [Action::RenameSession { .. }, Action::NewChat]
        ));
        assert!(!tui.sidebar.is_renaming());
    }

    // ========================================================================
    // Sync with app state
    // ========================================================================

    #[test]
    fn test_view_change_resets_message_list() {
        let mut app = app_with_report();
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);
        tui.message_list.selected_index = Some(0);

        update(&mut app, Action::NewChat);
        tui.sync(&app);
        assert_eq!(tui.message_list.selected_index, None);
        assert_eq!(tui.seen_epoch, app.view_epoch);
        assert_eq!(tui.input_box.placeholder, WELCOME_PLACEHOLDER);
    }

    #[test]
    fn test_history_load_keeps_view_state() {
        let mut app = app_with_report();
        let id = app.sessions[0].id.clone();
        update(&mut app, Action::SelectSession(id.clone()));
        let mut tui = TuiState::new(&app, false);
        tui.sync(&app);
        tui.focus = Focus::Messages;

        update(
            &mut app,
            Action::HistoryLoaded {
                session_id: id,
                entries: vec![HistoryEntry {
                    text: "hello".into(),
                    sender: crate::core::types::Sender::User,
                }],
            },
        );
        tui.sync(&app);
        assert_eq!(tui.focus, Focus::Messages);
        assert_eq!(tui.input_box.placeholder, CONVERSATION_PLACEHOLDER);
    }

    #[test]
    fn test_focus_falls_back_when_pane_disappears() {
        let mut app = test_app();
        let mut tui = TuiState::new(&app, false);
        tui.focus = Focus::Suggestions;
        app.messages.push(ChatMessage::user("hi"));
        app.show_welcome = false;
        tui.sync(&app);
        assert_eq!(tui.focus, Focus::Input);

        tui.focus = Focus::Sidebar;
        tui.sync(&app);
        assert_eq!(tui.focus, Focus::Input);
    }

    // ========================================================================
    // Report destination
    // ========================================================================

    #[test]
    fn test_report_destination_strips_directories() {
        let dir = Path::new("/tmp/downloads");
        assert_eq!(
            report_destination(dir, "report_1.pdf"),
            dir.join("report_1.pdf")
        );
        assert_eq!(
            report_destination(dir, "../../etc/passwd"),
            dir.join("passwd")
        );
        assert_eq!(report_destination(dir, ""), dir.join("report.pdf"));
    }
}
