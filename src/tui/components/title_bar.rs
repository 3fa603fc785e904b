//! # TitleBar Component
//!
//! Single-line bar at the top of the main column.
//!
//! Left side: product name, the active conversation's title and the current
//! status message. Right side: key hints for the focused pane, dropped first
//! when the terminal is too narrow.
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    /// Title of the active session; `None` on the welcome / new-chat view
    pub session_title: Option<&'a str>,
    pub status_message: &'a str,
    pub is_loading: bool,
    /// Key hints for whatever pane has focus
    pub hints: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        session_title: Option<&'a str>,
        status_message: &'a str,
        is_loading: bool,
        hints: &'a str,
    ) -> Self {
        Self {
            session_title,
            status_message,
            is_loading,
            hints,
        }
    }

    fn left_line(&self) -> Line<'a> {
        let mut spans = vec![Span::styled(
            " Mercodex ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            self.session_title.unwrap_or("New conversation"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if !self.status_message.is_empty() {
            let status_style = if self.is_loading {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(self.status_message, status_style));
        }
        Line::from(spans)
    }
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left = self.left_line();
        let hints_width = self.hints.chars().count() as u16 + 1;

        if area.width < left.width() as u16 + hints_width {
            frame.render_widget(Paragraph::new(left), area);
            return;
        }

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);
        frame.render_widget(Paragraph::new(left), left_area);
        frame.render_widget(
            Paragraph::new(Span::styled(self.hints, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Right),
            right_area,
        );
    }
}
