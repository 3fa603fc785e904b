//! # Connectivity Banner
//!
//! Three-line warning shown above the thread while the backend is
//! unreachable, with the two recovery shortcuts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::Component;

pub const BANNER_HEIGHT: u16 = 3;

pub struct ConnectionBanner<'a> {
    pub base_url: &'a str,
}

impl<'a> ConnectionBanner<'a> {
    pub fn new(base_url: &'a str) -> Self {
        Self { base_url }
    }
}

impl<'a> Component for ConnectionBanner<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::raw(format!("Cannot reach the backend at {}  ", self.base_url)),
            Span::styled("^R", key),
            Span::raw(" retry  "),
            Span::styled("^T", key),
            Span::raw(" test connection"),
        ]);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(
                " Connection error ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}
