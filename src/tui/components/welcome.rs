//! # Welcome Screen Component
//!
//! Shown in place of the thread while the conversation is empty: product
//! name, tagline, capability list and suggested prompts. A chosen suggestion
//! is sent exactly like typed input.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const TAGLINE: &str =
    "Analyze products, generate professional reports and get market insights with AI";

const CAPABILITIES: [(&str, &str); 3] = [
    ("Web search", "real-time analysis of products and social media opinions"),
    ("Sentiment analysis", "positive and negative market opinions"),
    ("PDF reports", "professional documents with the full analysis"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeEvent {
    /// Send this suggestion as if it had been typed.
    Suggestion(String),
}

pub struct WelcomeState {
    pub suggestions: Vec<String>,
    pub selected: usize,
}

impl WelcomeState {
    pub fn new(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            selected: 0,
        }
    }

    fn chosen(&self, index: usize) -> Option<WelcomeEvent> {
        self.suggestions
            .get(index)
            .map(|s| WelcomeEvent::Suggestion(s.clone()))
    }
}

impl EventHandler for WelcomeState {
    type Event = WelcomeEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.selected + 1 < self.suggestions.len() {
                    self.selected += 1;
                }
                None
            }
            TuiEvent::Submit => self.chosen(self.selected),
            // 1-9 pick a suggestion directly
            TuiEvent::InputChar(c) => {
                let index = c.to_digit(10)?.checked_sub(1)? as usize;
                self.selected = index.min(self.suggestions.len().saturating_sub(1));
                self.chosen(index)
            }
            _ => None,
        }
    }
}

pub struct Welcome<'a> {
    pub state: &'a WelcomeState,
    /// Whether the suggestion list has keyboard focus
    pub focused: bool,
}

impl<'a> Welcome<'a> {
    pub fn new(state: &'a WelcomeState, focused: bool) -> Self {
        Self { state, focused }
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let accent = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled("Mercodex", accent)),
            Line::from(Span::styled(TAGLINE, Style::default().fg(Color::Gray))),
            Line::default(),
        ];
        lines.extend(CAPABILITIES.iter().map(|(name, detail)| {
            Line::from(vec![
                Span::styled(format!("{name}: "), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(*detail, Style::default().fg(Color::DarkGray)),
            ])
        }));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Try one of these:",
            Style::default().fg(Color::Magenta),
        )));
        lines
    }

    fn suggestion_lines(&self) -> Vec<Line<'a>> {
        self.state
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if self.focused && i == self.state.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(format!(" {}. {} ", i + 1, text), style))
            })
            .collect()
    }
}

impl<'a> Component for Welcome<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let header = self.header_lines();
        let suggestions = self.suggestion_lines();
        let hint = if self.focused {
            "↑/↓ choose  Enter send  Tab back to input"
        } else {
            "Tab to pick a suggestion"
        };

        let [header_area, list_area, hint_area] = Layout::vertical([
            Constraint::Length(header.len() as u16),
            Constraint::Length(suggestions.len() as u16 + 1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(
            Paragraph::new(header).alignment(Alignment::Center),
            header_area,
        );
        frame.render_widget(
            Paragraph::new(suggestions).alignment(Alignment::Center),
            list_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
            hint_area,
        );
    }
}
