use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::types::{ChatMessage, ReportLink, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank separator + link line + hint line under a message that carries a report.
const REPORT_LINES: u16 = 3;
/// Bubbles take this share of the row; below `FULL_WIDTH_BELOW` they take all of it.
const BUBBLE_PERCENT: u16 = 80;
const FULL_WIDTH_BELOW: u16 = 30;

/// A stateless component that renders one chat message as a bubble.
///
/// User bubbles sit on the right, bot bubbles on the left. Connection
/// errors render red. A message carrying a report gets a download
/// affordance below its text.
///
/// Text is pre-wrapped with `textwrap` and rendered line by line, so
/// [`calculate_height`](Self::calculate_height) and the rendered output
/// always agree.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    /// Whether this message is selected in message-navigation focus
    pub is_selected: bool,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, is_selected: bool) -> Self {
        Self {
            message,
            is_selected,
        }
    }

    /// Width of the bubble inside a row of `width` columns.
    pub fn bubble_width(width: u16) -> u16 {
        if width < FULL_WIDTH_BELOW {
            width
        } else {
            width * BUBBLE_PERCENT / 100
        }
    }

    /// Height of the rendered bubble, computed without rendering.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = Self::bubble_width(width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let text_lines = wrap_text(&message.text, content_width).len() as u16;
        let report_lines = if message.report.is_some() {
            REPORT_LINES
        } else {
            0
        };
        text_lines + report_lines + VERTICAL_OVERHEAD
    }
}

/// Wrap trimmed text into display lines; empty text is one empty line.
fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let content = text.trim();
    if content.is_empty() {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(content, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn sender_style(message: &ChatMessage) -> Style {
    match (message.sender, message.is_error) {
        (_, true) => Style::default().fg(Color::Red),
        (Sender::User, false) => Style::default().fg(Color::Cyan),
        (Sender::Bot, false) => Style::default().fg(Color::Green),
    }
}

fn sender_label(message: &ChatMessage) -> &'static str {
    match (message.sender, message.is_error) {
        (_, true) => " error ",
        (Sender::User, false) => " you ",
        (Sender::Bot, false) => " mercodex ",
    }
}

fn report_lines(report: &ReportLink, width: u16) -> Vec<Line<'static>> {
    let link = format!("▤ {}", report.file_name);
    let hint = if width >= 28 {
        "Enter/o to download"
    } else {
        "Enter: download"
    };
    vec![
        Line::default(),
        Line::from(Span::styled(
            link,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ]
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bubble_width = Self::bubble_width(area.width);
        let x = match self.message.sender {
            Sender::User => area.x + area.width.saturating_sub(bubble_width),
            Sender::Bot => area.x,
        };
        let bubble = Rect::new(x, area.y, bubble_width, area.height);

        let style = sender_style(self.message);
        let border_style = if self.is_selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };
        let border_type = if self.is_selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };

        let block = Block::bordered()
            .title(sender_label(self.message))
            .border_type(border_type)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(bubble);
        block.render(bubble, buf);

        let text_style = if self.message.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let mut lines: Vec<Line> = wrap_text(&self.message.text, inner.width)
            .into_iter()
            .map(|line| Line::styled(line, text_style))
            .collect();
        if let Some(report) = &self.message.report {
            lines.extend(report_lines(report, inner.width));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
