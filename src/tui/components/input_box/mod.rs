//! # InputBox Component
//!
//! Free-text input for questions to the research assistant.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste and cursor editing
//! - Submit on Enter (modifier+Enter inserts a newline, see `event::map_key`)
//! - Show a placeholder while empty
//! - Refuse all editing and submission while `disabled`
//!
//! ## State Management
//!
//! The buffer and scroll offset are internal state. `disabled`, `focused`
//! and `placeholder` are props synced from the app every frame.

mod editor;
mod wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editor::EditBuffer;
use wrap::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, column_of,
    inner_width, offset_at_column, row_of, wrap_rows,
};

pub const WELCOME_PLACEHOLDER: &str = "What product do you want to analyze?";
pub const CONVERSATION_PLACEHOLDER: &str = "Type your message here...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    buffer: EditBuffer,
    /// First visible row when content exceeds `MAX_VISIBLE_LINES`
    scroll_offset: u16,
    /// Area width from the last render (used for vertical cursor movement)
    last_width: u16,
    /// Prop: blocks editing and submit while a send is in flight
    pub disabled: bool,
    /// Prop: whether the input owns keyboard focus
    pub focused: bool,
    /// Prop: shown in gray while the buffer is empty
    pub placeholder: &'static str,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            buffer: EditBuffer::default(),
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
            disabled: false,
            focused: true,
            placeholder: WELCOME_PLACEHOLDER,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Height needed for the current content, clamped to the visible maximum.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = wrap_rows(self.buffer.text(), inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn move_vertically(&mut self, down: bool) -> bool {
        let text = self.buffer.text();
        let rows = wrap_rows(text, inner_width(self.last_width));
        let current = row_of(&rows, self.buffer.cursor());
        let target = if down {
            if current + 1 >= rows.len() {
                return false;
            }
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        };
        let column = column_of(text, rows[current], self.buffer.cursor());
        let offset = offset_at_column(text, &rows, target, column);
        self.buffer.set_cursor(offset);
        true
    }

    /// Keep the cursor row inside the visible window.
    fn update_scroll(&mut self, cursor_row: u16, total_rows: u16) {
        if total_rows <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
        } else if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;

        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let title = if self.disabled { " Analyzing... " } else { " Ask " };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        if self.buffer.text().is_empty() {
            let placeholder = Paragraph::new(self.placeholder)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
                .block(block);
            frame.render_widget(placeholder, area);
            self.scroll_offset = 0;
            if self.focused && !self.disabled {
                frame.set_cursor_position((area.x + CONTENT_OFFSET_X, area.y + CONTENT_OFFSET_Y));
            }
            return;
        }

        let rows = wrap_rows(self.buffer.text(), inner_width(area.width));
        let cursor_row = row_of(&rows, self.buffer.cursor());
        self.update_scroll(cursor_row as u16, rows.len() as u16);

        let text = self.buffer.text();
        let visible: Vec<Line> = rows
            .iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|row| Line::raw(&text[row.start..row.end]))
            .collect();
        let text_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };
        frame.render_widget(Paragraph::new(visible).style(text_style).block(block), area);

        if self.focused && !self.disabled {
            let column = column_of(text, rows[cursor_row], self.buffer.cursor());
            let x = (area.x + CONTENT_OFFSET_X + column)
                .min(area.right().saturating_sub(CONTENT_OFFSET_X));
            let y = area.y + CONTENT_OFFSET_Y + (cursor_row as u16).saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }

        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert_char(*c);
                true
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(text);
                true
            }
            TuiEvent::Backspace => self.buffer.backspace(),
            TuiEvent::Delete => self.buffer.delete(),
            TuiEvent::CursorLeft => self.buffer.move_left(),
            TuiEvent::CursorRight => self.buffer.move_right(),
            TuiEvent::CursorHome => self.buffer.move_home(),
            TuiEvent::CursorEnd => self.buffer.move_end(),
            TuiEvent::CursorUp => self.move_vertically(false),
            TuiEvent::CursorDown => self.move_vertically(true),
            TuiEvent::Submit => {
                if self.buffer.is_blank() {
                    return None;
                }
                self.scroll_offset = 0;
                return Some(InputEvent::Submit(self.buffer.take()));
            }
            _ => false,
        };

        changed.then_some(InputEvent::ContentChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new();
        assert!(input.text().is_empty());
        assert!(!input.disabled);
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        type_text(&mut input, "b");
        assert_eq!(input.text(), "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "Compare laptops");

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "Compare laptops"),
            other => panic!("Expected Submit event, got {:?}", other),
        }
        assert!(input.text().is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_blank_input_never_submits() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);

        type_text(&mut input, "  \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "  \n ", "blank text is kept, not cleared");
    }

    #[test]
    fn test_disabled_never_emits_submit() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");
        input.disabled = true;

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "hello");
    }

    #[test]
    fn test_disabled_blocks_editing() {
        let mut input = InputBox::new();
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(
            input.handle_event(&TuiEvent::Paste("pasted".to_string())),
            None
        );
        assert!(input.text().is_empty());
    }

    #[test]
    fn test_newline_char_is_kept() {
        let mut input = InputBox::new();
        type_text(&mut input, "line one\nline two");
        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "line one\nline two"),
            other => panic!("Expected Submit event, got {:?}", other),
        }
    }

    #[test]
    fn test_vertical_movement_between_lines() {
        let mut input = InputBox::new();
        type_text(&mut input, "abc\nde");
        assert_eq!(
            input.handle_event(&TuiEvent::CursorUp),
            Some(InputEvent::ContentChanged)
        );
        // Column 2 on "abc"
        input.handle_event(&TuiEvent::InputChar('X'));
        assert_eq!(input.text(), "abXc\nde");
        assert_eq!(input.handle_event(&TuiEvent::CursorUp), None);
    }

    #[test]
    fn test_height_grows_then_clamps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        type_text(&mut input, "1\n2\n3");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
        type_text(&mut input, "\n4\n5\n6\n7\n8");
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();
        input.placeholder = CONVERSATION_PLACEHOLDER;

        terminal.draw(|f| input.render(f, f.area())).unwrap();
        assert!(screen_text(&terminal).contains("Type your message here..."));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let backend = TestBackend::new(30, 7);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();
        type_text(&mut input, "l1\nl2\nl3\nl4\nl5\nl6\nl7");

        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("l7"));
        assert!(!text.contains("l1"));
    }

    #[test]
    fn test_render_disabled_title() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();
        input.disabled = true;

        terminal.draw(|f| input.render(f, f.area())).unwrap();
        assert!(screen_text(&terminal).contains("Analyzing..."));
    }
}
