//! Text buffer with a byte-offset cursor.
//!
//! Every operation keeps `cursor` on a char boundary in `0..=text.len()`.
//! Operations return `true` when something changed.

#[derive(Debug, Default, Clone)]
pub(super) struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        if self.text.is_char_boundary(pos) {
            self.cursor = pos;
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        // Terminals deliver pasted line breaks as CR or CRLF
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    pub fn backspace(&mut self) -> bool {
        let Some(prev) = self.prev_boundary() else {
            return false;
        };
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        let Some(next) = self.next_boundary() else {
            return false;
        };
        self.text.drain(self.cursor..next);
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.prev_boundary().map(|p| self.cursor = p).is_some()
    }

    pub fn move_right(&mut self) -> bool {
        self.next_boundary().map(|n| self.cursor = n).is_some()
    }

    /// Move to the start of the current logical line.
    pub fn move_home(&mut self) -> bool {
        let start = self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let moved = start != self.cursor;
        self.cursor = start;
        moved
    }

    /// Move to the end of the current logical line.
    pub fn move_end(&mut self) -> bool {
        let end = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
        let moved = end != self.cursor;
        self.cursor = end;
        moved
    }

    /// Take the text out, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}
