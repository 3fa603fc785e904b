//! Visual row layout for the input box.
//!
//! The buffer is split on `\n` into logical lines, and each logical line is
//! word-wrapped into rows of at most `width` display columns. Rows are byte
//! ranges into the buffer, so rendering, cursor placement and vertical
//! movement all work from the same layout.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// One visual row: `start..end` byte range, never including a `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Wrap `text` into visual rows. Always returns at least one row.
pub(super) fn wrap_rows(text: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let mut row_start = line_start;
        let mut row_width = 0;
        // Byte offset just past the last space in the current row
        let mut last_break: Option<usize> = None;

        for (i, c) in line.char_indices() {
            let at = line_start + i;
            let w = c.width().unwrap_or(0);

            while row_width + w > width && at > row_start {
                let split = match last_break {
                    Some(b) if b > row_start => b,
                    _ => at,
                };
                rows.push(Row {
                    start: row_start,
                    end: split,
                });
                row_start = split;
                row_width = text[split..at].width();
                last_break = text[split..at]
                    .rfind(' ')
                    .map(|j| split + j + 1)
                    .filter(|&b| b > split);
            }

            row_width += w;
            if c == ' ' {
                last_break = Some(at + c.len_utf8());
            }
        }

        rows.push(Row {
            start: row_start,
            end: line_start + line.len(),
        });
        line_start += line.len() + 1;
    }

    rows
}

/// Index of the row holding byte offset `pos`.
///
/// At a soft wrap the cursor belongs to the start of the next row; at a hard
/// newline it stays at the end of the current one.
pub(super) fn row_of(rows: &[Row], pos: usize) -> usize {
    rows.iter()
        .rposition(|row| row.start <= pos)
        .unwrap_or(0)
}

/// Display column of `pos` inside its row.
pub(super) fn column_of(text: &str, row: Row, pos: usize) -> u16 {
    let end = pos.clamp(row.start, row.end);
    text[row.start..end].width() as u16
}

/// Byte offset in `rows[index]` closest to display column `column`.
pub(super) fn offset_at_column(text: &str, rows: &[Row], index: usize, column: u16) -> usize {
    let row = rows[index];
    let mut used = 0u16;
    let mut offset = row.start;
    for (i, c) in text[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0) as u16;
        if used + w > column {
            return row.start + i;
        }
        used += w;
        offset = row.start + i + c.len_utf8();
    }

    // The end of a soft-wrapped row is the start of the next; stay on this row
    let soft_wrapped = rows.get(index + 1).is_some_and(|next| next.start == row.end);
    if soft_wrapped && offset == row.end && offset > row.start {
        return text[..offset]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(row.start);
    }
    offset
}
