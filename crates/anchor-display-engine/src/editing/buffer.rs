use std::ops::Range;

use xi_rope::{Delta, Rope, RopeInfo};

use super::editor::{Editor, Position};
use super::patch::Patch;

/// An in-memory text document backed by an `xi_rope::Rope`.
///
/// `Buffer` is the reference [`Editor`] implementation: the terminal host edits
/// through it and the integration tests drive the coordinators against it.
///
/// - Every mutation compiles to a single `Delta` and bumps the version
/// - The cursor is a byte offset into the whole document, kept on a
///   character boundary and moved through each splice
/// - Lines are split on `\n`; a trailing `\r` is not part of the line text
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    cursor: usize,
    version: u64,
}

impl Buffer {
    /// Creates a buffer with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        let rope = Rope::from(text);
        let cursor = rope.len();
        Self {
            rope,
            cursor,
            version: 0,
        }
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    /// Version counter incremented on each splice.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of lines; an empty buffer has one empty line.
    pub fn line_count(&self) -> usize {
        self.rope.line_of_offset(self.rope.len()) + 1
    }

    /// Converts a document offset into a line/column position.
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len());
        let line = self.rope.line_of_offset(offset);
        Position::new(line, offset - self.rope.offset_of_line(line))
    }

    /// Converts a position into a document offset, clamping the line to the
    /// document and the column to the line.
    pub fn offset_of(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        let start = self.rope.offset_of_line(line);
        let text = self.line_text(line);
        start + floor_char_boundary(&text, pos.ch)
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.offset_of(pos);
    }

    /// Replaces `range` with `text` and maps the cursor through the edit.
    ///
    /// Out-of-range offsets are clamped to the document.
    pub fn splice(&mut self, range: Range<usize>, text: &str) -> Patch {
        let len = self.rope.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);

        let delta: Delta<RopeInfo> = Delta::simple_edit(start..end, Rope::from(text), len);
        self.rope = delta.apply(&self.rope);

        self.cursor = map_offset(self.cursor, start, end, text.len());
        self.version += 1;

        Patch {
            changed: start..start + text.len(),
            removed: end - start,
            new_cursor: self.cursor,
            version: self.version,
        }
    }

    /// Types `text` at the cursor, leaving the cursor after it.
    pub fn insert(&mut self, text: &str) -> Patch {
        let at = self.cursor;
        self.splice(at..at, text)
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) -> Option<Patch> {
        let prev = self.rope.prev_codepoint_offset(self.cursor)?;
        Some(self.splice(prev..self.cursor, ""))
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.rope.prev_codepoint_offset(self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.rope.next_codepoint_offset(self.cursor) {
            self.cursor = next;
        }
    }

    pub fn move_up(&mut self) {
        let pos = self.position_of(self.cursor);
        if pos.line > 0 {
            self.set_cursor(Position::new(pos.line - 1, pos.ch));
        }
    }

    pub fn move_down(&mut self) {
        let pos = self.position_of(self.cursor);
        if pos.line + 1 < self.line_count() {
            self.set_cursor(Position::new(pos.line + 1, pos.ch));
        }
    }

    pub fn move_line_start(&mut self) {
        let pos = self.position_of(self.cursor);
        self.set_cursor(Position::new(pos.line, 0));
    }

    pub fn move_line_end(&mut self) {
        let pos = self.position_of(self.cursor);
        self.set_cursor(Position::new(pos.line, usize::MAX));
    }

    fn line_text(&self, line: usize) -> String {
        let start = self.rope.offset_of_line(line);
        let end = self.rope.offset_of_line(line + 1);
        let cow = self.rope.slice_to_cow(start..end);
        let raw: &str = &cow;
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        text.strip_suffix('\r').unwrap_or(text).to_string()
    }
}

impl Editor for Buffer {
    fn line(&self, index: usize) -> Option<String> {
        (index < self.line_count()).then(|| self.line_text(index))
    }

    fn cursor(&self) -> Position {
        self.position_of(self.cursor)
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>) {
        let start = self.offset_of(from);
        let end = to.map_or(start, |to| self.offset_of(to));
        self.splice(start..end, text);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("text", &self.rope.to_string())
            .field("cursor", &self.cursor)
            .field("version", &self.version)
            .finish()
    }
}

/// Moves an offset through a splice of `start..end` replaced by
/// `inserted` bytes. Offsets inside or at the edges of the replaced range end
/// up after the inserted text.
fn map_offset(pos: usize, start: usize, end: usize, inserted: usize) -> usize {
    if pos < start {
        pos
    } else if pos <= end {
        start + inserted
    } else {
        pos - (end - start) + inserted
    }
}

/// Largest character boundary in `text` at or below `ch`.
fn floor_char_boundary(text: &str, ch: usize) -> usize {
    let mut ch = ch.min(text.len());
    while !text.is_char_boundary(ch) {
        ch -= 1;
    }
    ch
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_buffer_puts_cursor_at_end() {
        let buffer = Buffer::new("one\ntwo");
        assert_eq!(buffer.cursor(), Position::new(1, 3));
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn empty_buffer_has_one_empty_line() {
        let buffer = Buffer::new("");
        assert!(buffer.is_empty());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0).as_deref(), Some(""));
        assert_eq!(buffer.line(1), None);
    }

    #[test]
    fn lines_exclude_terminators() {
        let buffer = Buffer::new("first\r\nsecond\n");
        assert_eq!(buffer.line(0).as_deref(), Some("first"));
        assert_eq!(buffer.line(1).as_deref(), Some("second"));
        assert_eq!(buffer.line(2).as_deref(), Some(""));
    }

    #[test]
    fn replace_range_inserts_without_end() {
        let mut buffer = Buffer::new("[[A#B]]");
        buffer.replace_range("|B", Position::new(0, 5), None);
        assert_eq!(buffer.text(), "[[A#B|B]]");
        assert_eq!(buffer.version(), 1);
        // cursor was after `]]`, it stays after `]]`
        assert_eq!(buffer.cursor(), Position::new(0, 9));
    }

    #[test]
    fn replace_range_replaces_span_on_later_line() {
        let mut buffer = Buffer::new("intro\n[[A#B|old]]");
        buffer.replace_range("|new", Position::new(1, 5), Some(Position::new(1, 9)));
        assert_eq!(buffer.text(), "intro\n[[A#B|new]]");
    }

    #[test]
    fn splice_reports_changed_range() {
        let mut buffer = Buffer::new("abcdef");
        let patch = buffer.splice(1..3, "XYZ");
        assert_eq!(buffer.text(), "aXYZdef");
        assert_eq!(patch.changed, 1..4);
        assert_eq!(patch.removed, 2);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn splice_clamps_out_of_range() {
        let mut buffer = Buffer::new("abc");
        buffer.splice(10..20, "!");
        assert_eq!(buffer.text(), "abc!");
    }

    #[test]
    fn insert_and_backspace_move_cursor() {
        let mut buffer = Buffer::new("");
        buffer.insert("ab");
        buffer.insert("é");
        assert_eq!(buffer.text(), "abé");
        assert_eq!(buffer.cursor(), Position::new(0, 4));

        buffer.backspace();
        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut buffer = Buffer::new("abc");
        buffer.set_cursor(Position::new(0, 0));
        assert_eq!(buffer.backspace(), None);
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn insert_mid_text_keeps_cursor_after_insertion() {
        let mut buffer = Buffer::new("ac");
        buffer.set_cursor(Position::new(0, 1));
        buffer.insert("b");
        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.cursor(), Position::new(0, 2));
    }

    #[test]
    fn vertical_moves_clamp_column_to_char_boundary() {
        let mut buffer = Buffer::new("héllo\nab");
        buffer.set_cursor(Position::new(1, 2));
        buffer.move_up();
        // byte 2 is inside "é", so the column backs off to 1
        assert_eq!(buffer.cursor(), Position::new(0, 1));
        buffer.move_line_end();
        assert_eq!(buffer.cursor(), Position::new(0, "héllo".len()));
        buffer.move_down();
        assert_eq!(buffer.cursor(), Position::new(1, 2));
    }

    #[test]
    fn horizontal_moves_cross_lines() {
        let mut buffer = Buffer::new("a\nb");
        buffer.set_cursor(Position::new(1, 0));
        buffer.move_left();
        assert_eq!(buffer.cursor(), Position::new(0, 1));
        buffer.move_right();
        assert_eq!(buffer.cursor(), Position::new(1, 0));
        buffer.move_line_start();
        assert_eq!(buffer.cursor(), Position::new(1, 0));
    }

    #[test]
    fn map_offset_cases() {
        // before, inside, after a 2..4 -> 3 byte replacement
        assert_eq!(map_offset(1, 2, 4, 3), 1);
        assert_eq!(map_offset(3, 2, 4, 3), 5);
        assert_eq!(map_offset(6, 2, 4, 3), 7);
    }
}
