//! Line-oriented document model and structured change deltas.
//!
//! The highlighter never owns text. It reads lines through [`LineSource`] and reacts to
//! [`LineDelta`] notifications. [`Document`] is a rope-backed implementation that decomposes every
//! edit into the primitive deltas an editor document emits:
//!
//! - [`DeltaAction::InsertText`] / [`DeltaAction::RemoveText`]: text within a single row, or a
//!   single line break joining/splitting two rows.
//! - [`DeltaAction::InsertLines`] / [`DeltaAction::RemoveLines`]: whole rows.
//!
//! Each delta is applied and delivered to the [`ChangeListener`] before the next one, so a
//! listener always observes a document whose line count matches the delta it is handling.

use crate::text::{is_newline, normalize_line_breaks};
use ropey::Rope;
use std::borrow::Cow;

/// A logical position: row and column (in `char`s, excluding the line break).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column in Unicode scalar values.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Read access to a document's lines.
pub trait LineSource {
    /// Number of lines (rows) in the document.
    fn line_count(&self) -> usize;

    /// Text of `row`, without its line break.
    ///
    /// Panics if `row` is out of range.
    fn line_text(&self, row: usize) -> Cow<'_, str>;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, row: usize) -> Cow<'_, str> {
        Cow::Borrowed(self[row].as_ref())
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, row: usize) -> Cow<'_, str> {
        self.as_slice().line_text(row)
    }
}

/// Kind of a primitive document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaAction {
    /// Whole lines inserted before `start.row`; `end.row - start.row` lines.
    InsertLines,
    /// Text inserted at `start`; either in-line text or exactly one line break.
    InsertText,
    /// Whole lines `start.row..end.row` removed.
    RemoveLines,
    /// Text removed between `start` and `end`; either in-line text or exactly one line break.
    RemoveText,
}

/// A single primitive change, expressed in row/column positions.
///
/// Semantics:
/// - For insertions, `start..end` is the range the new text occupies **after** the change.
/// - For removals, `start..end` is the range the text occupied **before** the change.
/// - `text` is the exact inserted or removed text (whole lines are joined with `'\n'` and carry
///   a trailing `'\n'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDelta {
    /// What happened.
    pub action: DeltaAction,
    /// Range start.
    pub start: Position,
    /// Range end.
    pub end: Position,
    /// Inserted or removed text.
    pub text: String,
}

impl LineDelta {
    /// Number of rows added (for insertions) or removed (for removals).
    pub fn row_span(&self) -> usize {
        self.end.row - self.start.row
    }

    /// Returns `true` if `text` is exactly one line break.
    pub fn is_line_break(&self) -> bool {
        is_newline(&self.text)
    }
}

/// Receives primitive deltas from a [`Document`] as they are applied.
pub trait ChangeListener {
    /// Called after `delta` has been applied to `document`.
    fn on_change(&mut self, document: &Document, delta: &LineDelta);
}

impl<F> ChangeListener for F
where
    F: FnMut(&Document, &LineDelta),
{
    fn on_change(&mut self, document: &Document, delta: &LineDelta) {
        self(document, delta)
    }
}

/// Records every delta.
impl ChangeListener for Vec<LineDelta> {
    fn on_change(&mut self, _document: &Document, delta: &LineDelta) {
        self.push(delta.clone());
    }
}

/// A rope-backed text document with LF line breaks.
///
/// CRLF and lone CR are normalized to LF on input. `N` line breaks always produce `N + 1`
/// rows, so a document has at least one (possibly empty) row.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Build a document from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_breaks(text)),
        }
    }

    /// The full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of rows.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of `row` in chars, excluding its line break.
    pub fn line_len(&self, row: usize) -> usize {
        let line = self.rope.line(row);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Position just past the last character.
    pub fn end_position(&self) -> Position {
        let row = self.line_count() - 1;
        Position::new(row, self.line_len(row))
    }

    /// Clamp `position` to the document bounds.
    pub fn clamp_position(&self, position: Position) -> Position {
        if position.row >= self.line_count() {
            return self.end_position();
        }
        Position::new(position.row, position.column.min(self.line_len(position.row)))
    }

    /// Insert `text` at `position`; returns the position just past the inserted text.
    ///
    /// Multi-line text is delivered as: in-line insert on the first row, a line break, whole-line
    /// insert for the middle lines, then an in-line insert of the last line.
    pub fn insert<L: ChangeListener + ?Sized>(
        &mut self,
        position: Position,
        text: &str,
        listener: &mut L,
    ) -> Position {
        let text = normalize_line_breaks(text);
        let position = self.clamp_position(position);
        if text.is_empty() {
            return position;
        }

        let mut lines: Vec<&str> = text.split('\n').collect();
        let first = lines.remove(0);
        let mut position = self.insert_in_line(position, first, listener);
        if let Some(last) = lines.pop() {
            position = self.insert_new_line(position, listener);
            position = self.insert_full_lines(position.row, &lines, listener);
            position = self.insert_in_line(position, last, listener);
        }
        position
    }

    /// Insert whole lines before `row`, as a single [`DeltaAction::InsertLines`] delta.
    ///
    /// If `row` is past the last row, the lines are appended after a line break instead.
    pub fn insert_lines<S, L>(&mut self, row: usize, lines: &[S], listener: &mut L) -> Position
    where
        S: AsRef<str>,
        L: ChangeListener + ?Sized,
    {
        if lines.is_empty() {
            return Position::new(row.min(self.line_count()), 0);
        }
        let joined: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        let text = normalize_line_breaks(&joined.join("\n")).into_owned();

        if row < self.line_count() {
            let lines: Vec<&str> = text.split('\n').collect();
            self.insert_full_lines(row, &lines, listener)
        } else {
            let end = self.end_position();
            self.insert(end, &format!("\n{text}"), listener)
        }
    }

    /// Remove the text between `start` and `end`; returns the start of the removed range.
    ///
    /// Multi-row ranges are delivered as: prefix removal on the last row, whole-line removal for
    /// the full rows, suffix removal on the first row, then removal of the joining line break.
    pub fn remove<L: ChangeListener + ?Sized>(
        &mut self,
        start: Position,
        end: Position,
        listener: &mut L,
    ) -> Position {
        let (start, end) = {
            let a = self.clamp_position(start);
            let b = self.clamp_position(end);
            if a <= b { (a, b) } else { (b, a) }
        };
        if start == end {
            return start;
        }
        if start.row == end.row {
            self.remove_in_line(start.row, start.column, end.column, listener);
            return start;
        }

        let first_full_row = if start.column == 0 {
            start.row
        } else {
            start.row + 1
        };
        let last_full_row = end.row - 1;

        if end.column > 0 {
            self.remove_in_line(end.row, 0, end.column, listener);
        }
        if last_full_row >= first_full_row {
            self.remove_full_lines(first_full_row, last_full_row, listener);
        }
        if first_full_row != start.row {
            let len = self.line_len(start.row);
            self.remove_in_line(start.row, start.column, len, listener);
            self.remove_new_line(start.row, listener);
        }
        start
    }

    /// Remove rows `first..=last`.
    ///
    /// When the range includes the last row the removal falls back to [`Document::remove`], since
    /// a document always keeps at least one row.
    pub fn remove_lines<L: ChangeListener + ?Sized>(
        &mut self,
        first: usize,
        last: usize,
        listener: &mut L,
    ) -> Position {
        assert!(
            first <= last && last < self.line_count(),
            "rows {first}..={last} out of range ({} rows)",
            self.line_count()
        );

        if last + 1 < self.line_count() {
            self.remove_full_lines(first, last, listener);
            Position::new(first, 0)
        } else {
            let end = Position::new(last, self.line_len(last));
            let start = match first.checked_sub(1) {
                Some(prev) => Position::new(prev, self.line_len(prev)),
                None => Position::new(0, 0),
            };
            self.remove(start, end, listener)
        }
    }

    /// Replace the whole document text.
    pub fn set_text<L: ChangeListener + ?Sized>(&mut self, text: &str, listener: &mut L) {
        let end = self.end_position();
        self.remove(Position::new(0, 0), end, listener);
        self.insert(Position::new(0, 0), text, listener);
    }

    fn char_index(&self, position: Position) -> usize {
        self.rope.line_to_char(position.row) + position.column
    }

    fn emit<L: ChangeListener + ?Sized>(&self, listener: &mut L, delta: LineDelta) {
        listener.on_change(self, &delta);
    }

    fn insert_in_line<L: ChangeListener + ?Sized>(
        &mut self,
        position: Position,
        text: &str,
        listener: &mut L,
    ) -> Position {
        if text.is_empty() {
            return position;
        }
        self.rope.insert(self.char_index(position), text);
        let end = Position::new(position.row, position.column + text.chars().count());
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::InsertText,
                start: position,
                end,
                text: text.to_string(),
            },
        );
        end
    }

    fn insert_new_line<L: ChangeListener + ?Sized>(
        &mut self,
        position: Position,
        listener: &mut L,
    ) -> Position {
        self.rope.insert_char(self.char_index(position), '\n');
        let end = Position::new(position.row + 1, 0);
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::InsertText,
                start: position,
                end,
                text: "\n".to_string(),
            },
        );
        end
    }

    fn insert_full_lines<L: ChangeListener + ?Sized>(
        &mut self,
        row: usize,
        lines: &[&str],
        listener: &mut L,
    ) -> Position {
        if lines.is_empty() {
            return Position::new(row, 0);
        }
        let mut text = lines.join("\n");
        text.push('\n');
        self.rope.insert(self.rope.line_to_char(row), &text);

        let start = Position::new(row, 0);
        let end = Position::new(row + lines.len(), 0);
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::InsertLines,
                start,
                end,
                text,
            },
        );
        end
    }

    fn remove_in_line<L: ChangeListener + ?Sized>(
        &mut self,
        row: usize,
        from: usize,
        to: usize,
        listener: &mut L,
    ) {
        if from >= to {
            return;
        }
        let base = self.rope.line_to_char(row);
        let range = base + from..base + to;
        let text = self.rope.slice(range.clone()).to_string();
        self.rope.remove(range);
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::RemoveText,
                start: Position::new(row, from),
                end: Position::new(row, to),
                text,
            },
        );
    }

    fn remove_full_lines<L: ChangeListener + ?Sized>(
        &mut self,
        first: usize,
        last: usize,
        listener: &mut L,
    ) {
        let range = self.rope.line_to_char(first)..self.rope.line_to_char(last + 1);
        let text = self.rope.slice(range.clone()).to_string();
        self.rope.remove(range);
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::RemoveLines,
                start: Position::new(first, 0),
                end: Position::new(last + 1, 0),
                text,
            },
        );
    }

    fn remove_new_line<L: ChangeListener + ?Sized>(&mut self, row: usize, listener: &mut L) {
        let len = self.line_len(row);
        let index = self.rope.line_to_char(row) + len;
        self.rope.remove(index..index + 1);
        self.emit(
            listener,
            LineDelta {
                action: DeltaAction::RemoveText,
                start: Position::new(row, len),
                end: Position::new(row + 1, 0),
                text: "\n".to_string(),
            },
        );
    }
}

impl LineSource for Document {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, row: usize) -> Cow<'_, str> {
        assert!(
            row < self.rope.len_lines(),
            "row {row} out of range ({} rows)",
            self.rope.len_lines()
        );
        let line = self.rope.line(row).slice(..self.line_len(row));
        match line.as_str() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(line.to_string()),
        }
    }
}
