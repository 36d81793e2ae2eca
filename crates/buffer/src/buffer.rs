use ropey::Rope;
use std::ops::Range;

use crate::{Action, BufferError, CursorPosition, DocumentStats, History, Selection};

/// Text buffer with a selection and undo/redo history.
///
/// Offsets are char offsets. The selection always satisfies
/// `start <= end <= len_chars()`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Rope structure for storing text
    rope: Rope,
    /// Current selection (collapsed when it is just a cursor)
    selection: Selection,
    /// Modified since last save
    modified: bool,
    /// Edit history for undo/redo
    history: History,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create buffer holding `text`, cursor at the start
    pub fn from_text(text: &str) -> Self {
        Self::with_history_capacity(text, History::DEFAULT_CAPACITY)
    }

    /// Create buffer with a bounded undo history
    pub fn with_history_capacity(text: &str, capacity: usize) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
            modified: false,
            history: History::with_capacity(capacity),
        }
    }

    /// Full buffer content
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in chars
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines (split on `\n`)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char offset where 1-based `line_number` starts
    pub fn line_start(&self, line_number: usize) -> Result<usize, BufferError> {
        let total = self.line_count();
        if line_number == 0 || line_number > total {
            return Err(BufferError::OutOfRange {
                line: line_number,
                total,
            });
        }
        Ok(self.rope.line_to_char(line_number - 1))
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select `start..end` (endpoints are ordered and clamped)
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Selection::new(start, end).clamp(self.len_chars());
    }

    /// Collapse the selection to a cursor at `offset`
    pub fn move_cursor(&mut self, offset: usize) {
        self.selection = Selection::caret(offset.min(self.len_chars()));
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.len_chars());
    }

    /// Selected text
    pub fn selected_text(&self) -> String {
        self.rope.slice(self.selection.range()).to_string()
    }

    /// 1-based line and column of the selection start
    pub fn cursor_position(&self) -> CursorPosition {
        let offset = self.selection.start;
        let line_idx = self.rope.char_to_line(offset);
        CursorPosition {
            line: line_idx + 1,
            column: offset - self.rope.line_to_char(line_idx) + 1,
        }
    }

    /// Line, word and char counts
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::of(&self.text())
    }

    /// Check if buffer changed since the last save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark the content as handed to the save collaborator
    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.history.commit_pending();
    }

    /// Insert text at `offset`; the cursor ends up after it
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.len_chars());
        self.rope.insert(offset, text);
        self.history.push(Action::Insert {
            offset,
            text: text.to_string(),
        });
        self.modified = true;
        self.move_cursor(offset + text.chars().count());
    }

    /// Delete a char range; the cursor ends up at its start
    pub fn delete(&mut self, range: Range<usize>) {
        let len = self.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return;
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.history.push(Action::Delete {
            offset: start,
            text: removed,
        });
        self.modified = true;
        self.move_cursor(start);
    }

    /// Type text at the cursor, replacing the selection if any
    pub fn type_text(&mut self, text: &str) {
        let selection = self.selection;
        if selection.is_empty() {
            self.insert(selection.start, text);
        } else {
            let end = self.splice(selection.start, selection.end, text);
            self.move_cursor(end);
        }
    }

    /// Delete the selection, or the char before the cursor
    pub fn backspace(&mut self) {
        let selection = self.selection;
        if !selection.is_empty() {
            self.delete(selection.range());
        } else if selection.start > 0 {
            self.delete(selection.start - 1..selection.start);
        }
    }

    /// Replace the whole content as one undo step
    pub fn set_text(&mut self, text: &str) {
        let len = self.len_chars();
        self.splice(0, len, text);
    }

    /// Undo last edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(action) => {
                let cursor = self.apply(&action);
                self.modified = true;
                self.move_cursor(cursor);
                true
            }
            None => false,
        }
    }

    /// Redo undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(action) => {
                let cursor = self.apply(&action);
                self.modified = true;
                self.move_cursor(cursor);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Char offset of a byte offset into `text()`
    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        self.rope.byte_to_char(byte_offset.min(self.rope.len_bytes()))
    }

    /// Byte offset into `text()` of a char offset
    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        self.rope.char_to_byte(char_offset.min(self.len_chars()))
    }

    /// Replace `start..end` with `text` as a single undo step.
    ///
    /// Returns the char offset right after the inserted text. The selection is
    /// left to the caller.
    pub(crate) fn splice(&mut self, start: usize, end: usize, text: &str) -> usize {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);

        let mut actions = Vec::with_capacity(2);
        if start < end {
            let removed = self.rope.slice(start..end).to_string();
            self.rope.remove(start..end);
            actions.push(Action::Delete {
                offset: start,
                text: removed,
            });
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
            actions.push(Action::Insert {
                offset: start,
                text: text.to_string(),
            });
        }

        if !actions.is_empty() {
            self.history.push(Action::Group { actions });
            self.modified = true;
        }
        // Keep the selection valid for the shrunken or grown rope
        self.selection = self.selection.clamp(self.len_chars());
        start + text.chars().count()
    }

    /// Apply a history action, returning where the cursor should land
    fn apply(&mut self, action: &Action) -> usize {
        match action {
            Action::Insert { offset, text } => {
                self.rope.insert(*offset, text);
                offset + text.chars().count()
            }
            Action::Delete { offset, text } => {
                let end = offset + text.chars().count();
                self.rope.remove(*offset..end);
                *offset
            }
            Action::Group { actions } => {
                let mut cursor = self.selection.start;
                for action in actions {
                    cursor = self.apply(action);
                }
                cursor
            }
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
