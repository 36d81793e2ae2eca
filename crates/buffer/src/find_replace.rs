//! Find / replace / go-to-line over a [`TextBuffer`].
//!
//! Every editor variant drives the buffer through this one trait instead of
//! scanning the string itself.

use yukifiles_text_search::{self as text_search, SearchOptions};

use crate::{BufferError, Selection, TextBuffer};

/// Find, replace and line navigation. Offsets are char offsets.
pub trait FindReplace {
    /// Select the first occurrence starting after `from`, wrapping to the start.
    fn find_next(
        &mut self,
        query: &str,
        from: usize,
        options: &SearchOptions,
    ) -> Result<usize, BufferError>;

    /// Select the last occurrence starting before `from`, wrapping to the end.
    fn find_previous(
        &mut self,
        query: &str,
        from: usize,
        options: &SearchOptions,
    ) -> Result<usize, BufferError>;

    /// Number of non-overlapping occurrences (0 for an empty query).
    fn count_matches(&self, query: &str, options: &SearchOptions) -> Result<usize, BufferError>;

    /// Replace the occurrence starting exactly at `offset`.
    fn replace_at(
        &mut self,
        offset: usize,
        query: &str,
        replacement: &str,
        options: &SearchOptions,
    ) -> Result<(), BufferError>;

    /// Replace every non-overlapping occurrence; returns how many were replaced.
    fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: &SearchOptions,
    ) -> Result<usize, BufferError>;

    /// Move the cursor to the start of 1-based `line_number`.
    fn go_to_line(&mut self, line_number: usize) -> Result<usize, BufferError>;
}

impl TextBuffer {
    /// Select the first occurrence starting at or after `start`, wrapping to the start.
    pub fn find_forward(
        &mut self,
        query: &str,
        start: usize,
        options: &SearchOptions,
    ) -> Result<usize, BufferError> {
        let text = self.text();
        let found = text_search::find_forward(&text, query, self.char_to_byte(start), options)?;

        let start = self.byte_to_char(found.start);
        self.set_selection(start, self.byte_to_char(found.end));
        Ok(start)
    }

    /// All non-overlapping occurrences as char ranges.
    pub fn find_all(&self, query: &str, options: &SearchOptions) -> Result<Vec<Selection>, BufferError> {
        let text = self.text();
        Ok(text_search::find_all(&text, query, options)?
            .into_iter()
            .map(|m| Selection::new(self.byte_to_char(m.start), self.byte_to_char(m.end)))
            .collect())
    }
}

impl FindReplace for TextBuffer {
    fn find_next(
        &mut self,
        query: &str,
        from: usize,
        options: &SearchOptions,
    ) -> Result<usize, BufferError> {
        let text = self.text();
        let found = text_search::find_next(&text, query, self.char_to_byte(from), options)?;

        let start = self.byte_to_char(found.start);
        self.set_selection(start, self.byte_to_char(found.end));
        Ok(start)
    }

    fn find_previous(
        &mut self,
        query: &str,
        from: usize,
        options: &SearchOptions,
    ) -> Result<usize, BufferError> {
        let text = self.text();
        let found = text_search::find_previous(&text, query, self.char_to_byte(from), options)?;

        let start = self.byte_to_char(found.start);
        self.set_selection(start, self.byte_to_char(found.end));
        Ok(start)
    }

    fn count_matches(&self, query: &str, options: &SearchOptions) -> Result<usize, BufferError> {
        Ok(text_search::count_matches(&self.text(), query, options)?)
    }

    fn replace_at(
        &mut self,
        offset: usize,
        query: &str,
        replacement: &str,
        options: &SearchOptions,
    ) -> Result<(), BufferError> {
        if offset > self.len_chars() {
            return Err(BufferError::NotFound);
        }
        let text = self.text();
        let found =
            text_search::replace_at(&text, self.char_to_byte(offset), query, replacement, options)?;

        let start = self.byte_to_char(found.range.start);
        let end = self.byte_to_char(found.range.end);
        let cursor = self.splice(start, end, &found.text);
        self.move_cursor(cursor);
        Ok(())
    }

    fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: &SearchOptions,
    ) -> Result<usize, BufferError> {
        let (replaced, count) =
            text_search::replace_all(&self.text(), query, replacement, options)?;

        if count > 0 {
            let selection = self.selection();
            let len = self.len_chars();
            self.splice(0, len, &replaced);
            self.set_selection(selection.start, selection.end);
        }
        Ok(count)
    }

    fn go_to_line(&mut self, line_number: usize) -> Result<usize, BufferError> {
        let offset = self.line_start(line_number)?;
        self.move_cursor(offset);
        Ok(offset)
    }
}
