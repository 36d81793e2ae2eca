//! Editor session: one buffer, one search, one file name.
//!
//! Every user action goes through [`EditorSession::dispatch`], which applies
//! it and reports what changed. A failed search or navigation returns an
//! error and leaves the session as it was.

use yukifiles_buffer::{CursorPosition, DocumentStats, FindReplace, Selection, TextBuffer};
use yukifiles_config::Config;
use yukifiles_logger as logger;
use yukifiles_text_search::SearchOptions;

use crate::{validate_file_name, EditorError, FileKind, NameIssue, SaveTarget, SearchController};

/// User action applied to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Type text at the cursor, replacing the selection
    Insert(String),
    Backspace,
    Select { start: usize, end: usize },
    SelectAll,
    /// Replace the whole content (paste over everything)
    SetContent(String),
    /// Open the search bar, restoring the last queries when it is empty
    OpenSearch,
    /// Close the search bar, remembering the queries for next time
    CloseSearch,
    SetQuery(String),
    SetReplacement(String),
    SetOptions(SearchOptions),
    FindNext,
    FindPrevious,
    /// Replace the current match and move to the next one
    ReplaceCurrent,
    ReplaceAll,
    /// 1-based line number
    GoToLine(usize),
    Undo,
    Redo,
    Rename(String),
    Save,
}

/// Outcome of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Content changed
    Edited,
    /// Nothing to do (empty undo stack, backspace at start...)
    Unchanged,
    SelectionChanged(Selection),
    /// Query or flags changed; `matches` is the new total
    SearchUpdated { matches: usize },
    SearchClosed,
    /// A match was selected; `label` reads like `3/12`
    MatchFound { offset: usize, label: String },
    Replaced { count: usize },
    MovedTo {
        offset: usize,
        position: CursorPosition,
    },
    /// File renamed; `issues` is empty when the name can be saved
    Renamed {
        kind: FileKind,
        issues: Vec<NameIssue>,
    },
    Saved,
}

pub struct EditorSession {
    buffer: TextBuffer,
    search: SearchController,
    file_name: String,
    kind: FileKind,
    require_extension: bool,
    save_target: Box<dyn SaveTarget>,
}

impl EditorSession {
    /// Open `content` for editing under `file_name`.
    pub fn open(
        file_name: &str,
        content: &str,
        config: &Config,
        save_target: Box<dyn SaveTarget>,
    ) -> Self {
        let kind = FileKind::detect(file_name);
        logger::info(format!("Opened {} ({} file)", file_name, kind));

        Self {
            buffer: TextBuffer::with_history_capacity(content, config.editor.history_size),
            search: SearchController::new(config.search.clone()),
            file_name: file_name.to_string(),
            kind,
            require_extension: config.editor.require_extension,
            save_target,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn cursor_position(&self) -> CursorPosition {
        self.buffer.cursor_position()
    }

    pub fn stats(&self) -> DocumentStats {
        self.buffer.stats()
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Problems with the current file name
    pub fn name_issues(&self) -> Vec<NameIssue> {
        validate_file_name(&self.file_name, self.require_extension)
    }

    /// Position of the current match among all matches, as `i/n`.
    ///
    /// `i` is 0 when no match is selected; `0/0` when nothing matches.
    pub fn match_label(&self) -> String {
        let matches = self
            .buffer
            .find_all(&self.search.query, &self.search.options)
            .unwrap_or_default();

        let index = self
            .search
            .current_match
            .and_then(|current| matches.iter().position(|m| m.start == current))
            .map_or(0, |i| i + 1);
        format!("{}/{}", index, matches.len())
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: EditorAction) -> Result<EditorEvent, EditorError> {
        logger::debug(format!("Editor action: {:?}", action));

        match action {
            EditorAction::Insert(text) => {
                if text.is_empty() {
                    return Ok(EditorEvent::Unchanged);
                }
                self.buffer.type_text(&text);
                Ok(self.edited())
            }
            EditorAction::Backspace => {
                let before = (self.buffer.len_chars(), self.buffer.selection());
                self.buffer.backspace();
                if (self.buffer.len_chars(), self.buffer.selection()) == before {
                    Ok(EditorEvent::Unchanged)
                } else {
                    Ok(self.edited())
                }
            }
            EditorAction::Select { start, end } => {
                self.buffer.set_selection(start, end);
                Ok(EditorEvent::SelectionChanged(self.buffer.selection()))
            }
            EditorAction::SelectAll => {
                self.buffer.select_all();
                Ok(EditorEvent::SelectionChanged(self.buffer.selection()))
            }
            EditorAction::SetContent(text) => {
                if text == self.buffer.text() {
                    return Ok(EditorEvent::Unchanged);
                }
                self.buffer.set_text(&text);
                Ok(self.edited())
            }
            EditorAction::OpenSearch => {
                let mut search = self.search.clone();
                search.restore_last_queries();
                let matches = self.buffer.count_matches(&search.query, &search.options)?;
                self.search = search;
                Ok(EditorEvent::SearchUpdated { matches })
            }
            EditorAction::CloseSearch => {
                self.search.clear();
                Ok(EditorEvent::SearchClosed)
            }
            EditorAction::SetQuery(query) => {
                let matches = self.buffer.count_matches(&query, &self.search.options)?;
                self.search.set_query(&query);
                Ok(EditorEvent::SearchUpdated { matches })
            }
            EditorAction::SetReplacement(replacement) => {
                self.search.set_replacement(&replacement);
                Ok(EditorEvent::Unchanged)
            }
            EditorAction::SetOptions(options) => {
                let matches = self.buffer.count_matches(&self.search.query, &options)?;
                self.search.set_options(options);
                Ok(EditorEvent::SearchUpdated { matches })
            }
            EditorAction::FindNext => {
                let offset = self.find_next()?;
                Ok(self.match_found(offset))
            }
            EditorAction::FindPrevious => {
                let from = self
                    .search
                    .current_match
                    .unwrap_or(self.buffer.selection().start);
                let offset =
                    self.buffer
                        .find_previous(&self.search.query, from, &self.search.options)?;
                Ok(self.match_found(offset))
            }
            EditorAction::ReplaceCurrent => self.replace_current(),
            EditorAction::ReplaceAll => {
                let count = self.buffer.replace_all(
                    &self.search.query,
                    &self.search.replacement,
                    &self.search.options,
                )?;
                self.search.current_match = None;
                self.search.save_last_queries();
                logger::info(format!(
                    "Replaced {} occurrence(s) in {}",
                    count, self.file_name
                ));
                Ok(EditorEvent::Replaced { count })
            }
            EditorAction::GoToLine(line) => {
                let offset = self.buffer.go_to_line(line)?;
                Ok(EditorEvent::MovedTo {
                    offset,
                    position: self.buffer.cursor_position(),
                })
            }
            EditorAction::Undo => {
                if self.buffer.undo() {
                    Ok(self.edited())
                } else {
                    Ok(EditorEvent::Unchanged)
                }
            }
            EditorAction::Redo => {
                if self.buffer.redo() {
                    Ok(self.edited())
                } else {
                    Ok(EditorEvent::Unchanged)
                }
            }
            EditorAction::Rename(name) => {
                self.file_name = name;
                self.kind = FileKind::detect(&self.file_name);
                Ok(EditorEvent::Renamed {
                    kind: self.kind,
                    issues: self.name_issues(),
                })
            }
            EditorAction::Save => self.save(),
        }
    }

    fn edited(&mut self) -> EditorEvent {
        self.search.current_match = None;
        EditorEvent::Edited
    }

    fn match_found(&mut self, offset: usize) -> EditorEvent {
        self.search.current_match = Some(offset);
        EditorEvent::MatchFound {
            offset,
            label: self.match_label(),
        }
    }

    /// First search starts at the cursor; later ones after the current match.
    fn find_next(&mut self) -> Result<usize, EditorError> {
        let query = &self.search.query;
        let options = &self.search.options;
        let offset = match self.search.current_match {
            Some(current) => self.buffer.find_next(query, current, options)?,
            None => {
                let start = self.buffer.selection().start;
                self.buffer.find_forward(query, start, options)?
            }
        };
        Ok(offset)
    }

    fn replace_current(&mut self) -> Result<EditorEvent, EditorError> {
        let offset = match self.search.current_match {
            Some(offset) => offset,
            None => self.find_next()?,
        };
        self.buffer.replace_at(
            offset,
            &self.search.query,
            &self.search.replacement,
            &self.search.options,
        )?;
        self.search.save_last_queries();

        let cursor = self.buffer.selection().start;
        self.search.current_match = self
            .buffer
            .find_forward(&self.search.query, cursor, &self.search.options)
            .ok();
        Ok(EditorEvent::Replaced { count: 1 })
    }

    fn save(&mut self) -> Result<EditorEvent, EditorError> {
        let issues = self.name_issues();
        if !issues.is_empty() {
            logger::warn(format!("Refusing to save '{}': invalid name", self.file_name));
            return Err(EditorError::InvalidName(issues));
        }

        self.save_target
            .save(&self.file_name, &self.buffer.text(), self.kind)?;
        self.buffer.mark_saved();
        logger::info(format!("Saved {}", self.file_name));
        Ok(EditorEvent::Saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use yukifiles_buffer::BufferError;

    type Saved = Rc<RefCell<Vec<(String, String, FileKind)>>>;

    fn open(name: &str, content: &str) -> (EditorSession, Saved) {
        let saved: Saved = Rc::default();
        let sink = Rc::clone(&saved);
        let target = move |name: &str, content: &str, kind: FileKind| -> anyhow::Result<()> {
            sink.borrow_mut()
                .push((name.to_string(), content.to_string(), kind));
            Ok(())
        };
        let session = EditorSession::open(name, content, &Config::default(), Box::new(target));
        (session, saved)
    }

    fn query(session: &mut EditorSession, q: &str) -> EditorEvent {
        session
            .dispatch(EditorAction::SetQuery(q.to_string()))
            .unwrap()
    }

    #[test]
    fn test_open_detects_kind() {
        let (session, _) = open("main.rs", "fn main() {}");
        assert_eq!(session.kind(), FileKind::Code);
        assert_eq!(session.file_name(), "main.rs");
        assert!(!session.is_modified());
        assert_eq!(session.match_label(), "0/0");
    }

    #[test]
    fn test_set_query_reports_count() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        assert_eq!(query(&mut session, "foo"), EditorEvent::SearchUpdated { matches: 2 });
        assert_eq!(query(&mut session, ""), EditorEvent::SearchUpdated { matches: 0 });
        assert_eq!(session.match_label(), "0/0");
    }

    #[test]
    fn test_find_next_walks_matches_with_label() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        query(&mut session, "foo");

        assert_eq!(
            session.dispatch(EditorAction::FindNext).unwrap(),
            EditorEvent::MatchFound {
                offset: 0,
                label: "1/2".to_string()
            }
        );
        assert_eq!(
            session.dispatch(EditorAction::FindNext).unwrap(),
            EditorEvent::MatchFound {
                offset: 8,
                label: "2/2".to_string()
            }
        );
        // Wraps
        assert_eq!(
            session.dispatch(EditorAction::FindNext).unwrap(),
            EditorEvent::MatchFound {
                offset: 0,
                label: "1/2".to_string()
            }
        );
        assert_eq!(session.buffer().selection(), Selection::new(0, 3));
    }

    #[test]
    fn test_find_previous_wraps_to_last() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        query(&mut session, "foo");

        assert_eq!(
            session.dispatch(EditorAction::FindPrevious).unwrap(),
            EditorEvent::MatchFound {
                offset: 8,
                label: "2/2".to_string()
            }
        );
    }

    #[test]
    fn test_find_not_found_leaves_session() {
        let (mut session, _) = open("a.txt", "abc");
        session
            .dispatch(EditorAction::Select { start: 1, end: 2 })
            .unwrap();
        query(&mut session, "zzz");

        assert!(matches!(
            session.dispatch(EditorAction::FindNext),
            Err(EditorError::Buffer(BufferError::NotFound))
        ));
        assert_eq!(session.buffer().selection(), Selection::new(1, 2));
        assert_eq!(session.search().current_match, None);
    }

    #[test]
    fn test_invalid_regex_keeps_previous_query() {
        let (mut session, _) = open("a.txt", "abc");
        query(&mut session, "b");
        session
            .dispatch(EditorAction::SetOptions(SearchOptions {
                regex: true,
                ..Default::default()
            }))
            .unwrap();

        assert!(matches!(
            session.dispatch(EditorAction::SetQuery("(".to_string())),
            Err(EditorError::Buffer(BufferError::InvalidPattern(_)))
        ));
        assert_eq!(session.search().query, "b");
    }

    #[test]
    fn test_reopening_search_restores_last_queries() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        query(&mut session, "foo");
        session
            .dispatch(EditorAction::SetReplacement("qux".to_string()))
            .unwrap();
        session.dispatch(EditorAction::FindNext).unwrap();

        assert_eq!(
            session.dispatch(EditorAction::CloseSearch).unwrap(),
            EditorEvent::SearchClosed
        );
        assert!(!session.search().is_active());
        assert_eq!(session.search().current_match, None);
        assert_eq!(session.match_label(), "0/0");

        assert_eq!(
            session.dispatch(EditorAction::OpenSearch).unwrap(),
            EditorEvent::SearchUpdated { matches: 2 }
        );
        assert_eq!(session.search().query, "foo");
        assert_eq!(session.search().replacement, "qux");

        session.dispatch(EditorAction::ReplaceAll).unwrap();
        assert_eq!(session.buffer().text(), "qux bar qux baz");
    }

    #[test]
    fn test_open_search_without_history_is_empty() {
        let (mut session, _) = open("a.txt", "foo");
        assert_eq!(
            session.dispatch(EditorAction::OpenSearch).unwrap(),
            EditorEvent::SearchUpdated { matches: 0 }
        );
        assert!(!session.search().is_active());
    }

    #[test]
    fn test_replace_current_advances() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        query(&mut session, "foo");
        session
            .dispatch(EditorAction::SetReplacement("qux".to_string()))
            .unwrap();
        session.dispatch(EditorAction::FindNext).unwrap();

        assert_eq!(
            session.dispatch(EditorAction::ReplaceCurrent).unwrap(),
            EditorEvent::Replaced { count: 1 }
        );
        assert_eq!(session.buffer().text(), "qux bar foo baz");
        assert_eq!(session.search().current_match, Some(8));
        assert_eq!(session.match_label(), "1/1");

        session.dispatch(EditorAction::ReplaceCurrent).unwrap();
        assert_eq!(session.buffer().text(), "qux bar qux baz");
        assert_eq!(session.search().current_match, None);
        assert!(session.is_modified());
    }

    #[test]
    fn test_replace_all_and_undo() {
        let (mut session, _) = open("a.txt", "foo bar foo baz");
        query(&mut session, "foo");
        session
            .dispatch(EditorAction::SetReplacement("qux".to_string()))
            .unwrap();

        assert_eq!(
            session.dispatch(EditorAction::ReplaceAll).unwrap(),
            EditorEvent::Replaced { count: 2 }
        );
        assert_eq!(session.buffer().text(), "qux bar qux baz");

        assert_eq!(session.dispatch(EditorAction::Undo).unwrap(), EditorEvent::Edited);
        assert_eq!(session.buffer().text(), "foo bar foo baz");
        assert_eq!(session.dispatch(EditorAction::Redo).unwrap(), EditorEvent::Edited);
        assert_eq!(session.buffer().text(), "qux bar qux baz");
        assert_eq!(session.dispatch(EditorAction::Redo).unwrap(), EditorEvent::Unchanged);
    }

    #[test]
    fn test_typing_resets_current_match() {
        let (mut session, _) = open("a.txt", "foo");
        query(&mut session, "foo");
        session.dispatch(EditorAction::FindNext).unwrap();

        session
            .dispatch(EditorAction::Select { start: 3, end: 3 })
            .unwrap();
        assert_eq!(
            session
                .dispatch(EditorAction::Insert(" foo".to_string()))
                .unwrap(),
            EditorEvent::Edited
        );
        assert_eq!(session.search().current_match, None);
        assert_eq!(session.buffer().text(), "foo foo");
        assert_eq!(session.match_label(), "0/2");
    }

    #[test]
    fn test_backspace_at_start_is_unchanged() {
        let (mut session, _) = open("a.txt", "ab");
        assert_eq!(session.dispatch(EditorAction::Backspace).unwrap(), EditorEvent::Unchanged);

        session.dispatch(EditorAction::SelectAll).unwrap();
        assert_eq!(session.dispatch(EditorAction::Backspace).unwrap(), EditorEvent::Edited);
        assert!(session.buffer().is_empty());
    }

    #[test]
    fn test_go_to_line() {
        let (mut session, _) = open("a.txt", "line1\nline2\nline3");
        assert_eq!(
            session.dispatch(EditorAction::GoToLine(3)).unwrap(),
            EditorEvent::MovedTo {
                offset: 12,
                position: CursorPosition { line: 3, column: 1 }
            }
        );
        assert!(matches!(
            session.dispatch(EditorAction::GoToLine(4)),
            Err(EditorError::Buffer(BufferError::OutOfRange { line: 4, total: 3 }))
        ));
        assert_eq!(session.cursor_position(), CursorPosition { line: 3, column: 1 });
    }

    #[test]
    fn test_set_content_is_one_undo_step() {
        let (mut session, _) = open("a.txt", "old");
        assert_eq!(
            session
                .dispatch(EditorAction::SetContent("old".to_string()))
                .unwrap(),
            EditorEvent::Unchanged
        );
        session
            .dispatch(EditorAction::SetContent("new text".to_string()))
            .unwrap();
        assert_eq!(session.stats().words, 2);

        session.dispatch(EditorAction::Undo).unwrap();
        assert_eq!(session.buffer().text(), "old");
    }

    #[test]
    fn test_save_hands_off_content() {
        let (mut session, saved) = open("notes.md", "hello");
        session.dispatch(EditorAction::Insert("> ".to_string())).unwrap();

        assert_eq!(session.dispatch(EditorAction::Save).unwrap(), EditorEvent::Saved);
        assert!(!session.is_modified());
        assert_eq!(
            saved.borrow().as_slice(),
            &[("notes.md".to_string(), "> hello".to_string(), FileKind::Text)]
        );
    }

    #[test]
    fn test_save_refused_for_invalid_name() {
        let (mut session, saved) = open("notes.md", "hello");

        assert_eq!(
            session
                .dispatch(EditorAction::Rename("bad/name".to_string()))
                .unwrap(),
            EditorEvent::Renamed {
                kind: FileKind::Text,
                issues: vec![NameIssue::InvalidCharacters, NameIssue::MissingExtension],
            }
        );
        assert!(matches!(
            session.dispatch(EditorAction::Save),
            Err(EditorError::InvalidName(_))
        ));
        assert!(saved.borrow().is_empty());

        let event = session
            .dispatch(EditorAction::Rename("track.flac".to_string()))
            .unwrap();
        assert_eq!(
            event,
            EditorEvent::Renamed {
                kind: FileKind::Audio,
                issues: vec![]
            }
        );
        session.dispatch(EditorAction::Save).unwrap();
        assert_eq!(saved.borrow()[0].2, FileKind::Audio);
    }

    #[test]
    fn test_save_error_keeps_modified() {
        let target = |_: &str, _: &str, _: FileKind| -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        };
        let mut session =
            EditorSession::open("a.txt", "x", &Config::default(), Box::new(target));
        session.dispatch(EditorAction::Insert("y".to_string())).unwrap();

        let err = session.dispatch(EditorAction::Save).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(session.is_modified());
    }
}
