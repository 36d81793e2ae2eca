//! Search state management for the editor session.

use yukifiles_text_search::SearchOptions;

/// Find/replace state for one session.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    /// Active search query (empty when no search is running).
    pub query: String,
    /// Replacement text.
    pub replacement: String,
    /// Search flags.
    pub options: SearchOptions,
    /// Char offset of the currently selected match.
    pub current_match: Option<usize>,
    /// Last search query (preserved when search is closed).
    pub last_query: Option<String>,
    /// Last replace with text (preserved when search is closed).
    pub last_replacement: Option<String>,
}

impl SearchController {
    /// Create new empty SearchController with the given flags.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Check if search is active.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Set query. The current match is forgotten when it changes.
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.current_match = None;
        }
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement = replacement.to_string();
    }

    /// Set flags. The current match is forgotten when they change.
    pub fn set_options(&mut self, options: SearchOptions) {
        if self.options != options {
            self.options = options;
            self.current_match = None;
        }
    }

    /// Save current queries as last queries.
    pub fn save_last_queries(&mut self) {
        if !self.query.is_empty() {
            self.last_query = Some(self.query.clone());
        }
        if !self.replacement.is_empty() {
            self.last_replacement = Some(self.replacement.clone());
        }
    }

    /// Bring back the last queries when reopening with an empty search.
    pub fn restore_last_queries(&mut self) {
        if self.is_active() {
            return;
        }
        if let Some(query) = self.last_query.clone() {
            self.set_query(&query);
        }
        if let Some(replacement) = self.last_replacement.clone() {
            self.replacement = replacement;
        }
    }

    /// Clear active search state.
    pub fn clear(&mut self) {
        self.save_last_queries();
        self.query.clear();
        self.replacement.clear();
        self.current_match = None;
    }
}
