//! Text search and replace for yukifiles.
//!
//! Locates literal or regex queries in plain text. All offsets are byte
//! offsets into the searched `&str` and always fall on char boundaries.
//! Matching is case-insensitive unless [`SearchOptions::case_sensitive`] is set.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query does not occur in the text.
    #[error("no match found")]
    NotFound,
    /// The query is not a valid regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
}

/// A match location in text (byte range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Match {
    /// Match length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Byte range of the match.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Search options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Case-sensitive search.
    pub case_sensitive: bool,
    /// Use regex pattern.
    pub regex: bool,
    /// Whole word only.
    pub whole_word: bool,
}

/// A single replacement computed against a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Range of the replaced occurrence in the original text.
    pub range: Match,
    /// Text that takes its place (capture groups already expanded).
    pub text: String,
}

/// Compiled query.
///
/// Zero-length regex matches are never reported. With `whole_word` set, a
/// candidate is rejected when a word character sits directly before or after it.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    whole_word: bool,
    expand: bool,
}

impl Matcher {
    /// Compile a query. The caller is responsible for rejecting empty queries.
    pub fn new(query: &str, options: &SearchOptions) -> Result<Self, SearchError> {
        let pattern = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| SearchError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            regex,
            whole_word: options.whole_word,
            expand: options.regex,
        })
    }

    /// First accepted match starting at or after `start`.
    pub fn find_from(&self, text: &str, start: usize) -> Option<Match> {
        let mut pos = ceil_char_boundary(text, start);
        while pos <= text.len() {
            let m = self.regex.find_at(text, pos)?;
            if !m.is_empty() && self.accepts(text, m.start(), m.end()) {
                return Some(Match {
                    start: m.start(),
                    end: m.end(),
                });
            }
            pos = next_char_boundary(text, m.start());
        }
        None
    }

    /// Match starting exactly at `offset`, if any.
    pub fn match_at(&self, text: &str, offset: usize) -> Option<Match> {
        if !text.is_char_boundary(offset) {
            return None;
        }
        self.find_from(text, offset).filter(|m| m.start == offset)
    }

    /// Non-overlapping matches, left to right.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Match> + 'a {
        let mut pos = 0;
        std::iter::from_fn(move || {
            let m = self.find_from(text, pos)?;
            pos = m.end;
            Some(m)
        })
    }

    /// Every offset where an occurrence starts, overlapping ones included.
    pub fn occurrences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Match> + 'a {
        let mut pos = 0;
        std::iter::from_fn(move || {
            let m = self.find_from(text, pos)?;
            pos = next_char_boundary(text, m.start);
            Some(m)
        })
    }

    /// Text that replaces `m`. Regex queries expand `$1` / `${name}` references.
    pub fn expand(&self, text: &str, m: &Match, replacement: &str) -> String {
        if !self.expand {
            return replacement.to_string();
        }

        let mut out = String::new();
        match self.regex.captures_at(text, m.start) {
            Some(caps) => caps.expand(replacement, &mut out),
            None => out.push_str(replacement),
        }
        out
    }

    fn accepts(&self, text: &str, start: usize, end: usize) -> bool {
        if !self.whole_word {
            return true;
        }
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }
}

/// Word characters for whole-word matching.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Search in text and return all non-overlapping matches.
pub fn find_all(text: &str, query: &str, options: &SearchOptions) -> Result<Vec<Match>, SearchError> {
    if query.is_empty() {
        return Ok(vec![]);
    }
    let matcher = Matcher::new(query, options)?;
    Ok(matcher.find_iter(text).collect())
}

/// Count non-overlapping matches.
pub fn count_matches(text: &str, query: &str, options: &SearchOptions) -> Result<usize, SearchError> {
    if query.is_empty() {
        return Ok(0);
    }
    let matcher = Matcher::new(query, options)?;
    Ok(matcher.find_iter(text).count())
}

/// Find the first occurrence starting at or after `start`, wrapping to the start of the text.
pub fn find_forward(
    text: &str,
    query: &str,
    start: usize,
    options: &SearchOptions,
) -> Result<Match, SearchError> {
    if query.is_empty() {
        return Err(SearchError::NotFound);
    }
    let matcher = Matcher::new(query, options)?;

    matcher
        .find_from(text, start)
        .or_else(|| matcher.find_from(text, 0))
        .ok_or(SearchError::NotFound)
}

/// Find the first occurrence starting after `from`, wrapping to the start of the text.
pub fn find_next(
    text: &str,
    query: &str,
    from: usize,
    options: &SearchOptions,
) -> Result<Match, SearchError> {
    find_forward(text, query, from.saturating_add(1), options)
}

/// Find the last occurrence starting before `from`, wrapping to the end of the text.
pub fn find_previous(
    text: &str,
    query: &str,
    from: usize,
    options: &SearchOptions,
) -> Result<Match, SearchError> {
    if query.is_empty() {
        return Err(SearchError::NotFound);
    }
    let matcher = Matcher::new(query, options)?;

    let mut before = None;
    let mut last = None;
    for m in matcher.occurrences(text) {
        if m.start < from {
            before = Some(m);
        }
        last = Some(m);
    }

    before.or(last).ok_or(SearchError::NotFound)
}

/// Compute the replacement of the occurrence starting exactly at `offset`.
///
/// Fails with [`SearchError::NotFound`] when the query does not match there.
pub fn replace_at(
    text: &str,
    offset: usize,
    query: &str,
    replacement: &str,
    options: &SearchOptions,
) -> Result<Replacement, SearchError> {
    if query.is_empty() {
        return Err(SearchError::NotFound);
    }
    let matcher = Matcher::new(query, options)?;
    let range = matcher
        .match_at(text, offset)
        .ok_or(SearchError::NotFound)?;

    Ok(Replacement {
        range,
        text: matcher.expand(text, &range, replacement),
    })
}

/// Replace every non-overlapping match, left to right.
///
/// Returns the new text and the number of replacements.
pub fn replace_all(
    text: &str,
    query: &str,
    replacement: &str,
    options: &SearchOptions,
) -> Result<(String, usize), SearchError> {
    if query.is_empty() {
        return Ok((text.to_string(), 0));
    }
    let matcher = Matcher::new(query, options)?;

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for m in matcher.find_iter(text) {
        out.push_str(&text[last..m.start]);
        out.push_str(&matcher.expand(text, &m, replacement));
        last = m.end;
        count += 1;
    }
    out.push_str(&text[last..]);

    Ok((out, count))
}

fn ceil_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos;
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

// Past the end of `text` when `pos` is already at the end.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    match text[pos..].chars().next() {
        Some(c) => pos + c.len_utf8(),
        None => text.len() + 1,
    }
}
