use thiserror::Error;
use yukifiles_text_search::SearchError;

/// Recoverable buffer operation failure. The buffer is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Query absent from the buffer (or not at the requested offset).
    #[error("no match found")]
    NotFound,
    /// Line number outside `1..=total`.
    #[error("line {line} is out of range (1..={total})")]
    OutOfRange { line: usize, total: usize },
    /// Malformed regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
}

impl From<SearchError> for BufferError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NotFound => BufferError::NotFound,
            SearchError::InvalidPattern(msg) => BufferError::InvalidPattern(msg),
        }
    }
}
