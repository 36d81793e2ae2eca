use thiserror::Error;
use yukifiles_buffer::BufferError;

use crate::NameIssue;

/// Errors returned by [`EditorSession::dispatch`](crate::EditorSession::dispatch).
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("invalid file name: {}", join_issues(.0))]
    InvalidName(Vec<NameIssue>),

    #[error(transparent)]
    Save(#[from] anyhow::Error),
}

fn join_issues(issues: &[NameIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
