//! Editor session for yukifiles.
//!
//! Wraps one [`TextBuffer`](yukifiles_buffer::TextBuffer) with the state every
//! editor view needs: the active search, the current match, the file name and
//! kind, and the collaborator that receives the content on save.

mod error;
mod file_kind;
mod save;
mod search_controller;
mod session;

pub use error::EditorError;
pub use file_kind::{validate_file_name, FileKind, NameIssue};
pub use save::{DirectorySaveTarget, SaveTarget};
pub use search_controller::SearchController;
pub use session::{EditorAction, EditorEvent, EditorSession};
