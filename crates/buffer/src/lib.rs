//! Editable text buffer for yukifiles.
//!
//! Stores the document in a rope, tracks a selection in char offsets,
//! records undo/redo history and exposes find/replace through [`FindReplace`].

mod buffer;
mod cursor;
mod error;
mod find_replace;
mod history;
mod stats;

pub use buffer::TextBuffer;
pub use cursor::{CursorPosition, Selection};
pub use error::BufferError;
pub use find_replace::FindReplace;
pub use history::{Action, History};
pub use stats::DocumentStats;
pub use yukifiles_text_search::SearchOptions;
