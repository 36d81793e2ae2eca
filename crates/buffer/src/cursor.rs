use std::cmp::{max, min};
use std::ops::Range;

/// Selected range in char offsets (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, ordering the endpoints
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: min(a, b),
            end: max(a, b),
        }
    }

    /// Collapsed selection (plain cursor)
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamp both endpoints to `max_offset`
    pub fn clamp(self, max_offset: usize) -> Self {
        Self {
            start: min(self.start, max_offset),
            end: min(self.end, max_offset),
        }
    }
}

/// Cursor position for the status bar (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_orders_endpoints() {
        let sel = Selection::new(7, 3);
        assert_eq!(sel, Selection { start: 3, end: 7 });
        assert_eq!(sel.len(), 4);
        assert!(!sel.is_empty());
        assert!(Selection::caret(5).is_empty());
    }

    #[test]
    fn test_selection_clamp() {
        let sel = Selection::new(2, 10).clamp(6);
        assert_eq!(sel, Selection { start: 2, end: 6 });
    }

    #[test]
    fn test_cursor_position_display() {
        let pos = CursorPosition { line: 3, column: 14 };
        assert_eq!(pos.to_string(), "Ln 3, Col 14");
    }
}
