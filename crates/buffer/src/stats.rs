use unicode_segmentation::UnicodeSegmentation;

/// Document statistics shown in the editor status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    /// Number of `\n`-separated lines (an empty document has one line)
    pub lines: usize,
    /// Number of Unicode words
    pub words: usize,
    /// Number of chars
    pub chars: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.split('\n').count(),
            words: text.unicode_words().count(),
            chars: text.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = DocumentStats::of("Hello, world!\nsecond line\n");
        assert_eq!(
            stats,
            DocumentStats {
                lines: 3,
                words: 4,
                chars: 26,
            }
        );
    }

    #[test]
    fn test_empty_document_has_one_line() {
        assert_eq!(
            DocumentStats::of(""),
            DocumentStats {
                lines: 1,
                words: 0,
                chars: 0,
            }
        );
    }
}
