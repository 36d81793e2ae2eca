/// Action for undo/redo. Offsets are char offsets into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Text insertion
    Insert { offset: usize, text: String },
    /// Text deletion
    Delete { offset: usize, text: String },
    /// Actions applied in order as one undo step
    Group { actions: Vec<Action> },
}

impl Action {
    /// Get inverse action
    pub fn inverse(&self) -> Action {
        match self {
            Action::Insert { offset, text } => Action::Delete {
                offset: *offset,
                text: text.clone(),
            },
            Action::Delete { offset, text } => Action::Insert {
                offset: *offset,
                text: text.clone(),
            },
            Action::Group { actions } => Action::Group {
                actions: actions.iter().rev().map(|a| a.inverse()).collect(),
            },
        }
    }

    /// Check if can merge with another action
    pub fn can_merge_with(&self, other: &Action) -> bool {
        match (self, other) {
            // Typing: single characters appended right after the previous insertion
            (
                Action::Insert {
                    offset: pos1,
                    text: text1,
                },
                Action::Insert {
                    offset: pos2,
                    text: text2,
                },
            ) => {
                is_single_char(text2)
                    && !text2.contains('\n')
                    && !text1.contains('\n')
                    && *pos2 == pos1 + text1.chars().count()
            }
            // Backspace: single characters removed right before the previous deletion
            (
                Action::Delete {
                    offset: pos1,
                    text: text1,
                },
                Action::Delete {
                    offset: pos2,
                    text: text2,
                },
            ) => {
                is_single_char(text2)
                    && !text2.contains('\n')
                    && !text1.contains('\n')
                    && pos2 + 1 == *pos1
            }
            _ => false,
        }
    }

    /// Merge with another action
    pub fn merge(&mut self, other: Action) {
        match (self, other) {
            (Action::Insert { text: text1, .. }, Action::Insert { text: text2, .. }) => {
                text1.push_str(&text2);
            }
            (
                Action::Delete {
                    offset,
                    text: text1,
                },
                Action::Delete {
                    offset: pos2,
                    text: text2,
                },
            ) => {
                *offset = pos2;
                text1.insert_str(0, &text2);
            }
            _ => {}
        }
    }
}

fn is_single_char(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Edit history for undo/redo
#[derive(Debug, Clone)]
pub struct History {
    /// Action stack for undo
    undo_stack: Vec<Action>,
    /// Action stack for redo
    redo_stack: Vec<Action>,
    /// Maximum history size
    max_size: usize,
    /// Current accumulated action
    pending_action: Option<Action>,
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Create a new history
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create history with specified size
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            pending_action: None,
        }
    }

    /// Record action to history
    pub fn push(&mut self, action: Action) {
        self.redo_stack.clear();

        if let Some(pending) = &mut self.pending_action {
            if pending.can_merge_with(&action) {
                pending.merge(action);
                return;
            }
        }

        self.commit_pending();
        self.pending_action = Some(action);
    }

    /// Close the current merge group
    pub fn commit_pending(&mut self) {
        if let Some(action) = self.pending_action.take() {
            self.undo_stack.push(action);
            if self.undo_stack.len() > self.max_size {
                let overflow = self.undo_stack.len() - self.max_size;
                self.undo_stack.drain(..overflow);
            }
        }
    }

    /// Undo last action, returning the action that reverts it
    pub fn undo(&mut self) -> Option<Action> {
        self.commit_pending();

        let action = self.undo_stack.pop()?;
        let inverse = action.inverse();
        self.redo_stack.push(action);
        Some(inverse)
    }

    /// Redo undone action, returning the action to re-apply
    pub fn redo(&mut self) -> Option<Action> {
        self.commit_pending();

        let action = self.redo_stack.pop()?;
        self.undo_stack.push(action.clone());
        Some(action)
    }

    /// Check if undo is possible
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending_action.is_some()
    }

    /// Check if redo is possible
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps currently held
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len() + usize::from(self.pending_action.is_some())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
