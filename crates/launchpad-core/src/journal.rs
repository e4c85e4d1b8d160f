//! # Journal
//!
//! Undo log for one operation. Every state write records how to reverse
//! itself; a failed operation replays the log newest-first, which restores
//! the state exactly as it was before the operation started.

use crate::state::LaunchpadState;

/// Reverses a single state write
pub type Undo = Box<dyn FnOnce(&mut LaunchpadState) + Send>;

#[derive(Default)]
pub struct Journal {
    entries: Vec<Undo>,
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal").field("entries", &self.entries.len()).finish()
    }
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, undo: impl FnOnce(&mut LaunchpadState) + Send + 'static) {
        self.entries.push(Box::new(undo));
    }

    /// Keep every write made so far
    pub fn commit(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Reverse every write made so far, newest first
    pub fn rollback(&mut self, state: &mut LaunchpadState) -> usize {
        let count = self.entries.len();
        while let Some(undo) = self.entries.pop() {
            undo(state);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
