// src/undo.rs
use std::fmt;

/// Identifies the one undo affordance currently on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(u64);

impl UndoToken {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UndoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value that remembers exactly one previous state.
///
/// `commit` snapshots before changing; `set` changes without a snapshot and
/// drops any pending one. `undo` restores at most once.
#[derive(Debug, Clone, Default)]
pub struct Undoable<T> {
    current: T,
    previous: Option<T>,
}

impl<T: Clone> Undoable<T> {
    pub const fn new(value: T) -> Self {
        Self {
            current: value,
            previous: None,
        }
    }

    pub const fn get(&self) -> &T {
        &self.current
    }

    /// Snapshots the current value, then applies `change`.
    pub fn commit<R>(&mut self, change: impl FnOnce(&mut T) -> R) -> R {
        self.previous = Some(self.current.clone());
        change(&mut self.current)
    }

    /// Replaces the value, keeping the old one for undo.
    pub fn replace(&mut self, value: T) {
        self.commit(|current| *current = value);
    }

    /// Changes the value with no way back. Any pending snapshot is dropped.
    pub fn set<R>(&mut self, change: impl FnOnce(&mut T) -> R) -> R {
        self.previous = None;
        change(&mut self.current)
    }

    /// Restores the snapshot. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.previous.take() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub const fn can_undo(&self) -> bool {
        self.previous.is_some()
    }

    /// Forgets the snapshot, e.g. once another action supersedes it.
    pub fn discard(&mut self) {
        self.previous = None;
    }
}
