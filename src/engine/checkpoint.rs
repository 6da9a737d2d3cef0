//! Ordered log of cursor positions playback may rewind to.

/// Strictly increasing cursor values, always starting at `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointStore {
    entries: Vec<usize>,
    current: usize,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self {
            entries: vec![0],
            current: 0,
        }
    }

    /// Back to `[0]` with the current index at `0`
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(0);
        self.current = 0;
    }

    /// Append `cursor` if it moves past the last entry, then point the current
    /// index at the tail. Returns whether an entry was added.
    pub fn record(&mut self, cursor: usize) -> bool {
        let last = self.last();
        let added = cursor > last;
        if added {
            self.entries.push(cursor);
        } else if cursor < last {
            tracing::debug!(cursor, last, "Ignoring out-of-order checkpoint");
        }
        self.current = self.entries.len() - 1;
        added
    }

    /// Drop every entry after `index`; subsequent progress starts a fresh branch.
    pub fn truncate_after(&mut self, index: usize) {
        let index = index.min(self.entries.len() - 1);
        self.entries.truncate(index + 1);
        self.current = index;
    }

    /// Index of the checkpoint before `index`, if there is one
    pub fn previous(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.entries.get(index).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn last(&self) -> usize {
        self.entries.last().copied().unwrap_or(0)
    }

    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the store always holds the initial checkpoint
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}
