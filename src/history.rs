use std::sync::Arc;

/// Linear undo/redo stack over immutable buffer snapshots. Index 0 is the
/// initial load; pushing while rewound discards the redo tail; the depth is
/// bounded and overflow drops the oldest entry.
#[derive(Clone)]
pub struct SnapshotHistory {
    entries: Vec<Arc<Vec<f32>>>,
    index: usize,
    limit: usize,
}

impl SnapshotHistory {
    pub fn new(initial: Arc<Vec<f32>>, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &Arc<Vec<f32>> {
        &self.entries[self.index]
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Append a committed snapshot. Returns false (stack untouched) when
    /// `buffer` is the snapshot already at the cursor, so redundant commit
    /// events collapse into one entry.
    pub fn push(&mut self, buffer: Arc<Vec<f32>>) -> bool {
        if Arc::ptr_eq(&buffer, &self.entries[self.index]) {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(buffer);
        self.index += 1;
        while self.entries.len() > self.limit {
            self.entries.remove(0);
            self.index -= 1;
        }
        true
    }

    /// Step back one snapshot; at the oldest entry this is a no-op and
    /// returns None.
    pub fn undo(&mut self) -> Option<Arc<Vec<f32>>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    /// Step forward one snapshot; at the tail this is a no-op and returns
    /// None.
    pub fn redo(&mut self) -> Option<Arc<Vec<f32>>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.entries[self.index].clone())
    }

    /// Restart from a fresh initial snapshot (new source buffer).
    pub fn reset(&mut self, initial: Arc<Vec<f32>>) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }
}
