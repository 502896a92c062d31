use crate::carver::BufferChange;

impl super::WaveCarver {
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one snapshot; false (and no state change) at the oldest
    /// entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.install_buffer(snapshot, BufferChange::HistoryJump);
        true
    }

    /// Step forward one snapshot; false (and no state change) at the tail.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.install_buffer(snapshot, BufferChange::HistoryJump);
        true
    }

    pub fn history_depth(&self) -> usize {
        self.history.entry_count()
    }
}
