use std::sync::Arc;

use crate::carver::BufferChange;
use crate::trace;

impl super::WaveCarver {
    /// Replace the buffer with the selected range, trimmed to an even
    /// length for the resample contract. Commits an undoable snapshot and
    /// resets all transient selection/drag state.
    pub fn crop_to_selection(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let (start, end) = selection.crop_bounds();
        let end = end.min(self.buffer.len());
        if end <= start {
            return false;
        }
        let cropped: Vec<f32> = self.buffer[start..end].to_vec();
        trace::event("crop", format_args!("start={start} end={end}"));
        self.install_buffer(Arc::new(cropped), BufferChange::Crop);
        true
    }
}
