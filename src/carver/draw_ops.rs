use std::sync::Arc;

use crate::carver::BufferChange;
use crate::freehand::{PointerEvent, PointerKind, StrokeOutcome};
use crate::surface::{self, DrawSurface};
use crate::wave;

const SMOOTH_RADIUS: usize = 4;

impl super::WaveCarver {
    /// Route a normalized pointer event into the freehand editor. Strokes
    /// edit a scratch copy of the buffer (copy-on-write); the finished
    /// stroke installs as one committed snapshot.
    pub fn freehand_pointer(&mut self, ev: PointerEvent) -> StrokeOutcome {
        if self.buffer.is_empty() {
            return StrokeOutcome::Idle;
        }
        let may_write = ev.pressed && matches!(ev.kind, PointerKind::Move);
        if may_write && self.stroke_buf.is_none() {
            self.stroke_buf = Some(self.buffer.as_ref().clone());
        }
        let outcome = if let Some(scratch) = self.stroke_buf.as_mut() {
            self.freehand.handle(ev, scratch)
        } else {
            self.freehand.handle(ev, &mut [])
        };
        if let StrokeOutcome::Finished { dirty } = outcome {
            if let Some(scratch) = self.stroke_buf.take() {
                if dirty {
                    self.install_buffer(Arc::new(scratch), BufferChange::Edit);
                }
            }
        }
        outcome
    }

    /// Repaint the span a stroke segment touched, reading the in-progress
    /// scratch buffer while a stroke is active.
    pub fn repaint_stroke_span(&self, surface: &mut dyn DrawSurface, start: usize, length: usize) {
        let data: &[f32] = self.stroke_buf.as_deref().unwrap_or(&self.buffer);
        surface::repaint_span(
            surface,
            data,
            self.config.display_height,
            self.config.amp_range(),
            start,
            length,
        );
    }

    /// Smooth the whole editable buffer (wrap-padded double moving
    /// average) and commit one history entry. Refused mid-stroke.
    pub fn smooth_buffer(&mut self) -> bool {
        if self.buffer.is_empty() || self.freehand.is_drawing() {
            return false;
        }
        let smoothed = wave::smooth_wrapped(&self.buffer, SMOOTH_RADIUS);
        self.install_buffer(Arc::new(smoothed), BufferChange::Edit);
        true
    }
}
