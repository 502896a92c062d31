/// Pointer input normalized by the embedding platform: `x` counts buffer
/// columns, `y` display pixels from the top, `pressed` reflects the
/// primary button or touch contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub kind: PointerKind,
    pub pressed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Enter,
    Leave,
    Cancel,
}

/// What a pointer event did to the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeOutcome {
    Idle,
    /// Wrote the columns `[start, start + length)`.
    Drawn { start: usize, length: usize },
    /// The stroke ended; `dirty` says whether anything was written.
    Finished { dirty: bool },
}

/// Freehand drawing state across discontinuous pointer events. The anchor
/// advances after every segment so fast motion chains into a continuous
/// polyline.
#[derive(Clone, Copy, Debug)]
pub struct FreehandEditor {
    height: f32,
    range_low: f32,
    range_high: f32,
    width: f32,
    last: (f32, f32),
    drawing: bool,
    dirty: bool,
}

impl FreehandEditor {
    pub fn new(height: f32, range: (f32, f32)) -> Self {
        Self {
            height,
            range_low: range.0,
            range_high: range.1,
            width: 0.0,
            last: (0.0, 0.0),
            drawing: false,
            dirty: false,
        }
    }

    /// Horizontal extent in columns (the editable buffer length). Used by
    /// the re-entry correction, which can fire before any write.
    pub fn set_extent(&mut self, width: f32) {
        self.width = width;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn handle(&mut self, ev: PointerEvent, buffer: &mut [f32]) -> StrokeOutcome {
        match ev.kind {
            PointerKind::Down => {
                self.last = (ev.x, ev.y);
                self.drawing = ev.pressed;
                StrokeOutcome::Idle
            }
            PointerKind::Enter => {
                self.snap_entry_anchor(ev);
                StrokeOutcome::Idle
            }
            PointerKind::Move => {
                if !ev.pressed {
                    // button released away from the surface: the stroke is
                    // over even though no Up event arrives
                    self.last = (ev.x, ev.y);
                    return self.finish_stroke();
                }
                self.drawing = true;
                let out = self.draw_segment(ev, buffer);
                self.last = (ev.x, ev.y);
                out
            }
            PointerKind::Up | PointerKind::Leave | PointerKind::Cancel => {
                self.last = (ev.x, ev.y);
                self.finish_stroke()
            }
        }
    }

    fn finish_stroke(&mut self) -> StrokeOutcome {
        if !self.drawing {
            return StrokeOutcome::Idle;
        }
        self.drawing = false;
        let dirty = self.dirty;
        self.dirty = false;
        StrokeOutcome::Finished { dirty }
    }

    /// Linear interpolation between the anchor and the current point across
    /// every covered column. A vertical stroke (x unchanged) has slope 0
    /// and writes the later point's amplitude.
    fn draw_segment(&mut self, ev: PointerEvent, buffer: &mut [f32]) -> StrokeOutcome {
        let len = buffer.len();
        if len == 0 {
            return StrokeOutcome::Idle;
        }
        let (x0, y0) = self.last;
        let (x1, y1) = (ev.x, ev.y);
        let left = x0.min(x1);
        let start = left.floor().max(0.0) as usize;
        if start >= len {
            return StrokeOutcome::Idle;
        }
        let span = (x0.max(x1) - start as f32).ceil().max(0.0) as usize;
        let length = span.min(len - start);
        if length == 0 {
            return StrokeOutcome::Idle;
        }
        let frac = left - start as f32;
        let scale = self.height / (self.range_high - self.range_low);
        let start_amp = self.range_high - (if x1 <= x0 { y1 } else { y0 }) / scale;
        let end_amp = self.range_high - (if x1 < x0 { y0 } else { y1 }) / scale;
        let slope = if x1 == x0 {
            0.0
        } else {
            (end_amp - start_amp) / (x1 - x0).abs()
        };
        for i in 0..length {
            buffer[start + i] = start_amp + (i as f32 - frac) * slope;
        }
        self.dirty = true;
        StrokeOutcome::Drawn { start, length }
    }

    /// Re-entering mid-surface after a fast exit: when the entry point is
    /// closer to the left or right edge than to top/bottom, snap the anchor
    /// x to that edge so the next segment doesn't cut the corner.
    fn snap_entry_anchor(&mut self, ev: PointerEvent) {
        self.drawing = ev.pressed;
        let (x, y) = (ev.x, ev.y);
        if x <= 0.0 || y <= 0.0 || x >= self.width || y >= self.height {
            self.last = (x, y);
            return;
        }
        let right = self.width - x;
        let bottom = self.height - y;
        let min = x.min(y).min(right).min(bottom);
        if min == x {
            self.last = (0.0, y);
        } else if min == right {
            self.last = (self.width, y);
        } else {
            self.last = (x, y);
        }
    }
}
