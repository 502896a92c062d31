use crate::pyramid::{self, SelectionWindows};
use crate::selection::{self, DragEdge, EdgeDrag, Selection, SnapDirection};

impl super::WaveCarver {
    /// Establish the selection from two overview columns (coarse click +
    /// release on the top-level envelope).
    pub fn coarse_select(&mut self, a_px: f32, b_px: f32) -> Option<Selection> {
        let len = self.buffer.len();
        if len == 0 {
            self.selection = None;
            return None;
        }
        let width = self.config.display_width;
        let a = selection::coarse_to_fine(a_px.min(b_px), len, width);
        let b = selection::coarse_to_fine(a_px.max(b_px), len, width);
        self.selection = Selection::new(a, b, len);
        self.drag = None;
        self.selection
    }

    /// Set the selection directly in the sample domain (ordered, clamped).
    pub fn select_samples(&mut self, a: usize, b: usize) -> Option<Selection> {
        self.selection = Selection::new(a, b, self.buffer.len());
        self.drag = None;
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.drag = None;
    }

    /// Grab the nearer selection edge for fine adjustment; false when
    /// there is nothing selected.
    pub fn begin_edge_drag(&mut self, x: f32) -> bool {
        if self.selection.is_none() {
            return false;
        }
        self.drag = Some(EdgeDrag::begin(x, self.config.display_width));
        true
    }

    /// Nudge the grabbed edge; `factor` is the zoom level under the
    /// pointer.
    pub fn drag_edge_to(&mut self, x: f32, factor: usize) -> bool {
        let len = self.buffer.len();
        let (Some(drag), Some(selection)) = (self.drag.as_mut(), self.selection.as_mut()) else {
            return false;
        };
        drag.update(x, factor, selection, len);
        true
    }

    /// One final nudge, then back to idle.
    pub fn end_edge_drag(&mut self, x: f32, factor: usize) -> bool {
        let moved = self.drag_edge_to(x, factor);
        self.drag = None;
        moved
    }

    /// Snap one edge to its nearest marker strictly before or after it;
    /// the other edge stays put. False when no such marker exists.
    pub fn snap_edge_to_marker(&mut self, edge: DragEdge, direction: SnapDirection) -> bool {
        let len = self.buffer.len();
        let Some(selection) = self.selection else {
            return false;
        };
        let pos = match edge {
            DragEdge::Low => selection.low,
            DragEdge::High => selection.high,
        };
        let (before, after) = self.markers.neighbors(pos);
        let target = match direction {
            SnapDirection::Previous => before,
            SnapDirection::Next => after,
        };
        let Some(target) = target else {
            return false;
        };
        let (a, b) = match edge {
            DragEdge::Low => (target, selection.high),
            DragEdge::High => (selection.low, target),
        };
        self.selection = Selection::new(a, b, len);
        true
    }

    /// Per-level context slices for the current selection, once the
    /// pyramid for the current buffer is ready.
    pub fn selection_windows(&self, factor: usize) -> Option<SelectionWindows> {
        let selection = self.selection?;
        let level = self.pyramid.as_ref()?.level(factor)?;
        Some(pyramid::selection_windows(
            level,
            selection,
            self.config.display_width,
        ))
    }
}
