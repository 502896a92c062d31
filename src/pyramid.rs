use std::sync::Arc;

use crate::selection::Selection;
use crate::wave;

/// One zoom level: raw samples at factor 1, bucketed RMS above.
#[derive(Clone, Debug)]
pub struct PyramidLevel {
    pub factor: usize,
    data: LevelData,
}

#[derive(Clone, Debug)]
enum LevelData {
    Raw(Arc<Vec<f32>>),
    Bucketed(Vec<f32>),
}

impl PyramidLevel {
    pub fn samples(&self) -> &[f32] {
        match &self.data {
            LevelData::Raw(buf) => buf,
            LevelData::Bucketed(env) => env,
        }
    }

    pub fn len(&self) -> usize {
        self.samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }

    /// True when this level aliases the source buffer (factor 1).
    pub fn is_raw(&self) -> bool {
        matches!(self.data, LevelData::Raw(_))
    }

    pub fn raw(&self) -> Option<&Arc<Vec<f32>>> {
        match &self.data {
            LevelData::Raw(buf) => Some(buf),
            LevelData::Bucketed(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ZoomPyramid {
    levels: Vec<PyramidLevel>,
}

impl ZoomPyramid {
    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn level(&self, factor: usize) -> Option<&PyramidLevel> {
        self.levels.iter().find(|l| l.factor == factor)
    }
}

/// Build one envelope per factor. Factor 1 aliases the buffer itself (no
/// reduction); factor N > 1 gets `len / N` RMS buckets of width N.
pub fn build_pyramid(buffer: &Arc<Vec<f32>>, factors: &[usize]) -> ZoomPyramid {
    let mut levels = Vec::with_capacity(factors.len());
    for &factor in factors {
        let data = if factor <= 1 {
            LevelData::Raw(buffer.clone())
        } else {
            let out_len = buffer.len() / factor;
            LevelData::Bucketed(wave::downsample_rms(buffer, factor as f64, out_len))
        };
        levels.push(PyramidLevel {
            factor: factor.max(1),
            data,
        });
    }
    ZoomPyramid { levels }
}

/// A `width`-column view of `level` centered on the level-local index of
/// raw-sample `center`. Runs past the left boundary are zero-filled so the
/// center column stays put; the right end truncates.
pub fn window_at(level: &PyramidLevel, center: usize, width: usize) -> Vec<f32> {
    let data = level.samples();
    let factor = level.factor.max(1);
    let local = center / factor;
    let half = width / 2;
    let mut out = Vec::with_capacity(width);
    if local < half {
        out.resize(half - local, 0.0);
    }
    let from = local.saturating_sub(half);
    let take = width.saturating_sub(out.len());
    let to = from.saturating_add(take).min(data.len());
    if from < to {
        out.extend_from_slice(&data[from..to]);
    }
    out
}

/// The three display slices a zoomed row shows for the current selection.
#[derive(Clone, Debug, Default)]
pub struct SelectionWindows {
    /// Half a display width ending at the low edge (zero-filled when the
    /// edge sits near the start of the buffer).
    pub before_low: Vec<f32>,
    /// Half a display width starting at the high edge.
    pub after_high: Vec<f32>,
    /// The selection interior: the approach to the high edge followed by
    /// the departure from the low edge, each side clipped to half a
    /// display width or the selection span, whichever is narrower.
    pub span: Vec<f32>,
}

pub fn selection_windows(
    level: &PyramidLevel,
    selection: Selection,
    display_width: usize,
) -> SelectionWindows {
    let data = level.samples();
    let factor = level.factor.max(1);
    let half = display_width / 2;
    let low = selection.low / factor;
    let high = selection.high / factor;

    let mut before_low = Vec::with_capacity(half);
    if low < half {
        before_low.resize(half - low, 0.0);
    }
    let from = low.saturating_sub(half);
    let to = low.min(data.len());
    if from < to {
        before_low.extend_from_slice(&data[from..to]);
    }

    let to = high.saturating_add(half).min(data.len());
    let after_high = if high < to {
        data[high..to].to_vec()
    } else {
        Vec::new()
    };

    let side = half.min(high - low);
    let mut span = Vec::with_capacity(side * 2);
    let from = high.saturating_sub(side).min(data.len());
    let to = high.min(data.len());
    if from < to {
        span.extend_from_slice(&data[from..to]);
    }
    let from = low.min(data.len());
    let to = low.saturating_add(side).min(data.len());
    if from < to {
        span.extend_from_slice(&data[from..to]);
    }

    SelectionWindows {
        before_low,
        after_high,
        span,
    }
}
