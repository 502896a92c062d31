/// Beat-tick markers: display-only sample positions detected by the rhythm
/// collaborator. Positions are sorted and deduped; nothing here mutates the
/// audio.
#[derive(Clone, Debug, Default)]
pub struct MarkerSet {
    positions: Vec<usize>,
    bpm: f32,
}

impl MarkerSet {
    /// Convert tick times (seconds) into sample positions within a buffer
    /// of `len` samples. Ticks outside the buffer or non-finite are
    /// dropped; bpm is rounded for display.
    pub fn from_ticks(tick_seconds: &[f32], sample_rate: u32, len: usize, bpm: f32) -> Self {
        let sr = sample_rate.max(1) as f64;
        let mut positions: Vec<usize> = tick_seconds
            .iter()
            .filter(|t| t.is_finite() && **t >= 0.0)
            .map(|&t| ((t as f64) * sr).round() as usize)
            .filter(|&p| p < len)
            .collect();
        positions.sort_unstable();
        positions.dedup();
        Self {
            positions,
            bpm: if bpm.is_finite() { bpm.round() } else { 0.0 },
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.bpm = 0.0;
    }

    /// Nearest markers strictly before / strictly after `pos`.
    pub fn neighbors(&self, pos: usize) -> (Option<usize>, Option<usize>) {
        let split = self.positions.partition_point(|&m| m < pos);
        let before = split.checked_sub(1).map(|i| self.positions[i]);
        let after = self.positions[split..].iter().find(|&&m| m > pos).copied();
        (before, after)
    }

    /// Marker positions mapped to overview columns for a buffer of
    /// `raw_len` samples drawn `display_width` columns wide.
    pub fn display_columns(&self, raw_len: usize, display_width: usize) -> Vec<f32> {
        if raw_len == 0 {
            return Vec::new();
        }
        let scale = display_width as f64 / raw_len as f64;
        self.positions
            .iter()
            .map(|&p| ((p as f64) * scale) as f32)
            .collect()
    }
}

/// Overview column of the playhead at `seconds` into a buffer lasting
/// `duration_seconds`, wrapped for looped playback.
pub fn playhead_column(seconds: f64, duration_seconds: f64, display_width: usize) -> f32 {
    if duration_seconds <= 0.0 {
        return 0.0;
    }
    let t = seconds.rem_euclid(duration_seconds);
    ((t / duration_seconds) * display_width as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> MarkerSet {
        MarkerSet::from_ticks(&[0.01, 0.02, 0.05, 0.05], 44_100, 44_100, 119.6)
    }

    #[test]
    fn ticks_convert_sort_and_dedup() {
        let m = set();
        assert_eq!(m.positions(), &[441, 882, 2205]);
        assert_eq!(m.bpm(), 120.0);
    }

    #[test]
    fn neighbors_are_strict() {
        let m = set();
        assert_eq!(m.neighbors(882), (Some(441), Some(2205)));
        assert_eq!(m.neighbors(0), (None, Some(441)));
        assert_eq!(m.neighbors(3000), (Some(2205), None));
    }

    #[test]
    fn playhead_wraps_past_the_duration() {
        let x = playhead_column(1.5, 1.0, 512);
        assert!((x - 256.0).abs() < 1e-6);
    }
}
