use anyhow::{Context, Result};
use serde::Deserialize;

use crate::audio_io::CANONICAL_SAMPLE_RATE;

/// Engine configuration. Defaults match the stock display surface: a 512
/// column overview, 100 px tall, amplitudes in [-1, 1], and a four-level
/// zoom pyramid down to raw samples.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarverConfig {
    pub display_width: usize,
    pub display_height: f32,
    pub amp_low: f32,
    pub amp_high: f32,
    pub zoom_factors: Vec<usize>,
    pub history_limit: usize,
    pub sample_rate: u32,
}

impl Default for CarverConfig {
    fn default() -> Self {
        Self {
            display_width: 512,
            display_height: 100.0,
            amp_low: -1.0,
            amp_high: 1.0,
            zoom_factors: vec![4096, 256, 16, 1],
            history_limit: 20,
            sample_rate: CANONICAL_SAMPLE_RATE,
        }
    }
}

impl CarverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: CarverConfig = toml::from_str(text).context("parse carver config")?;
        Ok(cfg.normalized())
    }

    /// Repair out-of-range values instead of failing: zoom factors are
    /// sorted descending, deduped, and always end at the raw level.
    pub fn normalized(mut self) -> Self {
        if self.display_width == 0 {
            self.display_width = 512;
        }
        if self.display_height <= 0.0 {
            self.display_height = 100.0;
        }
        if self.amp_high <= self.amp_low {
            self.amp_low = -1.0;
            self.amp_high = 1.0;
        }
        self.zoom_factors.retain(|&f| f >= 1);
        self.zoom_factors.sort_unstable_by(|a, b| b.cmp(a));
        self.zoom_factors.dedup();
        if self.zoom_factors.last() != Some(&1) {
            self.zoom_factors.push(1);
        }
        if self.history_limit == 0 {
            self.history_limit = 1;
        }
        if self.sample_rate == 0 {
            self.sample_rate = CANONICAL_SAMPLE_RATE;
        }
        self
    }

    pub fn amp_range(&self) -> (f32, f32) {
        (self.amp_low, self.amp_high)
    }
}
