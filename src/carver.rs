use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use arc_swap::ArcSwapOption;

use crate::audio_io::{PlaybackSink, RhythmExtractor};
use crate::config::CarverConfig;
use crate::freehand::FreehandEditor;
use crate::history::SnapshotHistory;
use crate::markers::MarkerSet;
use crate::pyramid::ZoomPyramid;
use crate::selection::{EdgeDrag, Selection};
use crate::surface::{self, DrawSurface};
use crate::wave;

mod crop_ops;
mod draw_ops;
mod history_ops;
mod load_ops;
mod pyramid_jobs;
mod select_ops;

use load_ops::LoadMsg;
use pyramid_jobs::{AnalysisOutcome, PyramidOutcome};

/// The coherent (buffer, version) pair published to worker threads.
pub struct TrackSnapshot {
    pub samples: Arc<Vec<f32>>,
    pub version: u64,
}

pub(crate) struct SharedTrack {
    pub current: ArcSwapOption<TrackSnapshot>,
    pub version: AtomicU64,
}

/// Why a buffer is being installed; decides what happens to history and
/// the analysis pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BufferChange {
    Load,
    Crop,
    Edit,
    HistoryJump,
}

/// The interactive waveform engine: owns the working buffer, its display
/// envelope and zoom pyramid, the selection/drag state, beat markers, and
/// the snapshot history. All mutation happens on the caller's thread;
/// decode, pyramid, and analysis work runs on background jobs drained by
/// `poll_jobs`.
pub struct WaveCarver {
    pub(crate) config: CarverConfig,
    pub(crate) shared: Arc<SharedTrack>,
    pub(crate) buffer: Arc<Vec<f32>>,
    pub(crate) buffer_version: u64,
    pub(crate) sample_rate: u32,
    pub(crate) envelope: Vec<f32>,
    pub(crate) env_range: (f32, f32),
    pub(crate) pyramid: Option<ZoomPyramid>,
    pub(crate) selection: Option<Selection>,
    pub(crate) drag: Option<EdgeDrag>,
    pub(crate) freehand: FreehandEditor,
    pub(crate) stroke_buf: Option<Vec<f32>>,
    pub(crate) markers: MarkerSet,
    pub(crate) history: SnapshotHistory,
    pub(crate) status: Option<String>,
    pub(crate) playback_rate: f32,
    pub(crate) extractor: Option<Arc<dyn RhythmExtractor>>,
    pub(crate) sink: Option<Arc<dyn PlaybackSink>>,
    pub(crate) load_rx: Option<mpsc::Receiver<LoadMsg>>,
    pub(crate) pyramid_rx: Option<mpsc::Receiver<PyramidOutcome>>,
    pub(crate) pyramid_gen_counter: u64,
    pub(crate) pyramid_expected_gen: u64,
    pub(crate) analysis_rx: Option<mpsc::Receiver<AnalysisOutcome>>,
    pub(crate) analysis_gen_counter: u64,
    pub(crate) analysis_expected_gen: u64,
}

impl WaveCarver {
    pub fn new(config: CarverConfig) -> Self {
        let config = config.normalized();
        let buffer: Arc<Vec<f32>> = Arc::new(Vec::new());
        let history = SnapshotHistory::new(buffer.clone(), config.history_limit);
        let freehand = FreehandEditor::new(config.display_height, config.amp_range());
        Self {
            shared: Arc::new(SharedTrack {
                current: ArcSwapOption::from(None),
                version: AtomicU64::new(0),
            }),
            buffer,
            buffer_version: 0,
            sample_rate: config.sample_rate,
            envelope: vec![0.0; config.display_width],
            env_range: (-1.0, 1.0),
            pyramid: None,
            selection: None,
            drag: None,
            freehand,
            stroke_buf: None,
            markers: MarkerSet::default(),
            history,
            status: None,
            playback_rate: 1.0,
            extractor: None,
            sink: None,
            load_rx: None,
            pyramid_rx: None,
            pyramid_gen_counter: 0,
            pyramid_expected_gen: 0,
            analysis_rx: None,
            analysis_gen_counter: 0,
            analysis_expected_gen: 0,
            config,
        }
    }

    pub fn set_rhythm_extractor(&mut self, extractor: Arc<dyn RhythmExtractor>) {
        self.extractor = Some(extractor);
    }

    pub fn set_playback_sink(&mut self, sink: Arc<dyn PlaybackSink>) {
        sink.set_buffer(self.buffer.clone(), self.sample_rate);
        sink.set_rate(self.playback_rate);
        self.sink = Some(sink);
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.playback_rate = rate.clamp(0.25, 4.0);
        if let Some(sink) = &self.sink {
            sink.set_rate(self.playback_rate);
        }
    }

    pub fn config(&self) -> &CarverConfig {
        &self.config
    }

    pub fn buffer(&self) -> &Arc<Vec<f32>> {
        &self.buffer
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.buffer.len() as f64 / self.sample_rate.max(1) as f64
    }

    pub fn envelope(&self) -> &[f32] {
        &self.envelope
    }

    pub fn envelope_range(&self) -> (f32, f32) {
        self.env_range
    }

    pub fn pyramid(&self) -> Option<&ZoomPyramid> {
        self.pyramid.as_ref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn drag_active(&self) -> bool {
        self.drag.is_some()
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Drain finished background work into engine state. Returns true when
    /// anything changed; callers poll this from their event loop.
    pub fn poll_jobs(&mut self) -> bool {
        let mut changed = self.drain_load_job();
        changed |= self.drain_pyramid_job();
        changed |= self.drain_analysis_job();
        changed
    }

    /// Draw the top-level envelope and the marker overlay.
    pub fn render_overview(&self, surface: &mut dyn DrawSurface) {
        surface::render_wave(
            surface,
            &self.envelope,
            self.config.display_height,
            self.env_range,
        );
        let columns = self
            .markers
            .display_columns(self.buffer.len(), self.config.display_width);
        surface::render_markers(surface, &columns, self.config.display_height);
    }

    /// Make `samples` the working buffer: bump the published version,
    /// recompute the display envelope, reset transient selection state,
    /// update history per `change`, and schedule the background rebuilds.
    /// Any in-flight job result for the previous buffer dies on the
    /// version check.
    pub(crate) fn install_buffer(&mut self, samples: Arc<Vec<f32>>, change: BufferChange) {
        self.buffer = samples.clone();
        self.buffer_version = self.shared.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.current.store(Some(Arc::new(TrackSnapshot {
            samples: samples.clone(),
            version: self.buffer_version,
        })));
        let bucket = samples.len() as f64 / self.config.display_width as f64;
        self.envelope = wave::downsample_rms(&samples, bucket, self.config.display_width);
        self.env_range = wave::value_range(&self.envelope);
        self.pyramid = None;
        self.selection = None;
        self.drag = None;
        self.stroke_buf = None;
        self.freehand.set_extent(samples.len() as f32);
        match change {
            BufferChange::Load => {
                self.history.reset(samples.clone());
                self.markers.clear();
            }
            BufferChange::Crop | BufferChange::Edit => {
                self.history.push(samples.clone());
            }
            BufferChange::HistoryJump => {}
        }
        self.schedule_pyramid_rebuild();
        if matches!(change, BufferChange::Load | BufferChange::Crop) {
            self.schedule_analysis();
        }
        if let Some(sink) = &self.sink {
            sink.set_buffer(samples, self.sample_rate);
        }
    }
}
