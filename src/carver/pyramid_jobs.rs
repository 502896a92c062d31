use std::sync::mpsc;

use crate::audio_io::{LoadPhase, Rhythm};
use crate::markers::MarkerSet;
use crate::pyramid::{self, ZoomPyramid};
use crate::trace;

pub(crate) struct PyramidOutcome {
    pub generation: u64,
    pub version: u64,
    pub pyramid: ZoomPyramid,
}

pub(crate) struct AnalysisOutcome {
    pub generation: u64,
    pub version: u64,
    pub result: Result<Rhythm, String>,
}

impl super::WaveCarver {
    /// Rebuild the zoom pyramid off-thread against the published snapshot.
    /// Dropping the previous receiver cancels delivery of its result; the
    /// generation + version pair guards against anything that slips
    /// through.
    pub(super) fn schedule_pyramid_rebuild(&mut self) {
        self.pyramid_rx = None;
        self.pyramid_gen_counter = self.pyramid_gen_counter.wrapping_add(1);
        let generation = self.pyramid_gen_counter;
        self.pyramid_expected_gen = generation;
        let shared = self.shared.clone();
        let factors = self.config.zoom_factors.clone();
        let (tx, rx) = mpsc::channel::<PyramidOutcome>();
        std::thread::spawn(move || {
            let Some(snap) = shared.current.load_full() else {
                return;
            };
            let pyramid = pyramid::build_pyramid(&snap.samples, &factors);
            let _ = tx.send(PyramidOutcome {
                generation,
                version: snap.version,
                pyramid,
            });
        });
        self.pyramid_rx = Some(rx);
    }

    pub(super) fn drain_pyramid_job(&mut self) -> bool {
        let Some(rx) = self.pyramid_rx.take() else {
            return false;
        };
        match rx.try_recv() {
            Ok(out) => {
                if out.generation != self.pyramid_expected_gen
                    || out.version != self.buffer_version
                {
                    // stale result for a superseded buffer
                    trace::event(
                        "pyramid_stale",
                        format_args!("generation={} version={}", out.generation, out.version),
                    );
                    self.schedule_pyramid_rebuild();
                    return false;
                }
                self.pyramid = Some(out.pyramid);
                true
            }
            Err(mpsc::TryRecvError::Empty) => {
                self.pyramid_rx = Some(rx);
                false
            }
            Err(mpsc::TryRecvError::Disconnected) => false,
        }
    }

    /// Run the rhythm collaborator against the published snapshot and
    /// install the resulting markers. Failures only touch `status`.
    pub(super) fn schedule_analysis(&mut self) {
        let Some(extractor) = self.extractor.clone() else {
            return;
        };
        self.analysis_rx = None;
        self.analysis_gen_counter = self.analysis_gen_counter.wrapping_add(1);
        let generation = self.analysis_gen_counter;
        self.analysis_expected_gen = generation;
        self.status = Some(LoadPhase::FindingBeats.to_string());
        let shared = self.shared.clone();
        let sample_rate = self.sample_rate;
        let (tx, rx) = mpsc::channel::<AnalysisOutcome>();
        std::thread::spawn(move || {
            let Some(snap) = shared.current.load_full() else {
                return;
            };
            let result = extractor
                .extract_ticks(&snap.samples, sample_rate)
                .map_err(|err| err.to_string());
            let _ = tx.send(AnalysisOutcome {
                generation,
                version: snap.version,
                result,
            });
        });
        self.analysis_rx = Some(rx);
    }

    pub(super) fn drain_analysis_job(&mut self) -> bool {
        let Some(rx) = self.analysis_rx.take() else {
            return false;
        };
        match rx.try_recv() {
            Ok(out) => {
                if out.generation != self.analysis_expected_gen
                    || out.version != self.buffer_version
                {
                    trace::event(
                        "analysis_stale",
                        format_args!("generation={} version={}", out.generation, out.version),
                    );
                    self.schedule_analysis();
                    return false;
                }
                match out.result {
                    Ok(rhythm) => {
                        self.markers = MarkerSet::from_ticks(
                            &rhythm.tick_seconds,
                            self.sample_rate,
                            self.buffer.len(),
                            rhythm.bpm,
                        );
                        self.status = None;
                    }
                    Err(message) => {
                        trace::event("analysis_failed", format_args!("err={message}"));
                        self.status =
                            Some(format!("{} failed: {message}", LoadPhase::FindingBeats));
                    }
                }
                true
            }
            Err(mpsc::TryRecvError::Empty) => {
                self.analysis_rx = Some(rx);
                false
            }
            Err(mpsc::TryRecvError::Disconnected) => false,
        }
    }
}
