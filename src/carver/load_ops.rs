use std::sync::{mpsc, Arc};

use crate::audio_io::{self, LoadPhase, CANONICAL_SAMPLE_RATE};
use crate::carver::BufferChange;
use crate::trace;

pub(crate) enum LoadMsg {
    Phase(LoadPhase),
    Done { samples: Vec<f32> },
    Failed { phase: LoadPhase, message: String },
}

impl super::WaveCarver {
    /// Install an already-decoded canonical-rate buffer directly
    /// (collaborator output or a programmatic source). Resets history,
    /// selection, and markers like any fresh load.
    pub fn load_samples(&mut self, samples: Vec<f32>, sample_rate: u32) {
        self.sample_rate = if sample_rate == 0 {
            CANONICAL_SAMPLE_RATE
        } else {
            sample_rate
        };
        self.status = None;
        self.load_rx = None;
        self.install_buffer(Arc::new(samples), BufferChange::Load);
    }

    /// Decode raw file bytes off-thread: decode, mix to mono, resample to
    /// the canonical rate, then install. Progress shows through
    /// `status()`; a collaborator failure parks the status at the failed
    /// stage and leaves the current buffer, selection, and history alone.
    pub fn load_bytes(&mut self, bytes: Vec<u8>, ext_hint: Option<&str>) {
        let (tx, rx) = mpsc::channel::<LoadMsg>();
        let ext = ext_hint.map(str::to_string);
        self.status = Some(LoadPhase::Decoding.to_string());
        std::thread::spawn(move || run_load_pipeline(&tx, bytes, ext.as_deref()));
        self.load_rx = Some(rx);
    }

    pub fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    pub(super) fn drain_load_job(&mut self) -> bool {
        let Some(rx) = self.load_rx.take() else {
            return false;
        };
        let mut changed = false;
        loop {
            match rx.try_recv() {
                Ok(LoadMsg::Phase(phase)) => {
                    self.status = Some(phase.to_string());
                    changed = true;
                }
                Ok(LoadMsg::Done { samples }) => {
                    self.status = None;
                    self.sample_rate = CANONICAL_SAMPLE_RATE;
                    self.install_buffer(Arc::new(samples), BufferChange::Load);
                    return true;
                }
                Ok(LoadMsg::Failed { phase, message }) => {
                    trace::event("load_failed", format_args!("phase={phase} err={message}"));
                    self.status = Some(format!("{phase} failed: {message}"));
                    return true;
                }
                Err(mpsc::TryRecvError::Empty) => {
                    self.load_rx = Some(rx);
                    return changed;
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.status = Some("loading failed".to_string());
                    return true;
                }
            }
        }
    }
}

fn run_load_pipeline(tx: &mpsc::Sender<LoadMsg>, bytes: Vec<u8>, ext: Option<&str>) {
    let _ = tx.send(LoadMsg::Phase(LoadPhase::Decoding));
    let decoded = match audio_io::decode_bytes(bytes, ext) {
        Ok(d) => d,
        Err(err) => {
            let _ = tx.send(LoadMsg::Failed {
                phase: LoadPhase::Decoding,
                message: err.to_string(),
            });
            return;
        }
    };
    let source_rate = decoded.sample_rate;
    let mut mono = if decoded.channels.len() >= 2 {
        let _ = tx.send(LoadMsg::Phase(LoadPhase::Mixing));
        audio_io::mixdown(&decoded.channels)
    } else {
        decoded.channels.into_iter().next().unwrap_or_default()
    };
    if source_rate != CANONICAL_SAMPLE_RATE {
        let _ = tx.send(LoadMsg::Phase(LoadPhase::Resampling));
        let in_len = mono.len() - mono.len() % 2;
        let out = (mono.len() as f64) * (CANONICAL_SAMPLE_RATE as f64) / (source_rate as f64);
        let out_len = {
            let o = out.round() as usize;
            o - o % 2
        };
        mono = audio_io::resample(&mono, in_len, out_len);
    }
    let _ = tx.send(LoadMsg::Done { samples: mono });
}
