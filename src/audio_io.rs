use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::trace;

/// Every buffer the engine owns is at this rate; the load pipeline
/// resamples whatever the decoder reports down to it.
pub const CANONICAL_SAMPLE_RATE: u32 = 44_100;

/// Pipeline stage names surfaced through `WaveCarver::status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Decoding,
    Mixing,
    Resampling,
    FindingBeats,
}

impl std::fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LoadPhase::Decoding => "decoding",
            LoadPhase::Mixing => "mixing",
            LoadPhase::Resampling => "resampling",
            LoadPhase::FindingBeats => "finding beats",
        })
    }
}

/// Planar decoder output, one Vec per channel.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }
}

/// Beat/tempo analysis output from the feature-extraction collaborator.
#[derive(Clone, Debug, Default)]
pub struct Rhythm {
    pub bpm: f32,
    pub tick_seconds: Vec<f32>,
}

/// Beat/tempo collaborator. Optional on the engine; absence just leaves
/// the marker overlay empty.
pub trait RhythmExtractor: Send + Sync {
    fn extract_ticks(&self, samples: &[f32], sample_rate: u32) -> Result<Rhythm>;
}

/// Read-only playback consumer; receives every installed snapshot and the
/// playback rate scale. Must never mutate the buffer.
pub trait PlaybackSink: Send + Sync {
    fn set_buffer(&self, samples: Arc<Vec<f32>>, sample_rate: u32);
    fn set_rate(&self, rate: f32);
}

/// Decode an in-memory audio file into planar f32 channels.
pub fn decode_bytes(bytes: Vec<u8>, ext_hint: Option<&str>) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = ext_hint {
        hint.with_extension(ext);
    }
    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("probe audio container")?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .context("no default audio track")?
        .clone();
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("create decoder")?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut chans: Vec<Vec<f32>> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if sample_rate == 0 {
            sample_rate = decoded.spec().rate;
        }
        let channels = decoded.spec().channels.count().max(1);
        if chans.is_empty() {
            chans = vec![Vec::new(); channels];
        }
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buf.copy_interleaved_ref(decoded);
        for frame in buf.samples().chunks(channels) {
            for (ci, &v) in frame.iter().enumerate() {
                chans[ci].push(v);
            }
        }
    }
    if sample_rate == 0 {
        anyhow::bail!("unknown sample rate");
    }
    if chans.first().map(|c| c.is_empty()).unwrap_or(true) {
        anyhow::bail!("no audio frames decoded");
    }
    trace::event(
        "decode",
        format_args!(
            "sr={sample_rate} ch={} frames={}",
            chans.len(),
            chans[0].len()
        ),
    );
    Ok(DecodedAudio {
        channels: chans,
        sample_rate,
    })
}

/// Average two channels into one.
pub fn mix_to_mono(left: &[f32], right: &[f32]) -> Vec<f32> {
    let frames = left.len().min(right.len());
    let mut out = Vec::with_capacity(frames);
    for i in 0..frames {
        out.push((left[i] + right[i]) * 0.5);
    }
    out
}

/// Mean mixdown of any channel count.
pub fn mixdown(channels: &[Vec<f32>]) -> Vec<f32> {
    let count = channels.len();
    match count {
        0 => Vec::new(),
        1 => channels[0].clone(),
        2 => mix_to_mono(&channels[0], &channels[1]),
        _ => {
            let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
            let mut out = vec![0.0f32; frames];
            for ch in channels {
                for (o, &v) in out.iter_mut().zip(ch) {
                    *o += v;
                }
            }
            let inv = 1.0 / count as f32;
            for v in &mut out {
                *v *= inv;
            }
            out
        }
    }
}

/// Sinc-interpolated resample from `in_len` to `out_len` frames. The
/// contract requires even lengths; odd values are a caller error, logged
/// and truncated rather than surfaced. Internal resampler failures degrade
/// to the (trimmed) input.
pub fn resample(samples: &[f32], in_len: usize, out_len: usize) -> Vec<f32> {
    let mut in_len = in_len.min(samples.len());
    let mut out_len = out_len;
    if in_len % 2 != 0 || out_len % 2 != 0 {
        trace::event(
            "resample_odd_len",
            format_args!("in_len={in_len} out_len={out_len}"),
        );
        in_len -= in_len % 2;
        out_len -= out_len % 2;
    }
    if in_len == 0 || out_len == 0 {
        return Vec::new();
    }
    if in_len == out_len {
        return samples[..in_len].to_vec();
    }
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = out_len as f64 / in_len as f64;
    let mut resampler = match SincFixedIn::<f32>::new(ratio, 2.0, params, in_len, 1) {
        Ok(r) => r,
        Err(err) => {
            trace::event("resample_init_failed", format_args!("err={err}"));
            return samples[..in_len].to_vec();
        }
    };
    let waves_in = vec![samples[..in_len].to_vec()];
    let mut out = match resampler.process(&waves_in, None) {
        Ok(mut waves) => waves.pop().unwrap_or_default(),
        Err(err) => {
            trace::event("resample_failed", format_args!("err={err}"));
            return samples[..in_len].to_vec();
        }
    };
    out.resize(out_len, 0.0);
    out
}
