use std::io::Cursor;
use std::time::{Duration, Instant};

use wavecarve::audio_io;
use wavecarve::{CarverConfig, WaveCarver};

fn wav_bytes(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        let frames = channels[0].len();
        for i in 0..frames {
            for ch in channels {
                writer.write_sample(ch[i]).expect("write sample");
            }
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

fn poll_until(c: &mut WaveCarver, ready: impl Fn(&WaveCarver) -> bool) {
    let start = Instant::now();
    loop {
        c.poll_jobs();
        if ready(c) {
            return;
        }
        if start.elapsed() > Duration::from_secs(20) {
            panic!("job timeout");
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn decode_recovers_written_stereo_frames() {
    let left: Vec<f32> = (0..4410).map(|i| (i as f32 / 4410.0) * 0.5).collect();
    let right = vec![0.25f32; 4410];
    let bytes = wav_bytes(&[left, right], 44_100);
    let decoded = audio_io::decode_bytes(bytes, Some("wav")).expect("decode");
    assert_eq!(decoded.sample_rate, 44_100);
    assert_eq!(decoded.channels.len(), 2);
    assert_eq!(decoded.frames(), 4410);
    assert!((decoded.channels[1][100] - 0.25).abs() < 1e-6);
}

#[test]
fn decode_of_garbage_bytes_is_an_error() {
    assert!(audio_io::decode_bytes(vec![0u8; 64], Some("wav")).is_err());
}

#[test]
fn mix_to_mono_averages_the_channels() {
    let l = vec![1.0f32, 0.0, -1.0];
    let r = vec![0.0f32, 0.0, 1.0];
    assert_eq!(audio_io::mix_to_mono(&l, &r), vec![0.5, 0.0, 0.0]);
}

#[test]
fn mixdown_handles_any_channel_count() {
    assert!(audio_io::mixdown(&[]).is_empty());
    let one = audio_io::mixdown(&[vec![0.5, 0.5]]);
    assert_eq!(one, vec![0.5, 0.5]);
    let three = audio_io::mixdown(&[vec![0.9], vec![0.0], vec![0.0]]);
    assert!((three[0] - 0.3).abs() < 1e-6);
}

#[test]
fn resample_reaches_the_requested_even_length() {
    let samples: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.02).sin()).collect();
    let out = audio_io::resample(&samples, 4410, 8820);
    assert_eq!(out.len(), 8820);
    for v in &out {
        assert!(v.is_finite());
    }
}

#[test]
fn resample_trims_odd_lengths_instead_of_failing() {
    let samples: Vec<f32> = (0..4411).map(|i| (i as f32 * 0.02).sin()).collect();
    let out = audio_io::resample(&samples, 4411, 2206);
    assert_eq!(out.len(), 2206);
    let out = audio_io::resample(&samples, 4410, 2205);
    assert_eq!(out.len(), 2204);
}

#[test]
fn resample_of_nothing_is_nothing() {
    assert!(audio_io::resample(&[], 0, 512).is_empty());
    let samples = vec![0.5f32; 16];
    assert!(audio_io::resample(&samples, 16, 0).is_empty());
}

#[test]
fn load_bytes_runs_decode_mix_and_resample() {
    let mono: Vec<f32> = (0..22_050).map(|i| ((i as f32) * 0.05).sin() * 0.3).collect();
    let bytes = wav_bytes(&[mono.clone(), mono], 22_050);
    let mut c = WaveCarver::new(CarverConfig::default());
    c.load_bytes(bytes, Some("wav"));
    poll_until(&mut c, |c| !c.is_loading());
    assert_eq!(c.buffer().len(), 44_100);
    assert_eq!(c.sample_rate(), 44_100);
    assert_eq!(c.envelope().len(), 512);
    assert!((c.duration_seconds() - 1.0).abs() < 1e-6);
    poll_until(&mut c, |c| c.pyramid().is_some());
    assert!(c.status().is_none());
}

#[test]
fn load_failure_parks_the_status_at_the_decode_stage() {
    let mut c = WaveCarver::new(CarverConfig::default());
    c.load_samples(vec![0.5; 128], 44_100);
    c.load_bytes(vec![1, 2, 3, 4], Some("wav"));
    poll_until(&mut c, |c| !c.is_loading());
    let status = c.status().expect("failure status");
    assert!(status.starts_with("decoding failed"), "status: {status}");
    // the previous buffer is untouched by the failed load
    assert_eq!(c.buffer().len(), 128);
}
