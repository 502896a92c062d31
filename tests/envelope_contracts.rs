use wavecarve::wave;

#[test]
fn downsample_returns_exact_output_length() {
    for (len, out_len) in [(0usize, 7usize), (3, 8), (1000, 512), (4096, 512), (513, 512)] {
        let buf: Vec<f32> = (0..len).map(|i| (i as f32 * 0.01).sin()).collect();
        let bucket = len as f64 / out_len as f64;
        let env = wave::downsample_rms(&buf, bucket, out_len);
        assert_eq!(env.len(), out_len, "len={len} out_len={out_len}");
    }
}

#[test]
fn empty_buckets_yield_zero_not_nan() {
    // many more buckets than samples forces empty ranges from rounding
    let buf = vec![0.5f32; 3];
    let env = wave::downsample_rms(&buf, 3.0 / 16.0, 16);
    assert_eq!(env.len(), 16);
    for v in &env {
        assert!(v.is_finite());
        assert!(*v >= 0.0);
    }
    // buckets entirely past the end of the buffer
    let env = wave::downsample_rms(&[1.0, 1.0, 1.0, 1.0], 2.0, 4);
    assert_eq!(env, vec![1.0, 1.0, 0.0, 0.0]);
}

#[test]
fn downsample_is_deterministic_and_pure() {
    let buf: Vec<f32> = (0..2048).map(|i| ((i % 100) as f32 / 50.0) - 1.0).collect();
    let before = buf.clone();
    let a = wave::downsample_rms(&buf, 4.0, 512);
    let b = wave::downsample_rms(&buf, 4.0, 512);
    assert_eq!(a, b);
    assert_eq!(buf, before);
}

#[test]
fn constant_signal_rms_matches_its_amplitude() {
    let buf = vec![0.5f32; 512];
    for v in wave::downsample_rms(&buf, 4.0, 128) {
        assert!((v - 0.5).abs() < 1e-6);
    }
}

#[test]
fn alternating_sign_signal_has_positive_rms() {
    let buf: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
    for v in wave::downsample_rms(&buf, 8.0, 32) {
        assert!((v - 0.5).abs() < 1e-6);
    }
}

#[test]
fn value_range_falls_back_for_empty_and_flat_input() {
    assert_eq!(wave::value_range(&[]), (-1.0, 1.0));
    let (lo, hi) = wave::value_range(&[0.3, 0.3, 0.3]);
    assert!(lo < 0.3 && 0.3 < hi);
    let (lo, hi) = wave::value_range(&[0.1, 0.9, 0.4]);
    assert_eq!((lo, hi), (0.1, 0.9));
}

#[test]
fn smoothing_keeps_constants_fixed() {
    let buf = vec![0.25f32; 64];
    let out = wave::smooth_wrapped(&buf, 4);
    assert_eq!(out.len(), 64);
    for v in out {
        assert!((v - 0.25).abs() < 1e-6);
    }
}

#[test]
fn smoothing_reduces_a_spike_without_changing_length() {
    let mut buf = vec![0.0f32; 64];
    buf[32] = 1.0;
    let out = wave::smooth_wrapped(&buf, 4);
    assert_eq!(out.len(), 64);
    assert!(out[32] < 1.0);
    let total: f32 = out.iter().map(|v| v.abs()).sum();
    assert!(total > 0.0);
}
