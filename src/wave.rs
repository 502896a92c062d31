/// RMS of a sample slice. An empty slice yields 0 so degenerate buckets
/// render as a flat line instead of NaN.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for &v in samples {
        acc += (v as f64) * (v as f64);
    }
    (acc / samples.len() as f64).sqrt() as f32
}

/// Build the half-open source range for each output bucket: bucket `i`
/// covers `[floor(i*b), floor((i+1)*b))` clamped to `len`. Ranges can be
/// empty at the tail when `b` is fractional.
pub fn bucket_ranges(len: usize, bucket_size: f64, out_len: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(out_len);
    let b = if bucket_size.is_finite() && bucket_size > 0.0 {
        bucket_size
    } else {
        0.0
    };
    for i in 0..out_len {
        let i0 = ((i as f64) * b).floor() as usize;
        let i1 = (((i + 1) as f64) * b).floor() as usize;
        let i0 = i0.min(len);
        let i1 = i1.max(i0).min(len);
        out.push((i0, i1));
    }
    out
}

/// Compute the RMS of each range.
pub fn rms_over_ranges(samples: &[f32], ranges: &[(usize, usize)]) -> Vec<f32> {
    let mut out = Vec::with_capacity(ranges.len());
    for &(i0, i1) in ranges {
        let end = i1.min(samples.len());
        let start = i0.min(end);
        out.push(rms(&samples[start..end]));
    }
    out
}

/// Reduce `samples` to exactly `out_len` RMS buckets of fractional width
/// `bucket_size`. Pure and deterministic.
pub fn downsample_rms(samples: &[f32], bucket_size: f64, out_len: usize) -> Vec<f32> {
    rms_over_ranges(samples, &bucket_ranges(samples.len(), bucket_size, out_len))
}

/// Display range of an envelope. Empty input falls back to [-1, 1]; a flat
/// envelope is widened so it still renders as a centered line.
pub fn value_range(env: &[f32]) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &v in env {
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    if hi - lo < f32::EPSILON {
        return (lo - 1.0, lo + 1.0);
    }
    (lo, hi)
}

/// Causal moving average over a window of `size` samples.
fn moving_average(samples: &[f32], size: usize) -> Vec<f32> {
    if size <= 1 || samples.is_empty() {
        return samples.to_vec();
    }
    let mut out = Vec::with_capacity(samples.len());
    let mut acc = 0.0f64;
    for i in 0..samples.len() {
        acc += samples[i] as f64;
        if i >= size {
            acc -= samples[i - size] as f64;
        }
        let n = (i + 1).min(size);
        out.push((acc / n as f64) as f32);
    }
    out
}

/// Double-pass moving average with `radius` samples of wrap padding on both
/// ends, so a loop-continuous buffer stays continuous across the seam. The
/// filter delay of the two passes is sliced back off; output length equals
/// input length.
pub fn smooth_wrapped(samples: &[f32], radius: usize) -> Vec<f32> {
    let n = samples.len();
    if n == 0 || radius == 0 {
        return samples.to_vec();
    }
    let pad = radius.min(n);
    let mut temp = Vec::with_capacity(n + pad * 2);
    temp.extend_from_slice(&samples[n - pad..]);
    temp.extend_from_slice(samples);
    temp.extend_from_slice(&samples[..pad]);
    let filtered = moving_average(&moving_average(&temp, pad), pad);
    filtered[pad * 2..pad * 2 + n].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn tail_buckets_past_the_end_are_empty() {
        let ranges = bucket_ranges(4, 2.0, 4);
        assert_eq!(ranges, vec![(0, 2), (2, 4), (4, 4), (4, 4)]);
    }

    #[test]
    fn fractional_buckets_cover_the_buffer_without_overlap_gaps() {
        let ranges = bucket_ranges(10, 10.0 / 4.0, 4);
        assert_eq!(ranges.first(), Some(&(0, 2)));
        assert_eq!(ranges.last(), Some(&(7, 10)));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn smoothing_is_length_preserving() {
        let ramp: Vec<f32> = (0..33).map(|i| i as f32).collect();
        assert_eq!(smooth_wrapped(&ramp, 4).len(), 33);
        assert!(smooth_wrapped(&[], 4).is_empty());
    }
}
