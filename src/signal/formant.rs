//! Framewise F1/F2 tracks via Burg LPC.
//!
//! ## Algorithm
//! 1. Pre-emphasize the frame (first-order highpass from 50 Hz)
//! 2. Apply a Hamming window over a 25 ms frame
//! 3. Fit LPC coefficients with Burg's method
//! 4. Evaluate the LPC spectral envelope `1/|A(e^jw)|` on an FFT grid
//! 5. Pick the two lowest envelope peaks in the formant band and refine
//!    them with parabolic interpolation
//!
//! Frames below the energy floor, and frames where no resonance peak
//! stands out, report absent formants.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Analysis frame length in seconds.
const WINDOW_S: f64 = 0.025;

/// Pre-emphasis corner frequency in Hz.
const PRE_EMPHASIS_FROM_HZ: f64 = 50.0;

/// FFT size for envelope evaluation.
const ENVELOPE_FFT: usize = 1024;

/// Lowest admissible formant frequency in Hz.
const MIN_FORMANT_HZ: f64 = 90.0;

/// Highest admissible formant frequency in Hz.
const MAX_FORMANT_HZ: f64 = 5000.0;

/// RMS floor below which a frame is treated as silent.
const MIN_FRAME_RMS: f64 = 1.0e-4;

/// Envelope peaks below this fraction of the strongest peak are ripple,
/// not resonances.
const PEAK_FLOOR_RATIO: f64 = 0.02;

/// Compute F1 and F2 values for each frame center `i * step`.
pub(crate) fn tracks(
    samples: &[f32],
    sample_rate: u32,
    frames: usize,
    step: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let window = (sample_rate as f64 * WINDOW_S) as usize;
    let half = (window / 2).max(1);
    let order = lpc_order(sample_rate);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(ENVELOPE_FFT);

    let mut f1 = Vec::with_capacity(frames);
    let mut f2 = Vec::with_capacity(frames);

    for i in 0..frames {
        let center = (i as f64 * step * sample_rate as f64).round() as usize;
        if center < half || center + half > samples.len() {
            f1.push(None);
            f2.push(None);
            continue;
        }
        let frame = &samples[center - half..center + half];
        let (first, second) = match frame_formants(frame, sample_rate, order, fft.as_ref()) {
            Some(pair) => pair,
            None => (None, None),
        };
        f1.push(first);
        f2.push(second);
    }

    (f1, f2)
}

/// LPC order scaled with the sample rate (roughly one pole pair per
/// kilohertz of bandwidth, plus two for spectral tilt).
fn lpc_order(sample_rate: u32) -> usize {
    (sample_rate as usize / 1000 + 2).clamp(8, 30)
}

/// Estimate (F1, F2) for one frame. `None` when the frame is silent or
/// the LPC fit fails.
fn frame_formants(
    frame: &[f32],
    sample_rate: u32,
    order: usize,
    fft: &dyn rustfft::Fft<f64>,
) -> Option<(Option<f64>, Option<f64>)> {
    // Pre-emphasis then Hamming window.
    let alpha = (-2.0 * std::f64::consts::PI * PRE_EMPHASIS_FROM_HZ / sample_rate as f64).exp();
    let mut windowed = Vec::with_capacity(frame.len());
    let mut prev = 0.0f64;
    for (n, &s) in frame.iter().enumerate() {
        let x = s as f64;
        let emphasized = x - alpha * prev;
        prev = x;
        let w = 0.54
            - 0.46
                * (2.0 * std::f64::consts::PI * n as f64 / (frame.len() - 1) as f64).cos();
        windowed.push(emphasized * w);
    }

    let energy: f64 = windowed.iter().map(|v| v * v).sum();
    let rms = (energy / windowed.len() as f64).sqrt();
    if rms < MIN_FRAME_RMS {
        return None;
    }

    let coeffs = burg_lpc(&windowed, order)?;
    let peaks = envelope_peaks(&coeffs, sample_rate, fft);

    let first = peaks.first().copied();
    let second = peaks.get(1).copied();
    Some((first, second))
}

/// Burg's method: LPC coefficients `a[0..=order]` with `a[0] == 1`,
/// minimizing forward and backward prediction error.
fn burg_lpc(frame: &[f64], order: usize) -> Option<Vec<f64>> {
    let n = frame.len();
    if n <= order + 1 {
        return None;
    }

    let mut f = frame.to_vec();
    let mut b = frame.to_vec();
    let mut a = vec![0.0f64; order + 1];
    a[0] = 1.0;

    for m in 1..=order {
        let mut num = 0.0;
        let mut den = 0.0;
        for i in m..n {
            num += f[i] * b[i - 1];
            den += f[i] * f[i] + b[i - 1] * b[i - 1];
        }
        if den <= 0.0 || !den.is_finite() {
            return None;
        }
        let k = -2.0 * num / den;

        let prev = a.clone();
        for i in 1..=m {
            a[i] = prev[i] + k * prev[m - i];
        }

        // Update errors from the back so b[i - 1] is still the old value.
        for i in (m..n).rev() {
            let fi = f[i];
            f[i] += k * b[i - 1];
            b[i] = b[i - 1] + k * fi;
        }
    }

    if a.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(a)
}

/// Peaks of the LPC envelope inside the formant band, ascending in
/// frequency, refined by parabolic interpolation.
fn envelope_peaks(coeffs: &[f64], sample_rate: u32, fft: &dyn rustfft::Fft<f64>) -> Vec<f64> {
    let mut buf = vec![Complex::new(0.0, 0.0); ENVELOPE_FFT];
    for (slot, &c) in buf.iter_mut().zip(coeffs.iter()) {
        *slot = Complex::new(c, 0.0);
    }
    fft.process(&mut buf);

    let envelope: Vec<f64> = buf
        .iter()
        .take(ENVELOPE_FFT / 2)
        .map(|c| 1.0 / (c.norm() + 1.0e-12))
        .collect();

    let bin_hz = sample_rate as f64 / ENVELOPE_FFT as f64;
    let k_min = ((MIN_FORMANT_HZ / bin_hz).ceil() as usize).max(1);
    let k_max = ((MAX_FORMANT_HZ / bin_hz).floor() as usize).min(envelope.len() - 2);
    if k_min >= k_max {
        return Vec::new();
    }

    let tallest = envelope[k_min..=k_max]
        .iter()
        .fold(0.0f64, |m, &v| m.max(v));
    let floor = tallest * PEAK_FLOOR_RATIO;

    let mut peaks = Vec::new();
    for k in k_min..=k_max {
        let here = envelope[k];
        if here > envelope[k - 1] && here >= envelope[k + 1] && here >= floor {
            peaks.push(refine_peak(&envelope, k) * bin_hz);
            if peaks.len() == 2 {
                break;
            }
        }
    }
    peaks
}

/// Parabolic interpolation of a peak position on the log envelope.
fn refine_peak(envelope: &[f64], k: usize) -> f64 {
    let (l, c, r) = (
        envelope[k - 1].ln(),
        envelope[k].ln(),
        envelope[k + 1].ln(),
    );
    let denom = l - 2.0 * c + r;
    if denom.abs() < 1.0e-12 {
        return k as f64;
    }
    let delta = 0.5 * (l - r) / denom;
    if delta.is_finite() && delta.abs() < 1.0 {
        k as f64 + delta
    } else {
        k as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Two-resonance signal approximating a vowel's F1/F2.
    fn generate_vowel(sample_rate: u32, seconds: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * PI * 700.0 * t).sin() * 0.4 + (2.0 * PI * 1200.0 * t).sin() * 0.3
            })
            .collect()
    }

    #[test]
    fn test_vowel_like_signal_yields_two_resonances() {
        let samples = generate_vowel(16000, 1.0);
        let (f1, f2) = tracks(&samples, 16000, 100, 0.01);

        let first = f1[50].expect("F1 in a voiced frame");
        let second = f2[50].expect("F2 in a voiced frame");
        assert!((first - 700.0).abs() < 120.0, "F1 {first}");
        assert!((second - 1200.0).abs() < 150.0, "F2 {second}");
        assert!(first < second);
    }

    #[test]
    fn test_silence_has_no_formants() {
        let samples = vec![0.0f32; 16000];
        let (f1, f2) = tracks(&samples, 16000, 100, 0.01);
        assert!(f1.iter().all(|v| v.is_none()));
        assert!(f2.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_formants_stay_in_search_band() {
        let samples = generate_vowel(16000, 1.0);
        let (f1, f2) = tracks(&samples, 16000, 100, 0.01);

        for v in f1.iter().chain(f2.iter()).flatten() {
            assert!(*v >= MIN_FORMANT_HZ && *v <= MAX_FORMANT_HZ, "out of band: {v}");
        }
    }

    #[test]
    fn test_lpc_order_scales_with_rate() {
        assert_eq!(lpc_order(16000), 18);
        assert_eq!(lpc_order(8000), 10);
        assert_eq!(lpc_order(48000), 30);
    }

    #[test]
    fn test_burg_rejects_degenerate_input() {
        assert!(burg_lpc(&[0.0; 8], 10).is_none());
        assert!(burg_lpc(&[0.0; 64], 10).is_none());
    }
}
