//! Framewise intensity envelope in dB.
//!
//! RMS over a 50 ms window, expressed in dB against the 20 µPa auditory
//! reference applied to normalized sample amplitude, which places
//! conversational speech in the familiar 50-80 dB range. Silent frames
//! (at or below the reference) are absent rather than zero.

/// RMS window length in seconds.
const WINDOW_S: f64 = 0.05;

/// Auditory threshold reference for the dB scale.
const DB_REFERENCE: f64 = 2.0e-5;

/// Compute the intensity value for each frame center `i * step`.
pub(crate) fn track(
    samples: &[f32],
    sample_rate: u32,
    frames: usize,
    step: f64,
) -> Vec<Option<f64>> {
    let window = (sample_rate as f64 * WINDOW_S) as usize;
    let half = (window / 2).max(1);
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let center = (i as f64 * step * sample_rate as f64).round() as usize;
        let start = center.saturating_sub(half);
        let end = (center + half).min(samples.len());
        if end <= start {
            out.push(None);
            continue;
        }
        let frame = &samples[start..end];
        let energy: f64 = frame.iter().map(|&s| s as f64 * s as f64).sum();
        let rms = (energy / frame.len() as f64).sqrt();
        let db = 20.0 * (rms / DB_REFERENCE).log10();
        out.push(if db.is_finite() && db > 0.0 { Some(db) } else { None });
    }

    out
}
