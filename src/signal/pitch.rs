//! Framewise F0 track via the McLeod pitch method.

use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;

/// Analysis window length in seconds (rounded up to a power of two in
/// samples; 64 ms captures two periods at the 50 Hz floor at 16 kHz).
const WINDOW_S: f64 = 0.064;

/// Minimum pitch in Hz (human vocal range)
const MIN_PITCH: f32 = 50.0;

/// Maximum pitch in Hz (human vocal range)
const MAX_PITCH: f32 = 500.0;

/// Power threshold for pitch detection
const POWER_THRESHOLD: f32 = 0.8;

/// Clarity threshold for pitch detection
const CLARITY_THRESHOLD: f32 = 0.5;

/// Compute the F0 value for each frame center `i * step`.
///
/// Frames whose window would run past the recording edges, and frames
/// with no clear pitch in the vocal range, are absent.
pub(crate) fn track(
    samples: &[f32],
    sample_rate: u32,
    frames: usize,
    step: f64,
) -> Vec<Option<f64>> {
    let window = ((sample_rate as f64 * WINDOW_S) as usize).next_power_of_two();
    if samples.len() < window {
        return vec![None; frames];
    }

    let mut detector = McLeodDetector::new(window, window / 2);
    let half = window / 2;
    let mut out = Vec::with_capacity(frames);

    for i in 0..frames {
        let center = (i as f64 * step * sample_rate as f64).round() as usize;
        if center < half || center + half > samples.len() {
            out.push(None);
            continue;
        }
        let frame = &samples[center - half..center + half];
        let value = detector
            .get_pitch(frame, sample_rate as usize, POWER_THRESHOLD, CLARITY_THRESHOLD)
            .map(|p| p.frequency)
            .filter(|f| (MIN_PITCH..=MAX_PITCH).contains(f))
            .map(f64::from);
        out.push(value);
    }

    out
}
