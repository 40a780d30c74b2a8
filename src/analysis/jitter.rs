//! Amplitude jitter: short-timescale irregularity of the loudness
//! envelope.
//!
//! The intensity curve is sampled on a 20 ms grid over the whole
//! recording; jitter is the standard deviation of the absolute
//! successive differences, normalized by the mean level so the measure
//! is independent of overall gain. Fewer than five surviving samples
//! reads as no measurable jitter.

use crate::analysis::round_places;
use crate::signal::SignalProvider;

/// Intensity sampling step over the recording.
const SAMPLE_STEP_S: f64 = 0.02;

/// Minimum surviving samples for a meaningful estimate.
const MIN_SAMPLES: usize = 5;

/// Compute amplitude jitter, 4 decimals.
pub fn amplitude_jitter(signal: &dyn SignalProvider) -> f64 {
    let duration = signal.duration();
    let mut values = Vec::new();
    let mut t = 0.0;
    while t < duration {
        if let Some(v) = signal.intensity(t).filter(|v| v.is_finite() && *v > 0.0) {
            values.push(v);
        }
        t += SAMPLE_STEP_S;
    }

    if values.len() < MIN_SAMPLES {
        return 0.0;
    }

    let diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    round_places(stddev(&diffs) / mean, 4)
}

/// Population standard deviation.
fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
