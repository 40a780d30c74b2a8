//! Prosodic decay: loudness and speaking-rate drop across the phrase.
//!
//! Compares the first three words against the last three. Decay is the
//! relative drop, clamped at zero so a stronger finish never scores as
//! a bonus. Utterances under six words report no decay.

use serde::{Deserialize, Serialize};

use crate::analysis::round_places;
use crate::analysis::utterance::{Utterance, WordBoundary};
use crate::signal::SignalProvider;

/// Words required before first/last groups stop overlapping.
const MIN_WORDS: usize = 6;

/// Words per comparison group.
const GROUP_SIZE: usize = 3;

/// Relative drop in intensity and speaking rate from the start of the
/// utterance to its end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsodicDecay {
    /// Relative loudness drop, >= 0.
    pub amplitude_decay: f64,
    /// Relative speaking-rate drop, >= 0.
    pub rate_decay: f64,
}

/// Compute prosodic decay, 3 decimals per component.
pub fn prosodic_decay(signal: &dyn SignalProvider, utterance: &Utterance) -> ProsodicDecay {
    let words = utterance.words();
    if words.len() < MIN_WORDS {
        return ProsodicDecay::default();
    }

    let (first_amp, first_rate) = group_metrics(signal, &words[..GROUP_SIZE]);
    let (last_amp, last_rate) = group_metrics(signal, &words[words.len() - GROUP_SIZE..]);

    ProsodicDecay {
        amplitude_decay: round_places(relative_drop(first_amp, last_amp), 3),
        rate_decay: round_places(relative_drop(first_rate, last_rate), 3),
    }
}

/// Average intensity (dB, 0 when absent) and speaking rate (words per
/// second) over one word group.
fn group_metrics(signal: &dyn SignalProvider, group: &[WordBoundary]) -> (f64, f64) {
    let start = group[0].start;
    let end = group[group.len() - 1].end;
    let span = end - start;

    let amplitude = signal
        .average_intensity(start, end)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    let rate = if span > 0.0 {
        group.len() as f64 / span
    } else {
        0.0
    };
    (amplitude, rate)
}

fn relative_drop(first: f64, last: f64) -> f64 {
    if first > 0.0 {
        ((first - last) / first).max(0.0)
    } else {
        0.0
    }
}
