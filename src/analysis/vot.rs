//! Voice Onset Time for the plosive-initial target words.
//!
//! ## Concept
//! VOT is the delay between a plosive's release burst and the onset of
//! voicing; lengthened VOT is a marker of reduced articulatory
//! precision.
//!
//! ## Algorithm
//! Per occurrence of a target word lasting at least 50 ms:
//! 1. Scan the burst window (first 150 ms or 40% of the word,
//!    whichever is shorter) at 5 ms steps; the burst is the loudest
//!    sample, earliest on ties
//! 2. Scan from the burst to the word end at 10 ms steps for the first
//!    voiced pitch sample; no voicing means onset at the word end
//! 3. Report `round(max(0, onset - burst) * 1000)` milliseconds

use std::collections::BTreeMap;

use crate::analysis::utterance::Utterance;
use crate::signal::SignalProvider;

/// Words whose initial plosive is measured.
const TARGET_WORDS: [&str; 3] = ["quick", "brown", "jumps"];

/// Minimum word length considered measurable.
const MIN_WORD_S: f64 = 0.05;

/// Burst window cap in seconds.
const MAX_BURST_WINDOW_S: f64 = 0.15;

/// Burst window as a fraction of the word length.
const BURST_WINDOW_FRACTION: f64 = 0.4;

/// Step of the burst intensity scan.
const BURST_SCAN_STEP_S: f64 = 0.005;

/// Step of the voicing onset scan.
const VOICING_SCAN_STEP_S: f64 = 0.01;

/// Measure VOT in milliseconds for each target word occurrence.
///
/// Words shorter than 50 ms, and words outside the target set, get no
/// entry. A later occurrence of the same word replaces the earlier one.
pub fn voice_onset_times(
    signal: &dyn SignalProvider,
    utterance: &Utterance,
) -> BTreeMap<String, u32> {
    let mut results = BTreeMap::new();

    for word in utterance.words() {
        if !TARGET_WORDS.contains(&word.word.as_str()) {
            continue;
        }
        let length = word.end - word.start;
        if length < MIN_WORD_S {
            continue;
        }

        let search_end = word.start + MAX_BURST_WINDOW_S.min(length * BURST_WINDOW_FRACTION);

        // Loudest sample in the burst window; strict > keeps the
        // earliest on ties. Absent samples are skipped.
        let mut burst_time = word.start;
        let mut max_intensity = f64::NEG_INFINITY;
        let mut t = word.start;
        while t < search_end {
            if let Some(v) = signal.intensity(t).filter(|v| v.is_finite()) {
                if v > max_intensity {
                    max_intensity = v;
                    burst_time = t;
                }
            }
            t += BURST_SCAN_STEP_S;
        }

        // First voiced sample from the burst onward; none means the
        // voicing never arrived inside the word.
        let mut voicing_time = word.end;
        let mut t = burst_time;
        while t < word.end {
            if signal
                .pitch(t)
                .filter(|f0| f0.is_finite() && *f0 > 0.0)
                .is_some()
            {
                voicing_time = t;
                break;
            }
            t += VOICING_SCAN_STEP_S;
        }

        let vot_ms = ((voicing_time - burst_time) * 1000.0).max(0.0);
        results.insert(word.word.clone(), vot_ms.round() as u32);
    }

    results
}
