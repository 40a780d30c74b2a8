//! Biomarker extraction and scoring pipeline.
//!
//! Five stateless extractors run over one `(SignalProvider, Utterance)`
//! pair; none depends on another's output, so their order is free. The
//! scorer folds the resulting bundle and the recording duration into
//! the composite 0-10 score.

pub mod jitter;
pub mod prosody;
pub mod score;
pub mod transition;
pub mod utterance;
pub mod vot;
pub mod vowel_space;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::signal::SignalProvider;

pub use jitter::amplitude_jitter;
pub use prosody::{prosodic_decay, ProsodicDecay};
pub use score::composite_score;
pub use transition::transition_stability;
pub use utterance::{Utterance, WordBoundary};
pub use vot::voice_onset_times;
pub use vowel_space::vowel_space;

/// The elicitation phrase every recording is expected to read.
pub const REFERENCE_PHRASE: [&str; 9] = [
    "the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog",
];

/// One recording's biomarkers. Built fresh per request, never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBundle {
    /// Voice onset time per target word, in milliseconds.
    pub vot: BTreeMap<String, u32>,
    /// Formant transition stability in [0, 1].
    pub transition_stability: f64,
    /// Loudness and rate drop across the phrase.
    pub prosodic_decay: ProsodicDecay,
    /// Midpoint formants of the corner-vowel words, in Hz.
    pub vowel_space: BTreeMap<String, u32>,
    /// Loudness envelope irregularity, >= 0.
    pub amplitude_jitter: f64,
}

/// Complete analysis result for one recording; doubles as the HTTP
/// response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Composite score in [0, 10], lower is better.
    pub score: f64,
    /// Recording duration in seconds, 1 decimal.
    pub duration: f64,
    pub metrics: MetricsBundle,
    pub word_boundaries: Vec<WordBoundary>,
}

/// Run the five extractors and the scorer over one recording.
pub fn run(signal: &dyn SignalProvider, utterance: &Utterance) -> AnalysisReport {
    let metrics = MetricsBundle {
        vot: voice_onset_times(signal, utterance),
        transition_stability: transition_stability(signal, utterance),
        prosodic_decay: prosodic_decay(signal, utterance),
        vowel_space: vowel_space(signal, utterance),
        amplitude_jitter: amplitude_jitter(signal),
    };

    let duration = signal.duration();
    let score = composite_score(&metrics, duration);
    debug!(
        "analysis complete: score {}, {}/{} reference words recognized",
        score,
        phrase_coverage(utterance),
        REFERENCE_PHRASE.len() - 1 // "the" appears twice
    );

    AnalysisReport {
        score,
        duration: round_places(duration, 1),
        metrics,
        word_boundaries: utterance.words().to_vec(),
    }
}

/// How many distinct reference words the utterance contains.
pub fn phrase_coverage(utterance: &Utterance) -> usize {
    let mut distinct = REFERENCE_PHRASE.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
        .into_iter()
        .filter(|target| utterance.words().iter().any(|w| w.word == *target))
        .count()
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
