//! Vowel space: midpoint F1/F2 of the corner-vowel carrier words.
//!
//! "fox" and "lazy" carry vowels near opposite corners of the vowel
//! quadrilateral; their midpoint formants sketch how much articulatory
//! space the speaker uses. Missing words or invalid samples simply omit
//! the corresponding keys.

use std::collections::BTreeMap;

use crate::analysis::utterance::Utterance;
use crate::signal::SignalProvider;

/// Words whose vowel midpoints are sampled, first occurrence only.
const VOWEL_WORDS: [&str; 2] = ["fox", "lazy"];

/// Sample F1/F2 at each carrier word's midpoint.
pub fn vowel_space(signal: &dyn SignalProvider, utterance: &Utterance) -> BTreeMap<String, u32> {
    let mut result = BTreeMap::new();

    for target in VOWEL_WORDS {
        let Some(word) = utterance.words().iter().find(|w| w.word == target) else {
            continue;
        };
        let mid = (word.start + word.end) / 2.0;
        let f1 = signal.formant(1, mid).filter(|v| v.is_finite() && *v > 0.0);
        let f2 = signal.formant(2, mid).filter(|v| v.is_finite() && *v > 0.0);
        if let (Some(f1), Some(f2)) = (f1, f2) {
            result.insert(format!("{target}_F1"), f1.round() as u32);
            result.insert(format!("{target}_F2"), f2.round() as u32);
        }
    }

    result
}
