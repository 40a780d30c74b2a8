//! Formant transition stability across the fox-jumps gap.
//!
//! ## Concept
//! A sharp, fast formant movement between the vowel of "fox" and the
//! onset of "jumps" indicates well-controlled articulation; sluggish
//! transitions flatten the slope. The combined F1/F2 endpoint slope is
//! normalized into [0, 1].
//!
//! The transition window pairs the first "jumps" that follows a "fox"
//! with the most recent "fox" before it. An invalid ordering, or too
//! few valid formant samples, yields the neutral fallback.

use crate::analysis::round_places;
use crate::analysis::utterance::Utterance;
use crate::signal::SignalProvider;

/// Returned when no usable transition window exists.
const NEUTRAL_STABILITY: f64 = 0.5;

/// Formant sampling step across the transition window.
const SAMPLE_STEP_S: f64 = 0.005;

/// Minimum number of valid formant samples.
const MIN_SAMPLES: usize = 3;

/// Minimum time span covered by the kept samples.
const MIN_SPAN_S: f64 = 0.02;

/// Slope sum mapping to a stability of 1.0 (Hz per second).
const SLOPE_NORMALIZATION: f64 = 20000.0;

/// Compute transition stability in [0, 1], 3 decimals.
pub fn transition_stability(signal: &dyn SignalProvider, utterance: &Utterance) -> f64 {
    let mut fox_end: Option<f64> = None;
    let mut jumps_start: Option<f64> = None;
    for word in utterance.words() {
        match word.word.as_str() {
            "fox" => fox_end = Some(word.end),
            "jumps" if fox_end.is_some() => {
                jumps_start = Some(word.start);
                break;
            }
            _ => {}
        }
    }

    let (fox_end, jumps_start) = match (fox_end, jumps_start) {
        (Some(f), Some(j)) if j > f => (f, j),
        _ => return NEUTRAL_STABILITY,
    };

    let mut times = Vec::new();
    let mut f1_values = Vec::new();
    let mut f2_values = Vec::new();
    let mut t = fox_end;
    while t <= jumps_start {
        let f1 = signal.formant(1, t).filter(|v| v.is_finite() && *v > 0.0);
        let f2 = signal.formant(2, t).filter(|v| v.is_finite() && *v > 0.0);
        if let (Some(f1), Some(f2)) = (f1, f2) {
            times.push(t);
            f1_values.push(f1);
            f2_values.push(f2);
        }
        t += SAMPLE_STEP_S;
    }

    if times.len() < MIN_SAMPLES {
        return NEUTRAL_STABILITY;
    }
    let span = times[times.len() - 1] - times[0];
    if span < MIN_SPAN_S {
        return NEUTRAL_STABILITY;
    }

    let f1_slope = (f1_values[f1_values.len() - 1] - f1_values[0]).abs() / span;
    let f2_slope = (f2_values[f2_values.len() - 1] - f2_values[0]).abs() / span;
    let stability = ((f1_slope + f2_slope) / SLOPE_NORMALIZATION).min(1.0);
    round_places(stability, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::utterance::WordBoundary;

    /// Linear formant ramps over the whole recording.
    struct RampSignal {
        duration: f64,
        f1_per_s: f64,
        f2_per_s: f64,
    }

    impl SignalProvider for RampSignal {
        fn duration(&self) -> f64 {
            self.duration
        }
        fn pitch(&self, _t: f64) -> Option<f64> {
            None
        }
        fn intensity(&self, _t: f64) -> Option<f64> {
            None
        }
        fn formant(&self, index: usize, t: f64) -> Option<f64> {
            match index {
                1 => Some(400.0 + self.f1_per_s * t),
                2 => Some(1200.0 + self.f2_per_s * t),
                _ => None,
            }
        }
        fn average_intensity(&self, _t0: f64, _t1: f64) -> Option<f64> {
            None
        }
    }

    struct NoFormants;
    impl SignalProvider for NoFormants {
        fn duration(&self) -> f64 {
            4.0
        }
        fn pitch(&self, _t: f64) -> Option<f64> {
            None
        }
        fn intensity(&self, _t: f64) -> Option<f64> {
            None
        }
        fn formant(&self, _index: usize, _t: f64) -> Option<f64> {
            None
        }
        fn average_intensity(&self, _t0: f64, _t1: f64) -> Option<f64> {
            None
        }
    }

    fn word(text: &str, start: f64, end: f64) -> WordBoundary {
        WordBoundary {
            word: text.to_string(),
            start,
            end,
        }
    }

    fn fox_jumps(fox_end: f64, jumps_start: f64) -> Utterance {
        Utterance::from_words(
            vec![
                word("fox", fox_end - 0.3, fox_end),
                word("jumps", jumps_start, jumps_start + 0.3),
            ],
            4.0,
        )
    }

    #[test]
    fn test_steep_transition_maps_to_slope_over_normalizer() {
        // F1 slope 2000 Hz/s + F2 slope 3000 Hz/s over a 100 ms window
        // -> 5000 / 20000 = 0.25.
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 2000.0,
            f2_per_s: 3000.0,
        };
        let stability = transition_stability(&signal, &fox_jumps(1.0, 1.1));
        assert!((stability - 0.25).abs() < 1e-9, "got {stability}");
    }

    #[test]
    fn test_stability_is_capped_at_one() {
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 300000.0,
            f2_per_s: 300000.0,
        };
        let stability = transition_stability(&signal, &fox_jumps(1.0, 1.1));
        assert_eq!(stability, 1.0);
    }

    #[test]
    fn test_jumps_before_fox_end_is_neutral() {
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 2000.0,
            f2_per_s: 3000.0,
        };
        // jumps starts at 1.9 while fox ends at 2.0.
        let utt = Utterance::from_words(
            vec![word("fox", 1.7, 2.0), word("jumps", 1.9, 2.2)],
            4.0,
        );
        assert_eq!(transition_stability(&signal, &utt), 0.5);
    }

    #[test]
    fn test_missing_words_are_neutral() {
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 2000.0,
            f2_per_s: 3000.0,
        };
        let utt = Utterance::from_words(vec![word("fox", 1.0, 1.3)], 4.0);
        assert_eq!(transition_stability(&signal, &utt), 0.5);

        let utt = Utterance::from_words(vec![word("jumps", 1.0, 1.3)], 4.0);
        assert_eq!(transition_stability(&signal, &utt), 0.5);
    }

    #[test]
    fn test_jumps_without_preceding_fox_is_neutral() {
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 2000.0,
            f2_per_s: 3000.0,
        };
        let utt = Utterance::from_words(
            vec![word("jumps", 0.5, 0.8), word("fox", 1.0, 1.3)],
            4.0,
        );
        assert_eq!(transition_stability(&signal, &utt), 0.5);
    }

    #[test]
    fn test_too_few_formant_samples_is_neutral() {
        assert_eq!(transition_stability(&NoFormants, &fox_jumps(1.0, 1.1)), 0.5);
    }

    #[test]
    fn test_too_narrow_span_is_neutral() {
        let signal = RampSignal {
            duration: 4.0,
            f1_per_s: 2000.0,
            f2_per_s: 3000.0,
        };
        // Window of 12 ms: three samples survive but the span is under
        // the 20 ms floor.
        let stability = transition_stability(&signal, &fox_jumps(1.0, 1.012));
        assert_eq!(stability, 0.5);
    }

    #[test]
    fn test_result_is_within_unit_interval() {
        for slope in [0.0, 500.0, 5000.0, 50000.0, 500000.0] {
            let signal = RampSignal {
                duration: 4.0,
                f1_per_s: slope,
                f2_per_s: slope,
            };
            let stability = transition_stability(&signal, &fox_jumps(1.0, 1.2));
            assert!((0.0..=1.0).contains(&stability), "slope {slope} -> {stability}");
        }
    }
}
