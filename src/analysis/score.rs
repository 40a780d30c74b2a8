//! Composite motor-speech score.
//!
//! Deterministic additive thresholds over the five biomarkers plus the
//! duration ratio against the 4-second reference reading, clamped to
//! [0, 10] and rounded to one decimal. Lower is better.

use crate::analysis::round_places;
use crate::analysis::MetricsBundle;

/// Mean VOT assumed when no target word was measurable.
const DEFAULT_MEAN_VOT_MS: f64 = 50.0;

/// Reference reading duration in seconds.
const REFERENCE_DURATION_S: f64 = 4.0;

/// Upper bound of the score scale.
const MAX_SCORE: f64 = 10.0;

/// Combine the metrics bundle and recording duration into the 0-10
/// composite score.
pub fn composite_score(metrics: &MetricsBundle, duration: f64) -> f64 {
    let mut score: f64 = 0.0;

    let mean_vot = if metrics.vot.is_empty() {
        DEFAULT_MEAN_VOT_MS
    } else {
        metrics.vot.values().map(|&v| v as f64).sum::<f64>() / metrics.vot.len() as f64
    };
    if mean_vot > 80.0 {
        score += 2.5;
    } else if mean_vot > 60.0 {
        score += 1.5;
    } else if mean_vot > 45.0 {
        score += 0.5;
    }

    if metrics.transition_stability < 0.3 {
        score += 2.0;
    } else if metrics.transition_stability < 0.5 {
        score += 1.0;
    }

    if metrics.prosodic_decay.amplitude_decay > 0.25 {
        score += 2.0;
    } else if metrics.prosodic_decay.amplitude_decay > 0.15 {
        score += 1.0;
    }

    if metrics.amplitude_jitter > 0.06 {
        score += 2.0;
    } else if metrics.amplitude_jitter > 0.04 {
        score += 1.0;
    }

    let duration_ratio = if duration > 0.0 {
        duration / REFERENCE_DURATION_S
    } else {
        1.0
    };
    if !(0.5..=2.0).contains(&duration_ratio) {
        score += 1.0;
    }

    round_places(score.clamp(0.0, MAX_SCORE), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProsodicDecay;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn metrics(
        vot: &[(&str, u32)],
        stability: f64,
        amplitude_decay: f64,
        jitter: f64,
    ) -> MetricsBundle {
        MetricsBundle {
            vot: vot
                .iter()
                .map(|&(w, v)| (w.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
            transition_stability: stability,
            prosodic_decay: ProsodicDecay {
                amplitude_decay,
                rate_decay: 0.0,
            },
            vowel_space: BTreeMap::new(),
            amplitude_jitter: jitter,
        }
    }

    #[test]
    fn test_every_risk_signal_firing_sums_up() {
        // Mean VOT 90, stability 0.2, amplitude decay 0.3, jitter 0.07,
        // duration exactly on reference: 2.5 + 2 + 2 + 2 + 0 = 8.5.
        let m = metrics(&[("quick", 90)], 0.2, 0.3, 0.07);
        assert_eq!(composite_score(&m, 4.0), 8.5);
    }

    #[test]
    fn test_healthy_reading_scores_zero() {
        let m = metrics(&[("quick", 30), ("brown", 40)], 0.8, 0.05, 0.01);
        assert_eq!(composite_score(&m, 4.0), 0.0);
    }

    #[test]
    fn test_missing_vot_defaults_to_mid_band() {
        // Default mean of 50 sits in the >45 band: +0.5.
        let m = metrics(&[], 0.8, 0.0, 0.0);
        assert_eq!(composite_score(&m, 4.0), 0.5);
    }

    #[test]
    fn test_vot_threshold_bands() {
        for (vot, expected) in [(45, 0.0), (46, 0.5), (61, 1.5), (81, 2.5)] {
            let m = metrics(&[("quick", vot)], 0.8, 0.0, 0.0);
            assert_eq!(composite_score(&m, 4.0), expected, "vot {vot}");
        }
    }

    #[test]
    fn test_extreme_duration_adds_a_point() {
        let m = metrics(&[("quick", 30)], 0.8, 0.0, 0.0);
        assert_eq!(composite_score(&m, 1.9), 1.0); // ratio < 0.5
        assert_eq!(composite_score(&m, 8.1), 1.0); // ratio > 2
        assert_eq!(composite_score(&m, 2.0), 0.0); // ratio exactly 0.5
        assert_eq!(composite_score(&m, 8.0), 0.0); // ratio exactly 2
    }

    #[test]
    fn test_score_never_exceeds_ten() {
        let m = metrics(&[("quick", 200)], 0.0, 0.9, 0.5);
        let score = composite_score(&m, 30.0);
        assert!(score <= 10.0);
        // All bands firing: 2.5 + 2 + 2 + 2 + 1 = 9.5.
        assert_eq!(score, 9.5);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(
            vot in 0u32..400,
            stability in 0.0f64..1.0,
            decay in 0.0f64..1.0,
            jitter in 0.0f64..0.5,
            duration in 1.0f64..20.0,
        ) {
            let m = metrics(&[("quick", vot)], stability, decay, jitter);
            let score = composite_score(&m, duration);
            prop_assert!((0.0..=10.0).contains(&score));
        }

        #[test]
        fn prop_higher_vot_never_lowers_score(
            a in 0u32..400,
            b in 0u32..400,
            stability in 0.0f64..1.0,
            decay in 0.0f64..1.0,
            jitter in 0.0f64..0.5,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = composite_score(&metrics(&[("quick", lo)], stability, decay, jitter), 4.0);
            let high = composite_score(&metrics(&[("quick", hi)], stability, decay, jitter), 4.0);
            prop_assert!(high >= low);
        }

        #[test]
        fn prop_lower_stability_never_lowers_score(
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
            jitter in 0.0f64..0.5,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let at_low = composite_score(&metrics(&[], lo, 0.0, jitter), 4.0);
            let at_high = composite_score(&metrics(&[], hi, 0.0, jitter), 4.0);
            prop_assert!(at_low >= at_high);
        }
    }
}
