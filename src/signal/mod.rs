//! Time-indexed acoustic readout.
//!
//! The feature extractors consume the [`SignalProvider`] trait only: a
//! narrow read-only view of the pitch, intensity, and formant curves of
//! one recording. Every query is `Option`-returning; out-of-range,
//! unvoiced, and numerically invalid readings are reported as absent,
//! never as zero, and callers skip absent samples.
//!
//! [`AcousticTracks`] is the default implementation. It computes all
//! curves once on a shared 10 ms frame grid and answers queries by
//! nearest-frame lookup.

pub mod formant;
pub mod intensity;
pub mod pitch;

/// Spacing of the shared analysis frame grid, in seconds.
const FRAME_STEP_S: f64 = 0.01;

/// Read-only, time-indexed view of a recording's acoustic curves.
pub trait SignalProvider {
    /// Total duration of the recording in seconds.
    fn duration(&self) -> f64;

    /// Fundamental frequency in Hz at time `t`, absent when unvoiced.
    fn pitch(&self, t: f64) -> Option<f64>;

    /// Intensity in dB at time `t`, absent in silence.
    fn intensity(&self, t: f64) -> Option<f64>;

    /// Formant `index` (1 or 2) frequency in Hz at time `t`.
    fn formant(&self, index: usize, t: f64) -> Option<f64>;

    /// Mean intensity in dB over `[t0, t1]`, absent when no frame falls
    /// in the range.
    fn average_intensity(&self, t0: f64, t1: f64) -> Option<f64>;
}

/// Precomputed pitch, intensity, and formant tracks on a 10 ms grid.
pub struct AcousticTracks {
    duration: f64,
    step: f64,
    pitch: Vec<Option<f64>>,
    intensity: Vec<Option<f64>>,
    f1: Vec<Option<f64>>,
    f2: Vec<Option<f64>>,
}

impl AcousticTracks {
    /// Analyze a mono recording into frame tracks.
    pub fn analyze(samples: &[f32], sample_rate: u32) -> Self {
        let duration = samples.len() as f64 / sample_rate as f64;
        let frames = (duration / FRAME_STEP_S).ceil() as usize;

        let pitch = pitch::track(samples, sample_rate, frames, FRAME_STEP_S);
        let intensity = intensity::track(samples, sample_rate, frames, FRAME_STEP_S);
        let (f1, f2) = formant::tracks(samples, sample_rate, frames, FRAME_STEP_S);

        Self {
            duration,
            step: FRAME_STEP_S,
            pitch,
            intensity,
            f1,
            f2,
        }
    }

    fn frame_at(&self, t: f64) -> Option<usize> {
        if !t.is_finite() || t < 0.0 || t >= self.duration {
            return None;
        }
        let idx = (t / self.step).round() as usize;
        Some(idx.min(self.pitch.len().saturating_sub(1)))
    }
}

impl SignalProvider for AcousticTracks {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn pitch(&self, t: f64) -> Option<f64> {
        self.pitch[self.frame_at(t)?]
    }

    fn intensity(&self, t: f64) -> Option<f64> {
        self.intensity[self.frame_at(t)?]
    }

    fn formant(&self, index: usize, t: f64) -> Option<f64> {
        let frame = self.frame_at(t)?;
        match index {
            1 => self.f1[frame],
            2 => self.f2[frame],
            _ => None,
        }
    }

    fn average_intensity(&self, t0: f64, t1: f64) -> Option<f64> {
        if self.intensity.is_empty() || !(t0.is_finite() && t1.is_finite()) || t1 < t0 {
            return None;
        }
        let first = (t0.max(0.0) / self.step).ceil() as usize;
        let last = ((t1.min(self.duration) / self.step).floor() as usize)
            .min(self.intensity.len().saturating_sub(1));
        if first > last {
            return None;
        }
        let values: Vec<f64> = self.intensity[first..=last]
            .iter()
            .flatten()
            .copied()
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
