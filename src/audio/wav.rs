//! WAV sample loading via `hound`.
//!
//! The service accepts plain PCM WAV only; multi-channel recordings are
//! mixed down to mono. No resampling is performed, the analysis runs at
//! the recording's native rate.

use std::path::Path;

use anyhow::{Context, Result};
use hound::SampleFormat;

/// Read a WAV file into normalized mono f32 samples.
pub fn read_samples(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader =
        hound::WavReader::open(path).context("Failed to parse WAV audio")?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("Failed to read float WAV samples")?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .context("Failed to read integer WAV samples")?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok((samples, spec.sample_rate))
}
