//! Request-scoped audio handling: payload validation, temporary WAV
//! artifact, PCM sample access.

pub mod wav;

use std::path::Path;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ServiceError;

/// Minimum byte length of a parseable WAV file (RIFF header).
const MIN_WAV_BYTES: usize = 44;

/// Minimum recording length accepted for analysis.
const MIN_DURATION_S: f64 = 1.0;

/// A decoded recording held on disk for the duration of one request.
///
/// The temporary file backs the recognizer (which reads a path) and is
/// removed when this value drops, on success and on every error path.
#[derive(Debug)]
pub struct DecodedRecording {
    file: NamedTempFile,
    /// Mono PCM samples normalized to [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate of the recording in Hz.
    pub sample_rate: u32,
    /// Total duration in seconds.
    pub duration: f64,
}

impl DecodedRecording {
    /// Decode and validate a base64 WAV payload.
    ///
    /// Validation failures (bad base64, undersized payload, wrong magic,
    /// recording shorter than one second) surface as `ServiceError::Input`.
    pub fn from_base64(audio: &str) -> Result<Self, ServiceError> {
        let bytes = BASE64
            .decode(audio)
            .map_err(|e| ServiceError::Input(format!("Invalid base64 audio: {e}")))?;

        if bytes.len() < MIN_WAV_BYTES {
            return Err(ServiceError::Input("Audio data too short".to_string()));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(ServiceError::Input("Invalid WAV format".to_string()));
        }

        let file = write_temp_wav(&bytes)?;
        let (samples, sample_rate) = wav::read_samples(file.path())?;
        let duration = samples.len() as f64 / sample_rate as f64;
        debug!(
            "decoded recording: {} samples at {} Hz ({:.2}s)",
            samples.len(),
            sample_rate,
            duration
        );

        if duration < MIN_DURATION_S {
            return Err(ServiceError::Input(
                "Recording too short (min 1 second)".to_string(),
            ));
        }

        Ok(Self {
            file,
            samples,
            sample_rate,
            duration,
        })
    }

    /// Path of the on-disk artifact, valid until this value drops.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn write_temp_wav(bytes: &[u8]) -> Result<NamedTempFile, ServiceError> {
    let mut file = tempfile::Builder::new()
        .prefix("voice-metrics-")
        .suffix(".wav")
        .tempfile()
        .context("Failed to create temporary audio file")?;
    std::io::Write::write_all(&mut file, bytes)
        .context("Failed to write temporary audio file")?;
    Ok(file)
}
