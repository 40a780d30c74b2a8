//! Whisper-backed recognizer with word-level timing.
//!
//! The ggml model is loaded once; each transcription creates its own
//! inference state, so one context serves concurrent requests. Word
//! boundaries come from token timestamps: tokens are grouped into words
//! on Whisper's leading-space convention, and each word takes the first
//! token's start and the last token's end.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{RecognizedWord, Recognizer, TranscriptSegment};
use crate::audio::wav;

/// Sample rate Whisper models are trained on.
const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Token timestamps are expressed in centiseconds.
const TOKEN_TIME_UNIT_S: f64 = 0.01;

/// Whisper transcription provider.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    language: String,
    n_threads: i32,
}

impl WhisperRecognizer {
    /// Load a ggml model file. Called once at startup; the returned
    /// handle is immutable and shared across requests.
    pub fn new(model_path: &Path, language: &str, n_threads: i32) -> Result<Self> {
        Self::validate_model(model_path)?;

        info!("Loading Whisper model from {:?}", model_path);
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().context("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to load Whisper model: {}", e))?;
        info!("Whisper model loaded successfully");

        Ok(Self {
            ctx,
            language: language.to_string(),
            n_threads,
        })
    }

    /// Loose sanity checks on the model file.
    fn validate_model(path: &Path) -> Result<()> {
        if !path.exists() {
            anyhow::bail!("Model file not found: {:?}", path);
        }

        let metadata = std::fs::metadata(path)?;
        let size_mb = metadata.len() / (1024 * 1024);
        if size_mb < 30 {
            anyhow::bail!(
                "Model file too small ({}MB). Expected at least 30MB for a valid Whisper model.",
                size_mb
            );
        }
        if size_mb > 4000 {
            anyhow::bail!(
                "Model file too large ({}MB). Expected at most 4000MB for a Whisper model.",
                size_mb
            );
        }

        debug!("Model file validated: {}MB", size_mb);
        Ok(())
    }

    fn params(&self) -> FullParams<'_, '_> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_token_timestamps(true);
        if self.language != "auto" {
            params.set_language(Some(&self.language));
        }
        params
    }
}

impl Recognizer for WhisperRecognizer {
    fn transcribe(&self, path: &Path) -> Result<Vec<TranscriptSegment>> {
        let (samples, sample_rate) = wav::read_samples(path)?;
        if sample_rate != WHISPER_SAMPLE_RATE {
            warn!(
                "recording is {} Hz, Whisper expects {} Hz; word timing may degrade",
                sample_rate, WHISPER_SAMPLE_RATE
            );
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| anyhow::anyhow!("Failed to create Whisper state: {}", e))?;
        state
            .full(self.params(), &samples)
            .map_err(|e| anyhow::anyhow!("Whisper inference failed: {}", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow::anyhow!("Failed to get segment count: {}", e))?;

        let mut segments = Vec::new();
        for i in 0..num_segments {
            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment start: {}", e))?
                as f64
                * TOKEN_TIME_UNIT_S;
            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment end: {}", e))?
                as f64
                * TOKEN_TIME_UNIT_S;
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment text: {}", e))?
                .trim()
                .to_string();

            let words = collect_words(&state, i)?;
            debug!(
                "segment {}: {:.2}s-{:.2}s, {} words, \"{}\"",
                i,
                start,
                end,
                words.as_ref().map(Vec::len).unwrap_or(0),
                text
            );
            segments.push(TranscriptSegment {
                start,
                end,
                text,
                words,
            });
        }

        Ok(segments)
    }
}

/// Group a segment's tokens into words with time boundaries.
///
/// Whisper marks word starts with a leading space on the first token of
/// each word; special tokens (`[_BEG_]`, `<|...|>`) carry no speech.
fn collect_words(
    state: &whisper_rs::WhisperState,
    segment: std::os::raw::c_int,
) -> Result<Option<Vec<RecognizedWord>>> {
    let n_tokens = state
        .full_n_tokens(segment)
        .map_err(|e| anyhow::anyhow!("Failed to get token count: {}", e))?;

    let mut words: Vec<RecognizedWord> = Vec::new();
    for j in 0..n_tokens {
        let text = state
            .full_get_token_text(segment, j)
            .map_err(|e| anyhow::anyhow!("Failed to get token text: {}", e))?;
        if text.starts_with("[_") || text.starts_with("<|") {
            continue;
        }
        let data = state
            .full_get_token_data(segment, j)
            .map_err(|e| anyhow::anyhow!("Failed to get token data: {}", e))?;
        let t0 = data.t0 as f64 * TOKEN_TIME_UNIT_S;
        let t1 = data.t1 as f64 * TOKEN_TIME_UNIT_S;

        let starts_word = text.starts_with(' ') || words.is_empty();
        if starts_word {
            words.push(RecognizedWord {
                text,
                start: t0,
                end: t1.max(t0),
            });
        } else if let Some(last) = words.last_mut() {
            last.text.push_str(&text);
            last.end = last.end.max(t1);
        }
    }

    Ok(if words.is_empty() { None } else { Some(words) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_model_missing_file() {
        let err = WhisperRecognizer::validate_model(Path::new("/nonexistent/model.bin"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validate_model_rejects_tiny_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"stub").unwrap();
        let err = WhisperRecognizer::validate_model(file.path()).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }
}
