//! Speech recognition boundary.
//!
//! The analysis pipeline only needs segments with time spans and,
//! when the recognizer can produce them, word-level sub-timings. The
//! [`Recognizer`] trait keeps that contract narrow; the production
//! implementation is [`whisper::WhisperRecognizer`].

pub mod whisper;

use std::path::Path;

use anyhow::Result;

pub use whisper::WhisperRecognizer;

/// A word with its own time boundaries inside a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    /// Raw recognizer output, not yet normalized.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// One recognized span of speech.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Full segment text.
    pub text: String,
    /// Word-level sub-timings, when the recognizer produced them.
    pub words: Option<Vec<RecognizedWord>>,
}

/// A speech recognizer turning a WAV file into timed segments.
///
/// Implementations are loaded once at startup and shared read-only
/// across requests.
pub trait Recognizer: Send + Sync {
    fn transcribe(&self, path: &Path) -> Result<Vec<TranscriptSegment>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_carries_optional_words() {
        let seg = TranscriptSegment {
            start: 0.0,
            end: 1.0,
            text: "the quick".to_string(),
            words: Some(vec![RecognizedWord {
                text: " the".to_string(),
                start: 0.0,
                end: 0.4,
            }]),
        };
        assert_eq!(seg.words.as_ref().unwrap().len(), 1);
    }
}
