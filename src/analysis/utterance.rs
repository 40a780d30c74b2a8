//! Word boundaries and utterance construction.
//!
//! Two construction paths: when the recognizer produced word-level
//! timings anywhere in the transcription, every timed word contributes
//! its own boundary. When no segment carried word timings, each
//! segment's span is divided evenly across its whitespace-split tokens.
//! The fallback is all-or-nothing across the whole transcription, never
//! per segment.

use serde::{Deserialize, Serialize};

use crate::transcription::TranscriptSegment;

/// Trailing punctuation stripped from recognized tokens.
const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// One recognized word with its time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBoundary {
    /// Lowercased token with trailing punctuation stripped.
    pub word: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds (>= start).
    pub end: f64,
}

/// Ordered recognized words plus the recording duration. Immutable
/// once built; order is recognition order.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    words: Vec<WordBoundary>,
    duration: f64,
}

impl Utterance {
    /// Build an utterance from recognizer output.
    pub fn from_segments(segments: &[TranscriptSegment], duration: f64) -> Self {
        let mut words = Vec::new();

        for segment in segments {
            if let Some(timed) = &segment.words {
                for w in timed {
                    if let Some(word) = normalize_token(&w.text) {
                        words.push(WordBoundary {
                            word,
                            start: w.start,
                            end: w.end,
                        });
                    }
                }
            }
        }

        if words.is_empty() {
            for segment in segments {
                words.extend(even_split(segment));
            }
        }

        Self { words, duration }
    }

    /// Build directly from boundaries (tests, replay).
    pub fn from_words(words: Vec<WordBoundary>, duration: f64) -> Self {
        Self { words, duration }
    }

    pub fn words(&self) -> &[WordBoundary] {
        &self.words
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Distribute a segment's span evenly across its whitespace tokens.
/// Token `i` of `n` gets `[start + i*span/n, start + (i+1)*span/n)`;
/// tokens that normalize to nothing still consume their slot.
fn even_split(segment: &TranscriptSegment) -> Vec<WordBoundary> {
    let tokens: Vec<&str> = segment.text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let step = (segment.end - segment.start) / tokens.len() as f64;
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, token)| {
            normalize_token(token).map(|word| WordBoundary {
                word,
                start: segment.start + i as f64 * step,
                end: segment.start + (i + 1) as f64 * step,
            })
        })
        .collect()
}

/// Lowercase and strip trailing punctuation; empty tokens are dropped.
fn normalize_token(raw: &str) -> Option<String> {
    let word = raw
        .trim()
        .to_lowercase()
        .trim_end_matches(&TRAILING_PUNCTUATION[..])
        .to_string();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}
