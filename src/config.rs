//! Service configuration.

use std::path::PathBuf;

/// Default listen port.
const DEFAULT_PORT: u16 = 8000;

/// Default request body limit (base64-encoded WAV payloads are small;
/// this bounds hostile uploads before decoding).
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Runtime configuration, built once at startup from CLI arguments.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listen port for the HTTP server.
    pub port: u16,
    /// Path to the Whisper ggml model file.
    pub model_path: PathBuf,
    /// Language code passed to the recognizer ("auto" to detect).
    pub language: String,
    /// Number of threads for Whisper inference.
    pub n_threads: i32,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_path: PathBuf::from("models/ggml-tiny.bin"),
            language: "en".to_string(),
            n_threads: 4,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.language, "en");
        assert!(config.max_body_bytes >= 1024 * 1024);
    }
}
