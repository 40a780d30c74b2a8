//! Service error taxonomy.
//!
//! Two classes cross the HTTP boundary: `Input` for malformed or
//! undersized payloads (the caller's fault, not retried) and `Analysis`
//! for anything that goes wrong during transcription or feature
//! extraction. Single failed signal queries are not errors at all; the
//! signal provider reports them as absent samples and extractors skip
//! them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure modes surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request payload failed validation (bad base64, not a WAV,
    /// recording too short). Maps to 400.
    #[error("{0}")]
    Input(String),

    /// Transcription or feature extraction failed. Maps to 500.
    #[error(transparent)]
    Analysis(#[from] anyhow::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ServiceError::Input(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::Analysis(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_maps_to_400() {
        let response = ServiceError::Input("Invalid WAV format".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_analysis_error_maps_to_500() {
        let response =
            ServiceError::Analysis(anyhow::anyhow!("inference failed")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
