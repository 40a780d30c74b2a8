//! HTTP surface: `POST /analyze` and `GET /health`.
//!
//! The recognizer handle is loaded once at startup and injected through
//! router state; request handling itself is stateless. Analysis is
//! CPU-bound, so each request runs on the blocking pool.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{self, AnalysisReport, Utterance};
use crate::audio::DecodedRecording;
use crate::error::ServiceError;
use crate::signal::AcousticTracks;
use crate::transcription::Recognizer;

/// Shared per-process state.
#[derive(Clone)]
pub struct AppState {
    /// Immutable recognizer handle, loaded once at startup.
    pub recognizer: Arc<dyn Recognizer>,
}

/// Analyze request body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded WAV recording.
    pub audio: String,
}

/// Build the service router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ServiceError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        "analyze request: {} base64 bytes",
        request.audio.len()
    );

    let recognizer = Arc::clone(&state.recognizer);
    let report = tokio::task::spawn_blocking(move || {
        run_analysis(recognizer.as_ref(), &request.audio)
    })
    .await
    .map_err(|e| ServiceError::Analysis(anyhow::anyhow!("analysis task failed: {e}")))??;

    info!(
        %request_id,
        score = report.score,
        duration = report.duration,
        "analysis complete"
    );
    Ok(Json(report))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Decode, transcribe, extract, and score one recording.
///
/// The decoded artifact lives on disk only for the scope of this call;
/// it is removed when `recording` drops, on success and on both error
/// classes.
fn run_analysis(
    recognizer: &dyn Recognizer,
    audio_b64: &str,
) -> Result<AnalysisReport, ServiceError> {
    let recording = DecodedRecording::from_base64(audio_b64)?;
    let segments = recognizer.transcribe(recording.path())?;
    let utterance = Utterance::from_segments(&segments, recording.duration);
    let tracks = AcousticTracks::analyze(&recording.samples, recording.sample_rate);
    Ok(analysis::run(&tracks, &utterance))
}
