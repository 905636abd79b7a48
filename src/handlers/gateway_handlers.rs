//! HTTP handlers for the two AI gateways.
//! Each invocation runs inside its own span tagged with a fresh request id;
//! failures are logged before they are turned into a response or, when the
//! demo policy allows it, replaced by canned data.

use crate::{
    errors::GatewayError,
    models::content::GeneratedContent,
    services::generation::GenerateRequest,
    state::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header},
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub success: bool,
    pub transcript: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub content: GeneratedContent,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
}

/// `POST /api/transcribe-video`: multipart upload with a `video` field.
///
/// The body is buffered up to the router's request limit; a larger body never
/// reaches the gateway and is answered as an oversized upload.
pub async fn transcribe_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<TranscriptionResponse>, GatewayError> {
    let span = info_span!("transcribe_video", request_id = %Uuid::new_v4());

    async move {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        let (result, seed) = match body {
            Ok(body) => {
                let seed = body.len();
                (state.transcription.transcribe(content_type, body).await, seed)
            }
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                let declared = declared_length(&headers);
                (
                    Err(state.transcription.oversized_request(declared)),
                    declared.unwrap_or_default(),
                )
            }
            Err(rejection) => (Err(GatewayError::InvalidRequest(rejection.body_text())), 0),
        };

        match result {
            Ok(transcript) => {
                info!(chars = transcript.chars().count(), "Transcription complete");
                Ok(Json(TranscriptionResponse {
                    success: true,
                    transcript,
                    demo: false,
                }))
            }
            Err(err) => {
                log_failure(&err);
                if !state.demo.applies_to(&err) {
                    return Err(err);
                }
                warn!("Answering with a demo transcript");
                Ok(Json(TranscriptionResponse {
                    success: true,
                    transcript: state.demo.mock_transcript(seed).to_string(),
                    demo: true,
                }))
            }
        }
    }
    .instrument(span)
    .await
}

/// `POST /api/generate-content`: JSON `{ transcript, preferences }`.
pub async fn generate_content(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerationResponse>, GatewayError> {
    let span = info_span!("generate_content", request_id = %Uuid::new_v4());

    async move {
        let body = match body {
            Ok(body) => body,
            Err(rejection) => {
                let err = GatewayError::InvalidRequest(rejection.body_text());
                log_failure(&err);
                return Err(err);
            }
        };

        match run_generation(&state, &body).await {
            Ok(content) => {
                info!(hashtags = content.hashtags.len(), "Content generated");
                Ok(Json(GenerationResponse {
                    success: true,
                    content,
                    demo: false,
                }))
            }
            Err(err) => {
                log_failure(&err);
                if !state.demo.applies_to(&err) {
                    return Err(err);
                }
                warn!("Answering with demo content");
                let prefs = GenerateRequest::from_json(&body)
                    .map(|req| req.preferences)
                    .unwrap_or_default();
                Ok(Json(GenerationResponse {
                    success: true,
                    content: state.demo.mock_content(&prefs),
                    demo: true,
                }))
            }
        }
    }
    .instrument(span)
    .await
}

async fn run_generation(state: &AppState, body: &[u8]) -> Result<GeneratedContent, GatewayError> {
    state.generation.ensure_configured()?;
    let request = GenerateRequest::from_json(body)?;
    state.generation.generate(request).await
}

/// `OPTIONS` on a gateway route that the CORS layer did not answer itself.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method other than POST/OPTIONS on a gateway route.
pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn log_failure(err: &GatewayError) {
    if err.status().is_server_error() {
        error!(kind = err.kind(), error = %err, "Gateway request failed");
    } else {
        warn!(kind = err.kind(), error = %err, "Gateway request rejected");
    }
}
