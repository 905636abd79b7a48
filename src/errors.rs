use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{multipart::MultipartError, provider::ProviderError};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Guidance returned with an oversized upload.
pub const FILE_TOO_LARGE_GUIDANCE: &str = "To process this video:
1. Compress the video below the size limit
2. Extract only the audio track (usually 5-15MB as MP3)
3. Use a compression tool such as HandBrake or FFmpeg
4. Split long videos into shorter segments";

/// Every failure a gateway can report to its caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("AI provider API key not configured")]
    Misconfigured,
    #[error("No multipart boundary found")]
    MissingBoundary,
    #[error("No video file found in request")]
    MissingFile,
    #[error("Transcript is required")]
    MissingTranscript,
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),
    #[error("Video file too large ({}MB). Maximum size is {}MB.", mb(.size_bytes), mb(.max_bytes))]
    FileTooLarge { size_bytes: usize, max_bytes: usize },
    #[error("{0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn internal(msg: impl Into<String>) -> Self {
        GatewayError::InternalError(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Misconfigured | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::MissingBoundary
            | GatewayError::MissingFile
            | GatewayError::MissingTranscript
            | GatewayError::InvalidRequest(_)
            | GatewayError::FileTooLarge { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MethodNotAllowed => "MethodNotAllowed",
            GatewayError::Misconfigured => "Misconfigured",
            GatewayError::MissingBoundary => "MissingBoundary",
            GatewayError::MissingFile => "MissingFile",
            GatewayError::MissingTranscript => "MissingTranscript",
            GatewayError::InvalidRequest(_) => "InvalidRequest",
            GatewayError::FileTooLarge { .. } => "FileTooLarge",
            GatewayError::InternalError(_) => "InternalError",
        }
    }
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        GatewayError::internal(err.to_string())
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::MissingBoundary => GatewayError::MissingBoundary,
        }
    }
}

/// JSON envelope shared by both gateways when they fail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        let (details, file_size, max_size) = match err {
            GatewayError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => (
                Some(FILE_TOO_LARGE_GUIDANCE),
                Some(mb(size_bytes)),
                Some(mb(max_bytes)),
            ),
            _ => (None, None, None),
        };

        Self {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
            details,
            file_size,
            max_size,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::from(&self))).into_response()
    }
}

/// Size in megabytes, rounded to two decimals.
fn mb(bytes: &usize) -> f64 {
    (*bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}
