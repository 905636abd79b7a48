//! src/services/transcription.rs
//!
//! TranscriptionGateway: pulls the `video` part out of a multipart upload,
//! enforces the upload ceiling on its decoded size and forwards the bytes to
//! the provider's speech-to-text call.

use crate::{
    errors::GatewayError,
    models::upload::UploadedPart,
    services::{
        multipart::{boundary_from_content_type, extract_parts},
        provider::{AiProvider, TranscriptionRequest},
    },
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

pub const VIDEO_FIELD: &str = "video";
pub const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";
pub const DEFAULT_VIDEO_FILE_NAME: &str = "video.mp4";

#[derive(Clone)]
pub struct TranscriptionGateway {
    provider: Arc<dyn AiProvider>,
    max_upload_bytes: usize,
    language: String,
}

impl TranscriptionGateway {
    pub fn new(provider: Arc<dyn AiProvider>, max_upload_bytes: usize, language: impl Into<String>) -> Self {
        Self {
            provider,
            max_upload_bytes,
            language: language.into(),
        }
    }

    pub fn ensure_configured(&self) -> Result<(), GatewayError> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(GatewayError::Misconfigured)
        }
    }

    /// Error for an upload whose body exceeded the request limit before it
    /// could be read. `declared_len` is the `Content-Length` header, when sent.
    pub fn oversized_request(&self, declared_len: Option<usize>) -> GatewayError {
        if let Err(err) = self.ensure_configured() {
            return err;
        }
        GatewayError::FileTooLarge {
            size_bytes: declared_len.unwrap_or(self.max_upload_bytes.saturating_add(1)),
            max_bytes: self.max_upload_bytes,
        }
    }

    /// Transcribe the `video` part of a multipart body.
    ///
    /// Checks run in a fixed order: credential, boundary, presence of the
    /// video part, size. The provider is only called once all of them pass.
    pub async fn transcribe(
        &self,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<String, GatewayError> {
        self.ensure_configured()?;

        let boundary = boundary_from_content_type(content_type)?;
        let mut parsed = extract_parts(body, &boundary).await;
        for skipped in &parsed.skipped {
            warn!(
                segment = skipped.index,
                reason = %skipped.reason,
                "Skipped malformed multipart segment"
            );
        }

        let video = parsed
            .take_part(VIDEO_FIELD)
            .ok_or(GatewayError::MissingFile)?;
        self.ensure_within_limit(&video)?;

        let request = TranscriptionRequest {
            file_name: video
                .file_name
                .unwrap_or_else(|| DEFAULT_VIDEO_FILE_NAME.to_string()),
            content_type: video
                .content_type
                .unwrap_or_else(|| DEFAULT_VIDEO_CONTENT_TYPE.to_string()),
            media: video.payload,
            language: self.language.clone(),
        };

        info!(
            file_name = %request.file_name,
            content_type = %request.content_type,
            size_bytes = request.media.len(),
            "Forwarding video for transcription"
        );

        let transcript = self.provider.transcribe(request).await?;
        Ok(transcript)
    }

    fn ensure_within_limit(&self, part: &UploadedPart) -> Result<(), GatewayError> {
        if part.len() > self.max_upload_bytes {
            return Err(GatewayError::FileTooLarge {
                size_bytes: part.len(),
                max_bytes: self.max_upload_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::stub::StubProvider;

    const BOUNDARY: &str = "XyZboundary";
    const LIMIT: usize = 25 * 1024 * 1024;

    fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    fn upload(field: &str, headers: &str, payload: &[u8]) -> Bytes {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"{headers}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Bytes::from(body)
    }

    fn gateway(stub: &Arc<StubProvider>) -> TranscriptionGateway {
        TranscriptionGateway::new(stub.clone(), LIMIT, "nl")
    }

    #[tokio::test]
    async fn forwards_video_and_returns_text_verbatim() {
        let stub = Arc::new(StubProvider::new());
        let body = upload(
            "video",
            "; filename=\"short.mov\"\r\nContent-Type: video/quicktime",
            b"\x00moov\r\n",
        );

        let transcript = gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap();

        assert_eq!(transcript, "Bitcoin test transcript");
        let sent = stub.last_transcription.lock().unwrap().clone().unwrap();
        assert_eq!(sent.file_name, "short.mov");
        assert_eq!(sent.content_type, "video/quicktime");
        assert_eq!(sent.language, "nl");
        assert_eq!(sent.media.as_ref(), b"\x00moov\r\n");
    }

    #[tokio::test]
    async fn missing_metadata_uses_defaults() {
        let stub = Arc::new(StubProvider::new());
        let body = upload("video", "", b"data");
        gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap();

        let sent = stub.last_transcription.lock().unwrap().clone().unwrap();
        assert_eq!(sent.file_name, DEFAULT_VIDEO_FILE_NAME);
        assert_eq!(sent.content_type, DEFAULT_VIDEO_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn exactly_the_limit_is_accepted() {
        let stub = Arc::new(StubProvider::new());
        let body = upload("video", "", &vec![7u8; LIMIT]);
        let result = gateway(&stub).transcribe(Some(&content_type()), body).await;
        assert!(result.is_ok());
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn one_byte_over_the_limit_is_rejected() {
        let stub = Arc::new(StubProvider::new());
        let body = upload("video", "", &vec![7u8; LIMIT + 1]);
        let err = gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap_err();

        match err {
            GatewayError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => {
                assert_eq!(size_bytes, LIMIT + 1);
                assert_eq!(max_bytes, LIMIT);
            }
            other => panic!("Expected FileTooLarge, got {other:?}"),
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn limit_applies_to_decoded_size() {
        let stub = Arc::new(StubProvider::new());
        let gateway = TranscriptionGateway::new(stub.clone(), 3, "nl");
        // "AAECAw==" is 8 bytes of text but 4 bytes decoded.
        let body = upload(
            "video",
            "\r\nContent-Transfer-Encoding: base64",
            b"AAECAw==",
        );
        let err = gateway
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GatewayError::FileTooLarge { size_bytes: 4, .. }
        ));
    }

    #[tokio::test]
    async fn missing_video_field_is_reported() {
        let stub = Arc::new(StubProvider::new());
        let body = upload("audio", "", b"data");
        let err = gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingFile));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_boundary_is_reported() {
        let stub = Arc::new(StubProvider::new());
        let err = gateway(&stub)
            .transcribe(Some("multipart/form-data"), Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingBoundary));
    }

    #[tokio::test]
    async fn missing_credential_skips_the_provider() {
        let stub = Arc::new(StubProvider::unconfigured());
        let body = upload("video", "", b"data");
        let err = gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Misconfigured));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_becomes_internal_error() {
        let stub = Arc::new(StubProvider {
            transcript: Err("503 Service Unavailable: overloaded".into()),
            ..StubProvider::new()
        });
        let body = upload("video", "", b"data");
        let err = gateway(&stub)
            .transcribe(Some(&content_type()), body)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InternalError(ref msg) if msg.contains("overloaded")));
    }

    #[test]
    fn oversized_request_reports_declared_length() {
        let stub = Arc::new(StubProvider::new());
        let err = gateway(&stub).oversized_request(Some(60 * 1024 * 1024));
        assert!(matches!(
            err,
            GatewayError::FileTooLarge { size_bytes, max_bytes: LIMIT } if size_bytes == 60 * 1024 * 1024
        ));

        let err = gateway(&stub).oversized_request(None);
        assert!(matches!(
            err,
            GatewayError::FileTooLarge { size_bytes, .. } if size_bytes == LIMIT + 1
        ));
    }

    #[test]
    fn oversized_request_checks_the_credential_first() {
        let stub = Arc::new(StubProvider::unconfigured());
        let err = gateway(&stub).oversized_request(Some(60 * 1024 * 1024));
        assert!(matches!(err, GatewayError::Misconfigured));
    }
}
