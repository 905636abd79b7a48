//! Outbound calls to the OpenAI-compatible AI provider.
//!
//! Both gateways talk to the provider only through [`AiProvider`], so the
//! HTTP client can be swapped for a stub in tests.

use crate::config::AppConfig;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("unexpected response format")]
    Format,
    #[error("provider credential not configured")]
    MissingCredential,
}

/// Audio (or video) handed to the speech-to-text endpoint.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub media: Bytes,
    pub file_name: String,
    pub content_type: String,
    /// ISO-639-1 source language hint.
    pub language: String,
}

/// A system/user prompt pair for a JSON-mode completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Whether a credential is available. Gateways refuse to call out otherwise.
    fn is_configured(&self) -> bool;

    /// Transcribe media and return the plain-text transcript verbatim.
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError>;

    /// Run a chat completion constrained to a JSON object; returns the raw JSON text.
    async fn complete_json(&self, request: ChatRequest) -> Result<String, ProviderError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Provider backed by the OpenAI REST API (or any compatible base URL).
pub struct OpenAiProvider {
    http_client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    chat_model: String,
    transcription_model: String,
}

impl OpenAiProvider {
    pub fn new(cfg: &AppConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            chat_model: cfg.chat_model.clone(),
            transcription_model: cfg.transcription_model.clone(),
        })
    }

    fn key(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or(ProviderError::MissingCredential)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();
        Err(ProviderError::Api(format!("{status}: {body_text}")))
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError> {
        let api_key = self.key()?;
        let size = request.media.len();

        let file_part = Part::stream_with_length(request.media, size as u64)
            .file_name(request.file_name)
            .mime_str(&request.content_type)
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .text("language", request.language)
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(
            model = %self.transcription_model,
            media_size = size,
            "Sending transcription request"
        );

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .header("Authorization", format!("Bearer {api_key}"))
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn complete_json(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let api_key = self.key()?;

        let body = json!({
            "model": self.chat_model,
            "temperature": request.temperature,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ],
            "response_format": { "type": "json_object" }
        });

        tracing::debug!(model = %self.chat_model, "Sending chat completion request");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        let chat: ChatResponse = Self::check_status(response).await?.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::Format)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::multipart::{boundary_from_content_type, extract_parts};
    use axum::{
        Router,
        http::{HeaderMap, header},
        routing::post,
    };

    fn config(api_key: Option<&str>) -> AppConfig {
        AppConfig {
            api_key: api_key.map(str::to_string),
            api_base: "https://example.invalid/v1/".into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn configured_only_with_a_key() {
        assert!(OpenAiProvider::new(&config(Some("sk-test"))).unwrap().is_configured());
        assert!(!OpenAiProvider::new(&config(None)).unwrap().is_configured());
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base() {
        let provider = OpenAiProvider::new(&config(None)).unwrap();
        assert_eq!(provider.api_base, "https://example.invalid/v1");
    }

    #[tokio::test]
    async fn calls_without_key_fail_before_network() {
        let provider = OpenAiProvider::new(&config(None)).unwrap();
        let err = provider
            .complete_json(ChatRequest {
                system: "s".into(),
                user: "u".into(),
                temperature: 0.7,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
    }

    /// Answers a transcription upload with the file name, media length and
    /// language it received, so the client side can be checked end to end.
    async fn echo_upload(headers: HeaderMap, body: Bytes) -> String {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let boundary = boundary_from_content_type(content_type).unwrap();
        let mut parsed = extract_parts(body, &boundary).await;
        let file = parsed.take_part("file").unwrap();
        let language = parsed.take_part("language").unwrap();
        format!(
            "{}|{}|{}|{}",
            file.file_name.clone().unwrap_or_default(),
            file.len(),
            String::from_utf8_lossy(&language.payload),
            file.payload == Bytes::from_static(MEDIA),
        )
    }

    const MEDIA: &[u8] = b"\x00\x00\x00\x18ftypmp42\r\n--tail";

    #[tokio::test]
    async fn transcription_upload_reaches_the_api_intact() {
        let app = Router::new().route("/audio/transcriptions", post(echo_upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let provider = OpenAiProvider::new(&AppConfig {
            api_key: Some("sk-test".into()),
            api_base: format!("http://{addr}"),
            ..AppConfig::default()
        })
        .unwrap();

        let reply = provider
            .transcribe(TranscriptionRequest {
                media: Bytes::from_static(MEDIA),
                file_name: "clip.mp4".into(),
                content_type: "video/mp4".into(),
                language: "nl".into(),
            })
            .await
            .unwrap();

        assert_eq!(reply, format!("clip.mp4|{}|nl|true", MEDIA.len()));
    }
}
