//! src/services/generation.rs
//!
//! ContentGateway: renders the prompt pair for a transcript, runs a JSON-mode
//! completion and normalizes the reply into [`GeneratedContent`].

use crate::{
    errors::GatewayError,
    models::{
        content::{GeneratedContent, merge_hashtags},
        preferences::Preferences,
    },
    services::{prompts::build_chat_request, provider::AiProvider},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Body of `POST /api/generate-content`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub transcript: Option<String>,
    pub preferences: Preferences,
}

impl GenerateRequest {
    pub fn from_json(body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
    }
}

#[derive(Clone)]
pub struct ContentGateway {
    provider: Arc<dyn AiProvider>,
}

impl ContentGateway {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub fn ensure_configured(&self) -> Result<(), GatewayError> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(GatewayError::Misconfigured)
        }
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedContent, GatewayError> {
        self.ensure_configured()?;

        let transcript = request
            .transcript
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::MissingTranscript)?;
        let prefs = &request.preferences;

        let chat = build_chat_request(transcript, prefs);
        info!(
            language = prefs.language.code(),
            clickbait_level = prefs.clickbait_level,
            transcript_chars = transcript.chars().count(),
            "Generating content"
        );
        debug!(user_prompt = %chat.user, "Rendered prompt");

        let reply = self.provider.complete_json(chat).await?;
        let content = GeneratedContent::from_model_reply(&reply)
            .map_err(|e| GatewayError::internal(format!("could not parse model reply: {}", e)))?;

        Ok(finalize(content, prefs))
    }
}

/// Apply the caller's hashtag preferences to the model output.
fn finalize(content: GeneratedContent, prefs: &Preferences) -> GeneratedContent {
    let hashtags = if prefs.use_hashtags {
        merge_hashtags(&content.hashtags, &prefs.extra_hashtags)
    } else {
        Vec::new()
    };

    GeneratedContent {
        hashtags,
        ..content
    }
}
