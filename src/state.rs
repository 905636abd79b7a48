//! Shared, immutable application state handed to every handler.

use crate::{
    config::AppConfig,
    services::{
        demo::DemoFallbackPolicy, generation::ContentGateway, provider::AiProvider,
        transcription::TranscriptionGateway,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AiProvider>,
    pub transcription: TranscriptionGateway,
    pub generation: ContentGateway,
    pub demo: DemoFallbackPolicy,
}

impl AppState {
    pub fn new(cfg: &AppConfig, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            transcription: TranscriptionGateway::new(
                provider.clone(),
                cfg.max_upload_bytes,
                cfg.transcription_language.clone(),
            ),
            generation: ContentGateway::new(provider.clone()),
            demo: DemoFallbackPolicy::new(cfg.demo_fallback),
            provider,
        }
    }
}
