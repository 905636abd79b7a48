use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt, str::FromStr};

const MB: usize = 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Credential for the AI provider (`OPENAI_API_KEY`). Absent means misconfigured.
    pub api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub transcription_model: String,
    /// Source-language hint passed to the transcription call.
    pub transcription_language: String,
    /// Ceiling on the decoded size of an uploaded video.
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
    /// Substitute canned demo data when the provider fails.
    pub demo_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            api_key: None,
            api_base: "https://api.openai.com/v1".into(),
            chat_model: "gpt-4o-mini".into(),
            transcription_model: "whisper-1".into(),
            transcription_language: "nl".into(),
            max_upload_bytes: 25 * MB,
            request_timeout_secs: 120,
            demo_fallback: false,
        }
    }
}

// Hand-written so the credential never reaches the logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("transcription_model", &self.transcription_model)
            .field("transcription_language", &self.transcription_language)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("demo_fallback", &self.demo_fallback)
            .finish()
    }
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Transcription and title/description generation API for short videos")]
pub struct Args {
    /// Host to bind to (overrides SHORTS_HELPER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides SHORTS_HELPER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Base URL of the OpenAI-compatible API (overrides SHORTS_HELPER_API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Chat model used for content generation (overrides SHORTS_HELPER_CHAT_MODEL)
    #[arg(long)]
    pub chat_model: Option<String>,

    /// Speech-to-text model (overrides SHORTS_HELPER_TRANSCRIPTION_MODEL)
    #[arg(long)]
    pub transcription_model: Option<String>,

    /// Language hint for transcription (overrides SHORTS_HELPER_TRANSCRIPTION_LANGUAGE)
    #[arg(long)]
    pub transcription_language: Option<String>,

    /// Maximum upload size in MB (overrides SHORTS_HELPER_MAX_UPLOAD_MB)
    #[arg(long)]
    pub max_upload_mb: Option<usize>,

    /// Outbound request timeout in seconds (overrides SHORTS_HELPER_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Answer with demo data when the AI provider fails (overrides SHORTS_HELPER_DEMO_FALLBACK)
    #[arg(long)]
    pub demo_fallback: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse())
    }

    /// Merge parsed CLI args over the environment, falling back to defaults.
    pub fn merge(args: Args) -> Result<Self> {
        let defaults = Self::default();

        // --- Environment fallback ---
        let env_host = env::var("SHORTS_HELPER_HOST").unwrap_or(defaults.host);
        let env_port = env_parse("SHORTS_HELPER_PORT", defaults.port)?;
        let env_base = env::var("SHORTS_HELPER_API_BASE").unwrap_or(defaults.api_base);
        let env_chat = env::var("SHORTS_HELPER_CHAT_MODEL").unwrap_or(defaults.chat_model);
        let env_stt = env::var("SHORTS_HELPER_TRANSCRIPTION_MODEL")
            .unwrap_or(defaults.transcription_model);
        let env_lang = env::var("SHORTS_HELPER_TRANSCRIPTION_LANGUAGE")
            .unwrap_or(defaults.transcription_language);
        let env_max_mb = env_parse("SHORTS_HELPER_MAX_UPLOAD_MB", defaults.max_upload_bytes / MB)?;
        let env_timeout = env_parse("SHORTS_HELPER_TIMEOUT_SECS", defaults.request_timeout_secs)?;
        let env_demo = env_parse("SHORTS_HELPER_DEMO_FALLBACK", defaults.demo_fallback)?;

        let max_upload_mb = args.max_upload_mb.unwrap_or(env_max_mb);
        let max_upload_bytes = max_upload_mb
            .checked_mul(MB)
            .with_context(|| format!("maximum upload size of {} MB is too large", max_upload_mb))?;

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            api_key,
            api_base: args.api_base.unwrap_or(env_base),
            chat_model: args.chat_model.unwrap_or(env_chat),
            transcription_model: args.transcription_model.unwrap_or(env_stt),
            transcription_language: args.transcription_language.unwrap_or(env_lang),
            max_upload_bytes,
            request_timeout_secs: args.timeout_secs.unwrap_or(env_timeout),
            demo_fallback: args.demo_fallback || env_demo,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Limit for a whole request body; leaves room for base64 and multipart framing.
    pub fn max_request_bytes(&self) -> usize {
        self.max_upload_bytes.saturating_mul(2)
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
