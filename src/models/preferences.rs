//! Caller-supplied generation preferences.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_CLICKBAIT_LEVEL: u8 = 5;
pub const MAX_CLICKBAIT_LEVEL: u8 = 10;

/// Output language of the generated content.
///
/// Anything other than `nl` selects English, so older clients sending an
/// unknown code still get a usable result.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Dutch,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Dutch => "nl",
            Language::English => "en",
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("nl") {
            Language::Dutch
        } else {
            Language::English
        }
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.code().to_string()
    }
}

/// Rhetorical intensity band derived from the 0–10 clickbait level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickbaitBand {
    /// 0–2
    Informative,
    /// 3–5
    Engaging,
    /// 6–8
    Urgent,
    /// 9–10, still credible.
    Aggressive,
}

impl ClickbaitBand {
    pub fn for_level(level: u8) -> Self {
        match level {
            0..=2 => ClickbaitBand::Informative,
            3..=5 => ClickbaitBand::Engaging,
            6..=8 => ClickbaitBand::Urgent,
            _ => ClickbaitBand::Aggressive,
        }
    }
}

/// Per-request preferences for content generation.
///
/// Immutable for the duration of one generation call. Field names follow the
/// camelCase keys sent by the browser client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub language: Language,

    /// Only an explicit `false` turns this off.
    #[serde(deserialize_with = "true_unless_false")]
    pub use_emojis: bool,

    /// Only an explicit `false` turns this off.
    #[serde(deserialize_with = "true_unless_false")]
    pub use_hashtags: bool,

    /// Clamped into `0..=10` on deserialization.
    #[serde(deserialize_with = "clamp_clickbait_level")]
    pub clickbait_level: u8,

    /// Target platforms, in the order the caller listed them.
    pub platforms: Vec<String>,

    pub topic_hint: String,

    /// Comma-separated hashtags to append to whatever the model produces.
    pub extra_hashtags: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::Dutch,
            use_emojis: true,
            use_hashtags: true,
            clickbait_level: DEFAULT_CLICKBAIT_LEVEL,
            platforms: vec!["Alle".to_string()],
            topic_hint: "Crypto/Forex market update or trade breakdown".to_string(),
            extra_hashtags: String::new(),
        }
    }
}

impl Preferences {
    pub fn clickbait_band(&self) -> ClickbaitBand {
        ClickbaitBand::for_level(self.clickbait_level)
    }

    /// Platforms to mention in the prompt; falls back to "Alle" when empty.
    pub fn platform_list(&self) -> String {
        if self.platforms.is_empty() {
            "Alle".to_string()
        } else {
            self.platforms.join(", ")
        }
    }

    pub fn topic_hint_or_default(&self) -> &str {
        let hint = self.topic_hint.trim();
        if hint.is_empty() {
            "Crypto/Forex market update or trade breakdown"
        } else {
            hint
        }
    }
}

fn true_unless_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(!matches!(raw, Value::Bool(false)))
}

fn clamp_clickbait_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(level) => level.clamp(0, i64::from(MAX_CLICKBAIT_LEVEL)) as u8,
        None => DEFAULT_CLICKBAIT_LEVEL,
    })
}
