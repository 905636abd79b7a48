//! Title/description/hashtag set produced for one video.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Upper bound on hashtags returned to the caller.
pub const MAX_HASHTAGS: usize = 10;

/// Generated content for a single request.
///
/// Created fresh per request and never mutated once handed to the caller.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
}

impl GeneratedContent {
    /// Map a JSON-mode model reply onto content.
    ///
    /// Missing or mistyped `title`/`description` become empty strings, a
    /// missing `hashtags` array becomes empty and non-string entries in it
    /// are dropped. Only a reply that is not a JSON object at all is an error.
    pub fn from_model_reply(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(serde::de::Error::custom("model reply is not a JSON object"));
        };

        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let hashtags = match map.get("hashtags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            // Some models answer with a single space-separated string.
            Some(Value::String(joined)) => joined.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            title: text("title"),
            description: text("description"),
            hashtags,
        })
    }
}

/// Merge model hashtags with the caller's comma-separated extras.
///
/// Every tag gets a leading `#`, duplicates are removed case-insensitively
/// keeping the first spelling, and the list is capped at [`MAX_HASHTAGS`].
pub fn merge_hashtags(generated: &[String], extra: &str) -> Vec<String> {
    let extras = extra.split(',');
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for tag in generated.iter().map(String::as_str).chain(extras) {
        let tag = tag.trim();
        let bare = tag.trim_start_matches('#');
        if bare.is_empty() || bare.contains(char::is_whitespace) {
            continue;
        }
        let normalized = format!("#{}", bare);
        if seen.insert(normalized.to_lowercase()) {
            merged.push(normalized);
        }
        if merged.len() == MAX_HASHTAGS {
            break;
        }
    }

    merged
}
