//! Demo fallback: canned transcripts and content served when the AI
//! provider cannot be reached, so the upload flow stays usable offline.
//!
//! The policy only masks provider-side failures. Caller mistakes (missing
//! file, oversized upload, empty transcript) are always reported as errors.

use crate::errors::GatewayError;
use crate::models::content::{GeneratedContent, merge_hashtags};
use crate::models::preferences::{ClickbaitBand, Language, Preferences};

const MOCK_TRANSCRIPTS: [&str; 3] = [
    "Goedemiddag allemaal, welkom bij deze nieuwe marktupdate. Ik zie dat Bitcoin vandaag weer flink in beweging is gekomen. We zitten momenteel rond de 43.000 dollar niveau, wat een belangrijke steun/resistentie zone is. De technische analyse laat zien dat we mogelijk een breakout kunnen verwachten in de komende dagen. Let goed op het volume en de RSI indicator.",
    "Hallo traders, hier is je dagelijkse crypto update. Ethereum heeft vandaag een sterke rally laten zien en breekt door het 2.500 dollar niveau. Dit is een bullish signaal dat suggereert dat we mogelijk naar 3.000 dollar kunnen gaan. De MACD indicator bevestigt deze trend. Houd je stop loss dicht bij de hand.",
    "Welkom bij deze trade breakdown. Ik heb vandaag een interessante setup gezien in de Solana chart. We hebben een perfecte bullish flag pattern die zich heeft gevormd na de recente pullback. De prijs test momenteel de trendline support en als deze houdt, kunnen we een mooie bounce naar boven verwachten. Risico-reward ratio is ongeveer 1:3.",
];

const BASE_HASHTAGS: [&str; 5] = ["#crypto", "#bitcoin", "#altcoins", "#forex", "#trading"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DemoFallbackPolicy {
    pub enabled: bool,
}

impl DemoFallbackPolicy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether `err` may be answered with demo data instead.
    pub fn applies_to(&self, err: &GatewayError) -> bool {
        self.enabled
            && matches!(
                err,
                GatewayError::InternalError(_) | GatewayError::Misconfigured
            )
    }

    /// Pick a canned transcript. The same seed always yields the same text.
    pub fn mock_transcript(&self, seed: usize) -> &'static str {
        MOCK_TRANSCRIPTS[seed % MOCK_TRANSCRIPTS.len()]
    }

    pub fn mock_content(&self, prefs: &Preferences) -> GeneratedContent {
        let hashtags = if prefs.use_hashtags {
            let base: Vec<String> = BASE_HASHTAGS.iter().map(|tag| tag.to_string()).collect();
            merge_hashtags(&base, &prefs.extra_hashtags)
        } else {
            Vec::new()
        };

        GeneratedContent {
            title: mock_title(prefs),
            description: mock_description(prefs.language, prefs.use_emojis),
            hashtags,
        }
    }
}

fn mock_title(prefs: &Preferences) -> String {
    let headline = match (prefs.language, prefs.clickbait_band()) {
        (Language::Dutch, ClickbaitBand::Informative) => {
            "Marktupdate: Bitcoin bewegingen en technische analyse"
        }
        (Language::Dutch, ClickbaitBand::Engaging) => {
            "BREAKING: Bitcoin breekt door belangrijk niveau - wat nu?"
        }
        (Language::Dutch, ClickbaitBand::Urgent) => {
            "KRITIEK: Bitcoin staat op het punt van een MASSIEVE beweging!"
        }
        (Language::Dutch, ClickbaitBand::Aggressive) => {
            "ALARM: Bitcoin gaat EXPLODEREN - mis dit NIET!"
        }
        (Language::English, ClickbaitBand::Informative) => {
            "Market update: Bitcoin moves and technical analysis"
        }
        (Language::English, ClickbaitBand::Engaging) => {
            "BREAKING: Bitcoin breaks a key level - what now?"
        }
        (Language::English, ClickbaitBand::Urgent) => {
            "CRITICAL: Bitcoin is about to make a MASSIVE move!"
        }
        (Language::English, ClickbaitBand::Aggressive) => {
            "ALERT: Bitcoin is about to EXPLODE - do NOT miss this!"
        }
    };

    if prefs.use_emojis {
        format!("🚨 {}", headline)
    } else {
        headline.to_string()
    }
}

fn mock_description(language: Language, use_emojis: bool) -> String {
    let (intro, insights_head, insights, impact_head, impact, cta) = match language {
        Language::Dutch => (
            "In deze video bespreek ik de laatste ontwikkelingen in de crypto markt.",
            "Belangrijkste inzichten:",
            [
                "Technische analyse van Bitcoin en Ethereum",
                "Marktsentiment en volume analyse",
                "Toekomstige prijsdoelen en risico's",
            ],
            "Wat betekent dit voor jouw portfolio?",
            "Deze bewegingen kunnen grote impact hebben op je crypto holdings. Blijf op de hoogte van de laatste ontwikkelingen.",
            "Volg voor meer dagelijkse updates en trade breakdowns!",
        ),
        Language::English => (
            "In this video, I discuss the latest developments in the crypto market.",
            "Key insights:",
            [
                "Technical analysis of Bitcoin and Ethereum",
                "Market sentiment and volume analysis",
                "Future price targets and risks",
            ],
            "What does this mean for your portfolio?",
            "These movements can have a major impact on your crypto holdings. Stay updated on the latest developments.",
            "Follow for more daily updates and trade breakdowns!",
        ),
    };

    let icon = |emoji: &str| if use_emojis { format!("{emoji} ") } else { String::new() };

    let mut desc = format!("{intro}\n\n{}{insights_head}\n", icon("🔍"));
    for line in insights {
        desc.push_str(&format!("• {line}\n"));
    }
    desc.push_str(&format!("\n{}{impact_head}\n{impact}\n\n", icon("💡")));
    desc.push_str(&format!("{}{cta}", icon("📈")));
    desc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_policy_never_applies() {
        let policy = DemoFallbackPolicy::default();
        assert!(!policy.applies_to(&GatewayError::internal("provider down")));
        assert!(!policy.applies_to(&GatewayError::Misconfigured));
    }

    #[test]
    fn enabled_policy_masks_only_provider_failures() {
        let policy = DemoFallbackPolicy::new(true);
        assert!(policy.applies_to(&GatewayError::internal("provider down")));
        assert!(policy.applies_to(&GatewayError::Misconfigured));
        assert!(!policy.applies_to(&GatewayError::MissingFile));
        assert!(!policy.applies_to(&GatewayError::MissingTranscript));
        assert!(!policy.applies_to(&GatewayError::FileTooLarge {
            size_bytes: 2,
            max_bytes: 1
        }));
    }

    #[test]
    fn mock_transcript_is_deterministic() {
        let policy = DemoFallbackPolicy::new(true);
        assert_eq!(policy.mock_transcript(4), policy.mock_transcript(1));
        assert_ne!(policy.mock_transcript(0), policy.mock_transcript(1));
    }

    #[test]
    fn mock_title_tracks_clickbait_band() {
        let policy = DemoFallbackPolicy::new(true);
        let calm = policy.mock_content(&Preferences {
            clickbait_level: 1,
            use_emojis: false,
            ..Preferences::default()
        });
        let loud = policy.mock_content(&Preferences {
            clickbait_level: 10,
            ..Preferences::default()
        });
        assert!(calm.title.starts_with("Marktupdate"));
        assert!(loud.title.starts_with("🚨 ALARM"));
    }

    #[test]
    fn mock_description_respects_language_and_emojis() {
        let policy = DemoFallbackPolicy::new(true);
        let en = policy.mock_content(&Preferences {
            language: Language::English,
            use_emojis: false,
            ..Preferences::default()
        });
        assert!(en.description.starts_with("In this video"));
        assert!(!en.description.contains('🔍'));

        let nl = policy.mock_content(&Preferences::default());
        assert!(nl.description.contains("🔍 Belangrijkste inzichten:"));
    }

    #[test]
    fn mock_hashtags_follow_preferences() {
        let policy = DemoFallbackPolicy::new(true);
        let none = policy.mock_content(&Preferences {
            use_hashtags: false,
            ..Preferences::default()
        });
        assert!(none.hashtags.is_empty());

        let many = policy.mock_content(&Preferences {
            extra_hashtags: "a, b, c, d, e, f, g".into(),
            ..Preferences::default()
        });
        assert_eq!(many.hashtags.len(), 10);
        assert_eq!(many.hashtags[0], "#crypto");
        assert_eq!(many.hashtags[5], "#a");
    }
}
