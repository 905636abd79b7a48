//! Prompt templates for title/description generation.

use crate::models::preferences::{ClickbaitBand, Language, Preferences};
use crate::services::provider::ChatRequest;

pub const GENERATION_TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT_NL: &str = r#"Je bent een ervaren Nederlandstalige content-editor voor Cryptoriez (focus: trading, crypto & forex, marktbreakdowns, updates).

Stijl:
- Duidelijk, concreet, "no nonsense"
- Geen overbodige vakjargon; leg kort uit voor niet-technische kijkers
- Houd het geloofwaardig: prikkelende titels zijn oké, maar geen misleiding
- Zet inhoud voorop; clickbait-intensiteit bepaalt scherpte/urgentie, niet de waarheid
- Respecteer voorkeuren voor emoji's en hashtags

Taken:
1) Bedenk 1 sterke, platform-agnostische titel op basis van transcript + topic_hint
2) Schrijf een beschrijving met:
   - 2–5 kerninzichten of takeaways
   - Korte context "wat betekent dit voor markt/risico/sentiment"
   - Call-to-action (bv. volg voor meer breakdowns)
3) Voeg optioneel hashtags toe (relevant, 5–10 max)

Uitvoer in JSON met velden: title, description, hashtags (array)."#;

const SYSTEM_PROMPT_EN: &str = r#"You are an experienced English-speaking content editor for Cryptoriez (focus: trading, crypto & forex, market breakdowns, updates).

Style:
- Clear, concrete, "no nonsense"
- No unnecessary jargon; explain briefly for non-technical viewers
- Keep it credible: engaging titles are okay, but no deception
- Put content first; clickbait intensity determines sharpness/urgency, not truth
- Respect preferences for emojis and hashtags

Tasks:
1) Create 1 strong, platform-agnostic title based on transcript + topic_hint
2) Write a description with:
   - 2-5 key insights or takeaways
   - Brief context "what this means for market/risk/sentiment"
   - Call-to-action (e.g., follow for more breakdowns)
3) Optionally add hashtags (relevant, 5-10 max)

Output in JSON with fields: title, description, hashtags (array)."#;

/// Localized fragments of the user prompt.
struct Phrases {
    language_label: &'static str,
    emojis_allowed: &'static str,
    emojis_forbidden: &'static str,
    hashtags_wanted: &'static str,
    hashtags_forbidden: &'static str,
    rubric: &'static str,
    target_band: &'static str,
    transcript_label: &'static str,
}

static DUTCH: Phrases = Phrases {
    language_label: "Taal",
    emojis_allowed: "Je mag emoji's gebruiken waar relevant.",
    emojis_forbidden: "Gebruik geen emoji's.",
    hashtags_wanted: "Sluit af met 5–10 relevante hashtags.",
    hashtags_forbidden: "Voeg géén hashtags toe.",
    rubric: "- 0–2: informatief, neutraal
- 3–5: prikkelend, concreet
- 6–8: urgent, sterk hook
- 9–10: zeer agressief (maar geloofwaardig, geen sensationalisme/garanties)",
    target_band: "Gekozen stijl",
    transcript_label: "Transcript (ruw, samenvatten & opschonen):",
};

static ENGLISH: Phrases = Phrases {
    language_label: "Language",
    emojis_allowed: "You may use emojis where relevant.",
    emojis_forbidden: "Do not use emojis.",
    hashtags_wanted: "End with 5-10 relevant hashtags.",
    hashtags_forbidden: "Do not add hashtags.",
    rubric: "- 0-2: informative, neutral
- 3-5: engaging, concrete
- 6-8: urgent, strong hook
- 9-10: very aggressive (but credible, no sensationalism/guarantees)",
    target_band: "Selected style",
    transcript_label: "Transcript (raw, summarize & clean up):",
};

fn phrases(language: Language) -> &'static Phrases {
    match language {
        Language::Dutch => &DUTCH,
        Language::English => &ENGLISH,
    }
}

fn intensity_line(language: Language, level: u8) -> String {
    match language {
        Language::Dutch => format!("Clickbait-intensiteit: {level} op 10."),
        Language::English => format!("Clickbait intensity: {level} out of 10."),
    }
}

fn band_label(language: Language, band: ClickbaitBand) -> &'static str {
    match (language, band) {
        (Language::Dutch, ClickbaitBand::Informative) => "informatief, neutraal",
        (Language::Dutch, ClickbaitBand::Engaging) => "prikkelend, concreet",
        (Language::Dutch, ClickbaitBand::Urgent) => "urgent, sterk hook",
        (Language::Dutch, ClickbaitBand::Aggressive) => {
            "zeer agressief (maar geloofwaardig, geen sensationalisme/garanties)"
        }
        (Language::English, ClickbaitBand::Informative) => "informative, neutral",
        (Language::English, ClickbaitBand::Engaging) => "engaging, concrete",
        (Language::English, ClickbaitBand::Urgent) => "urgent, strong hook",
        (Language::English, ClickbaitBand::Aggressive) => {
            "very aggressive (but credible, no sensationalism/guarantees)"
        }
    }
}

pub fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::Dutch => SYSTEM_PROMPT_NL,
        Language::English => SYSTEM_PROMPT_EN,
    }
}

pub fn user_prompt(transcript: &str, prefs: &Preferences) -> String {
    let p = phrases(prefs.language);
    let emoji_rule = if prefs.use_emojis {
        p.emojis_allowed
    } else {
        p.emojis_forbidden
    };
    let hashtag_rule = if prefs.use_hashtags {
        p.hashtags_wanted
    } else {
        p.hashtags_forbidden
    };

    format!(
        "{label}: {code}\nPlatforms: {platforms}\nTopic hint: {hint}\n\n{emoji_rule}\n{hashtag_rule}\n{intensity}\n{rubric}\n{target}: {band}\n\n{transcript_label}\n\"\"\"{transcript}\"\"\"",
        label = p.language_label,
        code = prefs.language.code(),
        platforms = prefs.platform_list(),
        hint = prefs.topic_hint_or_default(),
        intensity = intensity_line(prefs.language, prefs.clickbait_level),
        rubric = p.rubric,
        target = p.target_band,
        band = band_label(prefs.language, prefs.clickbait_band()),
        transcript_label = p.transcript_label,
        transcript = transcript.trim(),
    )
}

/// Render the full prompt pair for one generation call.
pub fn build_chat_request(transcript: &str, prefs: &Preferences) -> ChatRequest {
    ChatRequest {
        system: system_prompt(prefs.language).to_string(),
        user: user_prompt(transcript, prefs),
        temperature: GENERATION_TEMPERATURE,
    }
}
