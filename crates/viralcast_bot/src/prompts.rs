//! Prompt and schema templates for analysis and post writing.

use serde_json::{Value, json};
use viralcast_core::{MarketingStrategy, NicheType, SupportedLanguage};

/// Analysis text used when a provider answers with nothing.
pub const ANALYSIS_FALLBACK: &str = "Analysis complete.";

/// Research prompt for a niche and its target regions.
pub(crate) fn analysis_prompt(niche: NicheType, regions: &[String], language: SupportedLanguage) -> String {
    let regions = if regions.is_empty() {
        "worldwide".to_string()
    } else {
        regions.join(", ")
    };

    format!(
        "Run a DEEP analysis of the \"{niche}\" niche to plan viral content.\n\n\
         REGIONS: {regions}\n\n\
         Cover the following:\n\n\
         1. TRENDS AND VIRAL CONTENT: topics going viral right now, formats with the \
         widest reach, emotions and triggers that work best.\n\
         2. AUDIENCE: who follows this niche in {regions}, their problems and interests, \
         the language and style that resonates with them.\n\
         3. COMPETITION: what successful channels do, which hashtags and formats they use, \
         what works and what does not.\n\
         4. CURRENT EVENTS: events and news in this niche and how to turn them into posts; \
         links to marketplaces such as Wildberries or Ozon where relevant.\n\
         5. RECOMMENDATIONS: concrete post ideas with viral potential, the best time to \
         publish, recommended visual styles.\n\n\
         Answer strictly in {language}, at least 500 words.",
        niche = niche.label(),
        regions = regions,
        language = language.name(),
    )
}

/// System instruction for the analysis call.
pub(crate) fn analysis_system(language: SupportedLanguage) -> String {
    format!(
        "You are a top viral marketing expert and trend analyst with 15+ years of experience. \
         Deliver concrete, actionable insights for viral content, grounded in current data \
         and specific examples. Write strictly in {}; English is allowed only for technical \
         terms and image prompts.",
        language.name()
    )
}

/// Prompt asking for one post built on `insights`.
pub(crate) fn post_prompt(
    niche: NicheType,
    strategy: &MarketingStrategy,
    insights: &str,
    channel_id: &str,
) -> String {
    let mut prompt = format!(
        "Based on this research: {insights}\n\n\
         Write a viral post for the Telegram channel {channel}.\n\
         Niche: {niche}.\n\
         Tone: {tone}.\n",
        insights = insights,
        channel = channel_id,
        niche = niche,
        tone = strategy.tone,
    );

    if !strategy.target_audience.is_empty() {
        prompt.push_str(&format!("Audience: {}.\n", strategy.target_audience));
    }
    if !strategy.focus_keywords.is_empty() {
        prompt.push_str(&format!("Keywords: {}.\n", strategy.focus_keywords.join(", ")));
    }

    prompt.push_str(&format!(
        "\nAll text fields must be written in {}.",
        strategy.language.name()
    ));
    prompt
}

/// System instruction for the post call.
pub(crate) fn post_system(language: SupportedLanguage) -> String {
    format!(
        "You write content for a {} language Telegram channel. Your goal is maximum reach \
         and engagement. Structure the answer as JSON.",
        language.name()
    )
}

/// JSON schema of a generated post.
///
/// # Examples
///
/// ```
/// let schema = viralcast_bot::post_schema(viralcast_core::SupportedLanguage::En);
/// assert_eq!(schema["required"].as_array().map(|r| r.len()), Some(7));
/// ```
pub fn post_schema(language: SupportedLanguage) -> Value {
    let language = language.name();
    json!({
        "type": "object",
        "properties": {
            "hook": {"type": "string", "description": format!("Attention-grabbing headline in {}", language)},
            "content": {"type": "string", "description": format!("Main post text in {}", language)},
            "emotionalTrigger": {"type": "string", "description": format!("Emotional trigger in {}", language)},
            "cta": {"type": "string", "description": format!("Call to action in {}", language)},
            "hashtags": {"type": "array", "items": {"type": "string"}, "description": "Hashtags without the leading #"},
            "imagePrompt": {"type": "string", "description": "Image generation prompt, in English"},
            "suggestedHoursDelay": {"type": "number", "description": "Suggested delay before publishing, in hours"}
        },
        "required": ["hook", "content", "emotionalTrigger", "cta", "hashtags", "imagePrompt", "suggestedHoursDelay"]
    })
}

/// [`post_schema`] in Gemini's `responseSchema` dialect.
///
/// Gemini names schema types in upper case (`OBJECT`, `STRING`, ...); fields,
/// descriptions and `required` are unchanged.
pub fn gemini_post_schema(language: SupportedLanguage) -> Value {
    gemini_types(post_schema(language))
}

fn gemini_types(schema: Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| match (key.as_str(), value) {
                    ("type", Value::String(ty)) => (key, Value::String(ty.to_uppercase())),
                    (_, value) => (key, gemini_types(value)),
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(gemini_types).collect()),
        other => other,
    }
}
