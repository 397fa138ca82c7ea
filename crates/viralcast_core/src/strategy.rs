//! Channel and content strategy types.

use serde::{Deserialize, Serialize};

/// Content niche a channel publishes in.
///
/// The upper-case string form (`"DESIGN"`, `"MOVIES"`, `"NEWS"`) is the niche
/// classifier handed to image generators.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use viralcast_core::NicheType;
///
/// assert_eq!(NicheType::Movies.to_string(), "MOVIES");
/// assert_eq!(NicheType::from_str("NEWS").unwrap(), NicheType::News);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NicheType {
    /// Design and creative work
    Design,
    /// Movies and entertainment
    Movies,
    /// News and current events
    News,
}

impl NicheType {
    /// Human-readable description used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            NicheType::Design => "design and creative work",
            NicheType::Movies => "movies and entertainment",
            NicheType::News => "news and current events",
        }
    }
}

/// Voice of the generated copy.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentTone {
    /// Emotional, personal
    #[default]
    Emotional,
    /// Bold, provocative
    Aggressive,
    /// Premium, aspirational
    Luxury,
    /// Sparse, restrained
    Minimalist,
    /// Data-driven
    Analytical,
}

/// Language the channel publishes in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SupportedLanguage {
    /// English
    En,
    /// Russian
    #[default]
    Ru,
    /// Uzbek
    Uz,
    /// Kyrgyz
    Kg,
    /// Tajik
    Tj,
}

impl SupportedLanguage {
    /// English name of the language, for prompts.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::En => "English",
            SupportedLanguage::Ru => "Russian",
            SupportedLanguage::Uz => "Uzbek",
            SupportedLanguage::Kg => "Kyrgyz",
            SupportedLanguage::Tj => "Tajik",
        }
    }
}

/// How a channel's content should be written and paced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingStrategy {
    /// Voice of the copy
    #[serde(default)]
    pub tone: ContentTone,
    /// Relative posting intensity (0-100)
    #[serde(default = "default_intensity")]
    pub posting_intensity: u32,
    /// Free-form audience description
    #[serde(default)]
    pub target_audience: String,
    /// Keywords the copy should lean on
    #[serde(default)]
    pub focus_keywords: Vec<String>,
    /// Regions the market analysis covers
    #[serde(default)]
    pub regions: Vec<String>,
    /// Posts generated per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Target number of posts per day
    #[serde(default = "default_batch_size")]
    pub daily_target: u32,
    /// Publication language
    #[serde(default)]
    pub language: SupportedLanguage,
}

fn default_intensity() -> u32 {
    50
}

fn default_batch_size() -> u32 {
    1
}

impl Default for MarketingStrategy {
    fn default() -> Self {
        Self {
            tone: ContentTone::default(),
            posting_intensity: default_intensity(),
            target_audience: String::new(),
            focus_keywords: Vec::new(),
            regions: Vec::new(),
            batch_size: default_batch_size(),
            daily_target: default_batch_size(),
            language: SupportedLanguage::default(),
        }
    }
}

/// A publishing channel and its strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    /// Local identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Telegram chat id or `@channel` handle
    pub channel_id: String,
    /// Content niche
    pub niche: NicheType,
    /// Whether the channel is currently served
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Content strategy
    #[serde(default)]
    pub strategy: MarketingStrategy,
}

fn default_active() -> bool {
    true
}
