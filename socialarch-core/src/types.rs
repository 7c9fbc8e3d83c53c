use crate::error::CoreError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Platform {
    Telegram,
    Instagram,
    #[serde(rename = "Twitter/X")]
    Twitter,
    LinkedIn,
    ArtStation,
    TikTok,
    YouTube,
    Pinterest,
    Threads,
}

impl Platform {
    pub const ALL: [Platform; 9] = [
        Platform::Telegram,
        Platform::Instagram,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::ArtStation,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Pinterest,
        Platform::Threads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Telegram => "Telegram",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter/X",
            Platform::LinkedIn => "LinkedIn",
            Platform::ArtStation => "ArtStation",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Pinterest => "Pinterest",
            Platform::Threads => "Threads",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown platform: {0}")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let platform = match normalized.as_str() {
            "telegram" => Platform::Telegram,
            "instagram" => Platform::Instagram,
            "twitter/x" | "twitter" | "x" => Platform::Twitter,
            "linkedin" => Platform::LinkedIn,
            "artstation" => Platform::ArtStation,
            "tiktok" => Platform::TikTok,
            "youtube" | "youtube shorts" => Platform::YouTube,
            "pinterest" => Platform::Pinterest,
            "threads" => Platform::Threads,
            _ => return Err(ParsePlatformError(s.to_string())),
        };
        Ok(platform)
    }
}

impl TryFrom<String> for Platform {
    type Error = ParsePlatformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Platform name as reported by a live search: one of ours, or the model's own
/// label kept verbatim ("Instagram Reels", "Behance").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlatformLabel {
    Known(Platform),
    Other(String),
}

impl PlatformLabel {
    pub fn known(&self) -> Option<Platform> {
        match self {
            PlatformLabel::Known(platform) => Some(*platform),
            PlatformLabel::Other(_) => None,
        }
    }
}

impl From<Platform> for PlatformLabel {
    fn from(platform: Platform) -> Self {
        PlatformLabel::Known(platform)
    }
}

impl From<String> for PlatformLabel {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(platform) => PlatformLabel::Known(platform),
            Err(_) => PlatformLabel::Other(value.trim().to_string()),
        }
    }
}

impl From<PlatformLabel> for String {
    fn from(label: PlatformLabel) -> Self {
        label.to_string()
    }
}

impl fmt::Display for PlatformLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformLabel::Known(platform) => f.write_str(platform.as_str()),
            PlatformLabel::Other(label) => f.write_str(label),
        }
    }
}

impl PartialEq<Platform> for PlatformLabel {
    fn eq(&self, other: &Platform) -> bool {
        self.known() == Some(*other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LlmSource {
    #[default]
    #[serde(rename = "Cloud Gemini")]
    CloudGemini,
    #[serde(rename = "Local LLM")]
    Local,
    #[serde(rename = "Custom API")]
    CustomApi,
}

impl LlmSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmSource::CloudGemini => "Cloud Gemini",
            LlmSource::Local => "Local LLM",
            LlmSource::CustomApi => "Custom API",
        }
    }
}

impl fmt::Display for LlmSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud" | "gemini" | "cloud gemini" => Ok(LlmSource::CloudGemini),
            "local" | "local llm" => Ok(LlmSource::Local),
            "custom" | "custom api" => Ok(LlmSource::CustomApi),
            other => Err(CoreError::invalid_input(format!(
                "unknown LLM source '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrendCategory {
    #[default]
    General,
    #[serde(rename = "Viral Audio", alias = "Audio")]
    Audio,
    #[serde(rename = "Video Formats", alias = "Formats")]
    Formats,
    #[serde(rename = "Hashtags & Plots", alias = "Plots")]
    Plots,
}

impl TrendCategory {
    pub const ALL: [TrendCategory; 4] = [
        TrendCategory::General,
        TrendCategory::Audio,
        TrendCategory::Formats,
        TrendCategory::Plots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::General => "General",
            TrendCategory::Audio => "Viral Audio",
            TrendCategory::Formats => "Video Formats",
            TrendCategory::Plots => "Hashtags & Plots",
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(TrendCategory::General),
            "audio" | "viral audio" => Ok(TrendCategory::Audio),
            "formats" | "video formats" => Ok(TrendCategory::Formats),
            "plots" | "hashtags" | "hashtags & plots" => Ok(TrendCategory::Plots),
            other => Err(CoreError::invalid_input(format!(
                "unknown trend category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendItem {
    pub platform: PlatformLabel,
    pub trend_name: String,
    pub description: String,
    pub hype_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TrendCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
}

impl TrendItem {
    /// Topic handed to the post generator when the user acts on a trend.
    /// Trends on a platform we do not write for are drafted for Instagram.
    pub fn to_request(&self) -> GeneratorRequest {
        GeneratorRequest {
            topic: format!(
                "{}: {}. Focus on: {}.",
                self.trend_name, self.description, self.hype_reason
            ),
            platform: self.platform.known().unwrap_or(Platform::Instagram),
            use_search: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub headline: String,
    pub platform: Platform,
    pub target_audience: String,
    pub goal: String,
    pub reasoning: String,
}

impl ContentIdea {
    pub fn to_request(&self) -> GeneratorRequest {
        GeneratorRequest {
            topic: self.headline.clone(),
            platform: self.platform,
            use_search: false,
        }
    }
}

/// Placeholder record substituted for a failed or malformed array response.
pub trait SentinelRecord: Sized {
    /// What the caller asked for, echoed back on the placeholder.
    type Context;

    fn sentinel(context: &Self::Context, reason: &str) -> Self;
}

impl SentinelRecord for TrendItem {
    type Context = TrendCategory;

    fn sentinel(category: &TrendCategory, reason: &str) -> Self {
        Self {
            platform: Platform::Instagram.into(),
            trend_name: "Search Error".to_string(),
            description: "Could not fetch live trends. Check the API key and network access."
                .to_string(),
            hype_reason: reason.to_string(),
            category: Some(*category),
            growth_metric: None,
            difficulty: None,
            vibe: None,
        }
    }
}

impl SentinelRecord for ContentIdea {
    type Context = Platform;

    fn sentinel(platform: &Platform, reason: &str) -> Self {
        Self {
            headline: "Error".to_string(),
            platform: *platform,
            target_audience: "-".to_string(),
            goal: "Error".to_string(),
            reasoning: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorRequest {
    pub topic: String,
    pub platform: Platform,
    pub use_search: bool,
}

impl GeneratorRequest {
    pub fn new(topic: impl Into<String>, platform: Platform) -> Self {
        Self {
            topic: topic.into(),
            platform,
            use_search: false,
        }
    }

    pub fn with_search(mut self, use_search: bool) -> Self {
        self.use_search = use_search;
        self
    }
}

/// Inline image sent alongside a prompt, already base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime_type: String,
    data: String,
}

impl ImageAttachment {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Result<Self, CoreError> {
        let mime_type = validate_mime(mime_type.into())?;
        if bytes.is_empty() {
            return Err(CoreError::invalid_input("image payload is empty"));
        }
        Ok(Self {
            mime_type,
            data: STANDARD.encode(bytes),
        })
    }

    /// Accepts a bare base64 payload or a `data:<mime>;base64,<payload>` URL.
    /// The media type embedded in a data URL wins over `mime_type`.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self, CoreError> {
        let mut mime_type = mime_type.into();
        let mut payload = payload.trim();

        if let Some(rest) = payload.strip_prefix("data:") {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| CoreError::invalid_input("malformed data URL"))?;
            if let Some(declared) = header.strip_suffix(";base64") {
                if !declared.is_empty() {
                    mime_type = declared.to_string();
                }
            } else {
                return Err(CoreError::invalid_input("data URL is not base64 encoded"));
            }
            payload = body;
        }

        let mime_type = validate_mime(mime_type)?;
        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| CoreError::invalid_input(format!("invalid base64 image: {e}")))?;
        if decoded.is_empty() {
            return Err(CoreError::invalid_input("image payload is empty"));
        }

        Ok(Self {
            mime_type,
            data: payload.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

fn validate_mime(mime_type: String) -> Result<String, CoreError> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if mime_type.starts_with("image/") && mime_type.len() > "image/".len() {
        Ok(mime_type)
    } else {
        Err(CoreError::invalid_input(format!(
            "unsupported media type '{mime_type}'"
        )))
    }
}
