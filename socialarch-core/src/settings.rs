//! User-facing settings and the per-platform language resolver.

use crate::types::{LlmSource, Platform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_STYLE: &str = "Professional 3D Artist & Blogger. Expert yet approachable. Values high-quality visuals, transparency in process, and career growth.";

/// Used when neither a platform override nor the global language is set.
pub const FALLBACK_LANGUAGE: &str = "English";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub user_style: String,
    pub target_language: String,
    pub platform_languages: BTreeMap<Platform, String>,
    pub llm_source: LlmSource,
    pub custom_api_url: String,
    pub custom_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_style: DEFAULT_STYLE.to_string(),
            target_language: FALLBACK_LANGUAGE.to_string(),
            platform_languages: default_platform_languages(),
            llm_source: LlmSource::CloudGemini,
            custom_api_url: String::new(),
            custom_api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn language_for(&self, platform: Platform) -> &str {
        resolve_language(self, platform)
    }

    pub fn set_platform_language(&mut self, platform: Platform, language: impl Into<String>) {
        self.platform_languages.insert(platform, language.into());
    }

    pub fn reset_platform_languages(&mut self) {
        self.platform_languages = default_platform_languages();
    }

    /// Global language with the same blank-value fallback as the resolver.
    pub fn default_language(&self) -> &str {
        non_blank(&self.target_language).unwrap_or(FALLBACK_LANGUAGE)
    }
}

/// Telegram, TikTok, Threads and YouTube audiences are Russian-speaking; the rest English.
pub fn default_platform_languages() -> BTreeMap<Platform, String> {
    Platform::ALL
        .iter()
        .map(|platform| {
            let language = match platform {
                Platform::Telegram | Platform::TikTok | Platform::Threads | Platform::YouTube => {
                    "Russian"
                }
                _ => "English",
            };
            (*platform, language.to_string())
        })
        .collect()
}

/// Override first, then the global default, then [`FALLBACK_LANGUAGE`].
pub fn resolve_language(settings: &Settings, platform: Platform) -> &str {
    settings
        .platform_languages
        .get(&platform)
        .and_then(|language| non_blank(language))
        .unwrap_or_else(|| settings.default_language())
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_settings(target: &str) -> Settings {
        Settings {
            target_language: target.to_string(),
            platform_languages: BTreeMap::new(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_override_wins_over_global() {
        let mut settings = bare_settings("Spanish");
        settings.set_platform_language(Platform::LinkedIn, "German");

        assert_eq!(resolve_language(&settings, Platform::LinkedIn), "German");
        assert_eq!(resolve_language(&settings, Platform::Telegram), "Spanish");
    }

    #[test]
    fn test_every_platform_resolves() {
        let mut settings = bare_settings("French");
        settings.set_platform_language(Platform::TikTok, "Japanese");

        for platform in Platform::ALL {
            let expected = if platform == Platform::TikTok {
                "Japanese"
            } else {
                "French"
            };
            assert_eq!(settings.language_for(platform), expected);
        }
    }

    #[test]
    fn test_blank_override_falls_back() {
        let mut settings = bare_settings("Chinese");
        settings.set_platform_language(Platform::Pinterest, "   ");
        assert_eq!(settings.language_for(Platform::Pinterest), "Chinese");
    }

    #[test]
    fn test_everything_blank_uses_fallback() {
        let mut settings = bare_settings("");
        settings.set_platform_language(Platform::Threads, "");
        assert_eq!(settings.language_for(Platform::Threads), FALLBACK_LANGUAGE);
    }

    #[test]
    fn test_default_language_map() {
        let settings = Settings::default();
        assert_eq!(settings.language_for(Platform::Telegram), "Russian");
        assert_eq!(settings.language_for(Platform::YouTube), "Russian");
        assert_eq!(settings.language_for(Platform::LinkedIn), "English");
        assert_eq!(settings.platform_languages.len(), Platform::ALL.len());
    }

    #[test]
    fn test_reset_restores_language_map_only() {
        let mut settings = Settings::default();
        settings.target_language = "German".to_string();
        settings.set_platform_language(Platform::Telegram, "English");
        settings.platform_languages.remove(&Platform::LinkedIn);

        settings.reset_platform_languages();

        assert_eq!(settings.platform_languages, default_platform_languages());
        assert_eq!(settings.language_for(Platform::Telegram), "Russian");
        assert_eq!(settings.target_language, "German");
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"targetLanguage":"German","llmSource":"Local LLM"}"#)
                .unwrap();

        assert_eq!(settings.target_language, "German");
        assert_eq!(settings.llm_source, LlmSource::Local);
        assert_eq!(settings.user_style, DEFAULT_STYLE);
        assert_eq!(settings.language_for(Platform::Telegram), "Russian");
    }

    #[test]
    fn test_platform_keys_round_trip_through_json() {
        let mut settings = Settings::default();
        settings.set_platform_language(Platform::Twitter, "Spanish");

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"Twitter/X\":\"Spanish\""));

        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
    }
}
