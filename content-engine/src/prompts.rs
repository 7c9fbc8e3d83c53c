//! User-prompt builders. Pure string assembly; the instruction half of each
//! call comes from [`crate::templates`].

use crate::templates::trend_query;
use socialarch_core::{GeneratorRequest, Platform, Settings, TrendCategory};
use std::fmt::Write;

pub fn post_prompt(settings: &Settings, request: &GeneratorRequest) -> String {
    let mut prompt = format!(
        "Style: {}\nPlatform: {}\nLanguage: {}\nTopic: {}\n",
        settings.user_style.trim(),
        request.platform,
        settings.language_for(request.platform),
        request.topic.trim(),
    );
    if request.use_search {
        prompt.push_str(
            "Research: search the web first and ground the post in current, verifiable facts.\n",
        );
    }
    prompt.push_str("Task: Write a viral post. Output ONLY the content.");
    prompt
}

const HOOK_EXAMPLES: &str = r#"Examples of the desired tone:
- "Warning: The cheapest 3D quote is usually the most expensive choice in the long run."
- "AI won't replace 3D artists. It will replace SLOW artists."
- "You should NOT pay for a 3D model 'by the hour.' Here's the critical reason why."
- "What should a 3D artist ask before starting to model?""#;

fn hook_nuance(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedIn => {
            "Focus on business, pricing, professional standards and client relations. Provocative career advice."
        }
        Platform::Twitter | Platform::Threads => {
            "Focus on hot takes, controversial opinions on software (Blender vs Maya), industry culture or relatable artist pain. Short and punchy."
        }
        Platform::Instagram | Platform::TikTok | Platform::Pinterest | Platform::YouTube => {
            "Focus on visual hooks: \"Stop doing this...\", \"My top 3 secrets...\", or process comparisons."
        }
        Platform::Telegram => {
            "Insider tips, \"real talk\" about the industry, unfiltered advice."
        }
        Platform::ArtStation => {
            "Focus on craft: technical breakdowns, portfolio mistakes, what recruiters notice."
        }
    }
}

pub fn hook_prompt(settings: &Settings, platform: Platform) -> String {
    format!(
        "Generate ONE PROVOCATIVE, VIRAL content hook/idea for a 3D artist specifically for {platform}.\n\n\
         {HOOK_EXAMPLES}\n\n\
         ADAPT FOR {platform}: {nuance}\n\n\
         REQUIREMENTS:\n\
         1. Use emojis appropriate for the tone.\n\
         2. Be controversial or extremely valuable (insider info).\n\
         3. Max 1-2 sentences.\n\
         4. Language: {language}\n\
         5. Output ONLY the text of the idea.",
        nuance = hook_nuance(platform),
        language = settings.language_for(platform),
    )
}

/// Demands exactly `platforms.len() * per_platform` records and spells out the
/// language of every requested platform.
pub fn ideas_prompt(settings: &Settings, platforms: &[Platform], per_platform: usize) -> String {
    let total = platforms.len() * per_platform;
    let mut prompt = format!(
        "Generate exactly {total} distinct content ideas: {per_platform} for each of the {} platforms below.\n\
         Style of the author: {}\n\nPLATFORMS:\n",
        platforms.len(),
        settings.user_style.trim(),
    );
    for platform in platforms {
        let _ = writeln!(
            prompt,
            "- {platform}: {per_platform} ideas, written in {}",
            settings.language_for(*platform)
        );
    }
    let _ = write!(
        prompt,
        "\nSet the \"platform\" field of every idea to one of the platform names above, exactly as written.\n\
         Return a STRICT JSON ARRAY of exactly {total} objects. No markdown code blocks."
    );
    prompt
}

pub fn trends_prompt(settings: &Settings, category: TrendCategory) -> String {
    let platforms = Platform::ALL.map(|platform| platform.as_str()).join(", ");
    format!(
        "{query}\n\n\
         CRITICAL INSTRUCTION:\n\
         After searching, compile your findings into a STRICT JSON ARRAY.\n\
         Do not include markdown code blocks. Just the raw array.\n\
         Write descriptions in {language}.\n\
         For \"platform\" use one of: {platforms}.\n\n\
         Format:\n\
         [{{ \"platform\": \"...\", \"trendName\": \"...\", \"description\": \"...\", \"hypeReason\": \"...\", \"growthMetric\": \"...\", \"difficulty\": \"...\", \"vibe\": \"...\" }}]",
        query = trend_query(category),
        language = settings.default_language(),
    )
}

pub fn image_prompt(settings: &Settings) -> String {
    format!(
        "Analyze this 3D render. Language: {}",
        settings.default_language()
    )
}

pub fn translate_prompt(text: &str, language: &str) -> String {
    format!(
        "Translate to {language}. Output ONLY the translation, keeping emojis, hashtags and line breaks:\n\n{text}"
    )
}

pub fn review_prompt(settings: &Settings, text: &str, platform: Platform) -> String {
    format!(
        "Critique this {platform} post for viral potential: \"{}\". Language: {}",
        text.trim(),
        settings.language_for(platform)
    )
}

/// Shared shape of the business and growth consultations.
pub fn advice_prompt(settings: &Settings, input: &str) -> String {
    format!(
        "Input: {}. Language: {}",
        input.trim(),
        settings.default_language()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_prompt_uses_platform_language() {
        let settings = Settings::default();
        let request = GeneratorRequest::new("Blender 5 release", Platform::Telegram);
        let prompt = post_prompt(&settings, &request);

        assert!(prompt.contains("Platform: Telegram"));
        assert!(prompt.contains("Language: Russian"));
        assert!(prompt.contains("Topic: Blender 5 release"));
        assert!(!prompt.contains("Research:"));

        let prompt = post_prompt(&settings, &request.with_search(true));
        assert!(prompt.contains("Research:"));
    }

    #[test]
    fn test_ideas_prompt_counts_and_languages() {
        let settings = Settings::default();
        let prompt = ideas_prompt(&settings, &[Platform::LinkedIn, Platform::Telegram], 3);

        assert!(prompt.contains("exactly 6"));
        assert!(prompt.contains("- LinkedIn: 3 ideas, written in English"));
        assert!(prompt.contains("- Telegram: 3 ideas, written in Russian"));
    }

    #[test]
    fn test_trends_prompt_differs_per_category() {
        let settings = Settings::default();
        let audio = trends_prompt(&settings, TrendCategory::Audio);
        let formats = trends_prompt(&settings, TrendCategory::Formats);

        assert_ne!(audio, formats);
        assert!(audio.starts_with(trend_query(TrendCategory::Audio)));
        assert!(formats.starts_with(trend_query(TrendCategory::Formats)));
        assert!(audio.contains("STRICT JSON ARRAY"));
        assert!(audio.contains("use one of: Telegram, Instagram, Twitter/X, LinkedIn"));
    }

    #[test]
    fn test_hook_prompt_nuance() {
        let settings = Settings::default();
        let prompt = hook_prompt(&settings, Platform::LinkedIn);
        assert!(prompt.contains("specifically for LinkedIn"));
        assert!(prompt.contains("Provocative career advice"));
        assert!(prompt.contains("Language: English"));
    }

    #[test]
    fn test_review_prompt_quotes_post() {
        let settings = Settings::default();
        let prompt = review_prompt(&settings, " New render! ", Platform::TikTok);
        assert!(prompt.contains("Critique this TikTok post"));
        assert!(prompt.contains("\"New render!\""));
        assert!(prompt.ends_with("Language: Russian"));
    }
}
