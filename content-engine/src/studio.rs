use crate::prompts;
use crate::templates::{template_for, BusinessMode, GrowthMode, TemplateKey};
use llm_interface::{normalize_records, Backends, Invocation, LlmBackend};
use socialarch_core::{
    failure_text, ContentIdea, CoreError, GeneratorRequest, ImageAttachment, Outcome, Platform,
    Settings, TrendCategory, TrendItem,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Upper bound on ideas requested per platform in one batch.
pub const MAX_IDEAS_PER_PLATFORM: usize = 5;

/// Entry points consumed by the UI. Every call is independent: pick the
/// template, build the prompt, make one backend call, normalise.
///
/// `try_*` methods return explicit errors; the plain methods always yield a
/// renderable value wrapped in an [`Outcome`].
#[derive(Clone)]
pub struct Studio {
    backends: Backends,
}

impl Studio {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Studio over a single hosted backend with the standard unsupported stubs.
    pub fn hosted(cloud: Arc<dyn LlmBackend>) -> Self {
        Self::new(Backends::hosted(cloud))
    }

    async fn call(&self, settings: &Settings, invocation: Invocation) -> Result<String, CoreError> {
        let backend = self.backends.for_settings(settings);
        debug!(
            "Dispatching to {} backend ({} prompt chars)",
            backend.name(),
            invocation.prompt.len()
        );
        backend.invoke(&invocation).await
    }

    pub async fn try_generate_post(
        &self,
        settings: &Settings,
        request: &GeneratorRequest,
    ) -> Result<String, CoreError> {
        if request.topic.trim().is_empty() {
            return Err(CoreError::invalid_input("topic is empty"));
        }
        info!("Generating {} post", request.platform);
        let invocation = Invocation::new(prompts::post_prompt(settings, request))
            .with_instruction(template_for(TemplateKey::Generator).into_string())
            .with_live_search(request.use_search);
        self.call(settings, invocation).await
    }

    pub async fn generate_post(&self, settings: &Settings, request: &GeneratorRequest) -> Outcome<String> {
        Outcome::from_result(self.try_generate_post(settings, request).await, |e| {
            failure_text("Error generating post. Check API Key. Details:", e)
        })
    }

    pub async fn try_generate_hook(
        &self,
        settings: &Settings,
        platform: Platform,
    ) -> Result<String, CoreError> {
        info!("Generating single hook for {}", platform);
        let invocation = Invocation::new(prompts::hook_prompt(settings, platform));
        self.call(settings, invocation).await
    }

    pub async fn generate_hook(&self, settings: &Settings, platform: Platform) -> Outcome<String> {
        Outcome::from_result(self.try_generate_hook(settings, platform).await, |e| {
            failure_text("Error generating idea:", e)
        })
    }

    pub async fn try_generate_ideas(
        &self,
        settings: &Settings,
        platforms: &[Platform],
        per_platform: usize,
    ) -> Result<Vec<ContentIdea>, CoreError> {
        self.generate_ideas(settings, platforms, per_platform)
            .await
            .into_result()
    }

    /// Batch of hooks across platforms, each in that platform's language.
    pub async fn generate_ideas(
        &self,
        settings: &Settings,
        platforms: &[Platform],
        per_platform: usize,
    ) -> Outcome<Vec<ContentIdea>> {
        let platforms = dedup_platforms(platforms);
        let context = platforms.first().copied().unwrap_or(Platform::Instagram);

        let raw = match validate_batch(&platforms, per_platform) {
            Ok(()) => {
                info!(
                    "Generating {} ideas across {} platforms",
                    platforms.len() * per_platform,
                    platforms.len()
                );
                let invocation =
                    Invocation::new(prompts::ideas_prompt(settings, &platforms, per_platform))
                        .with_instruction(template_for(TemplateKey::Ideas).into_string());
                self.call(settings, invocation).await
            }
            Err(error) => Err(error),
        };

        normalize_records::<ContentIdea>(raw, &context)
    }

    pub async fn try_scan_trends(
        &self,
        settings: &Settings,
        category: TrendCategory,
    ) -> Result<Vec<TrendItem>, CoreError> {
        self.scan_trends(settings, category).await.into_result()
    }

    /// Live-search trend scan. Records the model leaves untagged get the
    /// requested category.
    pub async fn scan_trends(&self, settings: &Settings, category: TrendCategory) -> Outcome<Vec<TrendItem>> {
        info!("Scanning {} trends", category);
        let invocation = Invocation::new(prompts::trends_prompt(settings, category))
            .with_instruction(template_for(TemplateKey::Trends(category)).into_string())
            .with_live_search(true);
        let raw = self.call(settings, invocation).await;

        normalize_records::<TrendItem>(raw, &category).map(|mut trends| {
            for trend in &mut trends {
                trend.category.get_or_insert(category);
            }
            trends
        })
    }

    pub async fn try_critique_image(
        &self,
        settings: &Settings,
        image: &ImageAttachment,
    ) -> Result<String, CoreError> {
        info!("Critiquing {} render", image.mime_type());
        let invocation = Invocation::new(prompts::image_prompt(settings))
            .with_instruction(template_for(TemplateKey::Critique).into_string())
            .with_attachment(image.clone());
        self.call(settings, invocation).await
    }

    pub async fn critique_image(&self, settings: &Settings, image: &ImageAttachment) -> Outcome<String> {
        Outcome::from_result(self.try_critique_image(settings, image).await, |e| {
            failure_text("Vision Error:", e)
        })
    }

    pub async fn try_translate(
        &self,
        settings: &Settings,
        text: &str,
        language: &str,
    ) -> Result<String, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::invalid_input("nothing to translate"));
        }
        let language = match language.trim() {
            "" => settings.default_language(),
            language => language,
        };
        info!("Translating {} chars to {}", text.len(), language);
        self.call(settings, Invocation::new(prompts::translate_prompt(text, language)))
            .await
    }

    /// Falls back to the untranslated text, except for the unsupported-backend
    /// advisory which is surfaced as is.
    pub async fn translate(&self, settings: &Settings, text: &str, language: &str) -> Outcome<String> {
        Outcome::from_result(self.try_translate(settings, text, language).await, |e| {
            if e.is_unsupported_backend() {
                failure_text("", e)
            } else {
                text.to_string()
            }
        })
    }

    pub async fn try_review_post(
        &self,
        settings: &Settings,
        text: &str,
        platform: Platform,
    ) -> Result<String, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::invalid_input("post is empty"));
        }
        info!("Reviewing {} post", platform);
        self.call(
            settings,
            Invocation::new(prompts::review_prompt(settings, text, platform)),
        )
        .await
    }

    pub async fn review_post(&self, settings: &Settings, text: &str, platform: Platform) -> Outcome<String> {
        Outcome::from_result(self.try_review_post(settings, text, platform).await, |e| {
            failure_text("Analysis failed:", e)
        })
    }

    pub async fn try_business_advice(
        &self,
        settings: &Settings,
        input: &str,
        mode: BusinessMode,
    ) -> Result<String, CoreError> {
        info!("Business consultation ({})", mode);
        let invocation = Invocation::new(prompts::advice_prompt(settings, input))
            .with_instruction(template_for(TemplateKey::Business(mode)).into_string());
        self.call(settings, invocation).await
    }

    pub async fn business_advice(&self, settings: &Settings, input: &str, mode: BusinessMode) -> Outcome<String> {
        Outcome::from_result(self.try_business_advice(settings, input, mode).await, |e| {
            failure_text("Business AI Error:", e)
        })
    }

    pub async fn try_growth_advice(
        &self,
        settings: &Settings,
        input: &str,
        mode: GrowthMode,
    ) -> Result<String, CoreError> {
        info!("Career consultation ({})", mode);
        let invocation = Invocation::new(prompts::advice_prompt(settings, input))
            .with_instruction(template_for(TemplateKey::Growth(mode)).into_string());
        self.call(settings, invocation).await
    }

    pub async fn growth_advice(&self, settings: &Settings, input: &str, mode: GrowthMode) -> Outcome<String> {
        Outcome::from_result(self.try_growth_advice(settings, input, mode).await, |e| {
            failure_text("Growth AI Error:", e)
        })
    }
}

fn dedup_platforms(platforms: &[Platform]) -> Vec<Platform> {
    let mut unique = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !unique.contains(platform) {
            unique.push(*platform);
        }
    }
    unique
}

fn validate_batch(platforms: &[Platform], per_platform: usize) -> Result<(), CoreError> {
    if platforms.is_empty() {
        return Err(CoreError::invalid_input("no platforms selected"));
    }
    if !(1..=MAX_IDEAS_PER_PLATFORM).contains(&per_platform) {
        return Err(CoreError::invalid_input(format!(
            "ideas per platform must be between 1 and {MAX_IDEAS_PER_PLATFORM}, got {per_platform}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let platforms = dedup_platforms(&[
            Platform::Threads,
            Platform::LinkedIn,
            Platform::Threads,
        ]);
        assert_eq!(platforms, vec![Platform::Threads, Platform::LinkedIn]);
    }

    #[test]
    fn test_batch_validation() {
        assert!(validate_batch(&[], 3).is_err());
        assert!(validate_batch(&[Platform::Telegram], 0).is_err());
        assert!(validate_batch(&[Platform::Telegram], MAX_IDEAS_PER_PLATFORM + 1).is_err());
        assert!(validate_batch(&[Platform::Telegram], 1).is_ok());
    }
}
