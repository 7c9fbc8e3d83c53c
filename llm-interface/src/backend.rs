use crate::unsupported::UnsupportedBackend;
use async_trait::async_trait;
use socialarch_core::{CoreError, ImageAttachment, LlmSource, Settings};
use std::sync::Arc;

/// One request to the model: behavioural constraints, task content and the
/// optional extras a call can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub instruction: Option<String>,
    pub prompt: String,
    pub attachment: Option<ImageAttachment>,
    pub use_live_search: bool,
}

impl Invocation {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            instruction: None,
            prompt: prompt.into(),
            attachment: None,
            use_live_search: false,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_attachment(mut self, attachment: ImageAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_live_search(mut self, enabled: bool) -> Self {
        self.use_live_search = enabled;
        self
    }
}

/// A single outbound round trip to a text generator.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, invocation: &Invocation) -> Result<String, CoreError>;
}

/// One backend per configurable source; callers pick by `Settings::llm_source`.
#[derive(Clone)]
pub struct Backends {
    cloud: Arc<dyn LlmBackend>,
    local: Arc<dyn LlmBackend>,
    custom: Arc<dyn LlmBackend>,
}

impl Backends {
    /// Hosted backend plus the unsupported stubs for local and custom sources.
    pub fn hosted(cloud: Arc<dyn LlmBackend>) -> Self {
        Self {
            cloud,
            local: Arc::new(UnsupportedBackend::new(LlmSource::Local)),
            custom: Arc::new(UnsupportedBackend::new(LlmSource::CustomApi)),
        }
    }

    pub fn with_local(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.local = backend;
        self
    }

    pub fn with_custom(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.custom = backend;
        self
    }

    pub fn for_source(&self, source: LlmSource) -> &dyn LlmBackend {
        match source {
            LlmSource::CloudGemini => self.cloud.as_ref(),
            LlmSource::Local => self.local.as_ref(),
            LlmSource::CustomApi => self.custom.as_ref(),
        }
    }

    pub fn for_settings(&self, settings: &Settings) -> &dyn LlmBackend {
        self.for_source(settings.llm_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBackend;

    #[tokio::test]
    async fn test_selection_follows_settings() {
        let cloud = Arc::new(RecordingBackend::replying("cloud answer"));
        let backends = Backends::hosted(cloud.clone());

        let mut settings = Settings::default();
        let answer = backends
            .for_settings(&settings)
            .invoke(&Invocation::new("hi"))
            .await
            .unwrap();
        assert_eq!(answer, "cloud answer");

        settings.llm_source = LlmSource::CustomApi;
        let result = backends
            .for_settings(&settings)
            .invoke(&Invocation::new("hi"))
            .await;
        assert!(result.unwrap_err().is_unsupported_backend());
        assert_eq!(cloud.call_count(), 1);
    }

    #[test]
    fn test_invocation_builder() {
        let invocation = Invocation::new("prompt")
            .with_instruction("be brief")
            .with_live_search(true);
        assert_eq!(invocation.instruction.as_deref(), Some("be brief"));
        assert!(invocation.use_live_search);
        assert!(invocation.attachment.is_none());
    }
}
