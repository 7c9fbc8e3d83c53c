use crate::backend::{Invocation, LlmBackend};
use async_trait::async_trait;
use socialarch_core::{CoreError, LlmError, LlmSource};
use tracing::debug;

/// Stand-in for backends this deployment cannot reach. Never touches the network.
#[derive(Debug, Clone)]
pub struct UnsupportedBackend {
    source: LlmSource,
}

impl UnsupportedBackend {
    pub fn new(source: LlmSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl LlmBackend for UnsupportedBackend {
    fn name(&self) -> &str {
        self.source.as_str()
    }

    async fn invoke(&self, _invocation: &Invocation) -> Result<String, CoreError> {
        debug!("Rejecting call for unsupported backend {}", self.source);
        Err(LlmError::UnsupportedBackend {
            backend: self.source,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialarch_core::{ErrorExt, UNSUPPORTED_BACKEND_MESSAGE};

    #[test]
    fn test_always_returns_advisory() {
        let backend = UnsupportedBackend::new(LlmSource::Local);
        assert_eq!(backend.name(), "Local LLM");

        let error = tokio_test::block_on(backend.invoke(&Invocation::new("anything")))
            .unwrap_err();
        assert_eq!(error.user_friendly_message(), UNSUPPORTED_BACKEND_MESSAGE);
    }
}
