use super::types::*;
use crate::backend::{Invocation, LlmBackend};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use socialarch_core::{ConfigError, CoreError, GeminiConfig, LlmError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const PROVIDER: &str = "Gemini";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Hosted Gemini model reached over the `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiBackend {
    /// Builds the backend from configuration, reading the key from the
    /// environment. Missing credentials are a deployment error and surface here.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, CoreError> {
        let api_key = config.api_key()?;
        Self::new(api_key, config)
    }

    pub fn new(api_key: impl Into<String>, config: &GeminiConfig) -> Result<Self, CoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvironmentVariable {
                var_name: config.api_key_env.clone(),
            }
            .into());
        }

        let http_client = Client::builder()
            .user_agent(concat!("social-arch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    pub(crate) fn build_request(invocation: &Invocation) -> GenerateContentRequest {
        let system_instruction = invocation.instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![Part::Text { text: text.clone() }],
        });

        let mut parts = vec![Part::Text {
            text: invocation.prompt.clone(),
        }];
        if let Some(image) = &invocation.attachment {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: image.mime_type().to_string(),
                    data: image.data().to_string(),
                },
            });
        }

        let tools = if invocation.use_live_search {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            tools,
        }
    }

    async fn map_error_status(&self, response: Response) -> CoreError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        error!("Gemini request failed with status {}: {}", status, message);

        match status {
            StatusCode::BAD_REQUEST => LlmError::InvalidPrompt { reason: message }.into(),
            StatusCode::UNAUTHORIZED => LlmError::InvalidApiKey {
                provider: PROVIDER.to_string(),
            }
            .into(),
            StatusCode::FORBIDDEN => LlmError::AuthenticationFailed {
                provider: PROVIDER.to_string(),
            }
            .into(),
            StatusCode::NOT_FOUND => LlmError::ModelNotAvailable {
                model: self.model.clone(),
            }
            .into(),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                warn!("Rate limited, retry after {} seconds", retry_after);
                LlmError::RateLimitExceeded {
                    provider: PROVIDER.to_string(),
                    retry_after,
                }
                .into()
            }
            s if s.is_server_error() => LlmError::ServiceUnavailable {
                provider: PROVIDER.to_string(),
            }
            .into(),
            s => CoreError::RequestFailed {
                message,
                status_code: Some(s.as_u16()),
            },
        }
    }

    pub(crate) fn extract_text(body: &GenerateContentResponse) -> Result<String, CoreError> {
        if let Some(reason) = body.block_reason() {
            return Err(LlmError::ContentFiltered {
                reason: reason.to_string(),
            }
            .into());
        }

        let text = body.text().ok_or_else(|| LlmError::InvalidResponseFormat {
            provider: PROVIDER.to_string(),
            details: "response contained no candidates".to_string(),
        })?;

        if text.is_empty() {
            let finish_reason = body
                .candidates
                .first()
                .and_then(|candidate| candidate.finish_reason.as_deref());
            if matches!(finish_reason, Some("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST")) {
                return Err(LlmError::ContentFiltered {
                    reason: finish_reason.unwrap_or_default().to_string(),
                }
                .into());
            }
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn invoke(&self, invocation: &Invocation) -> Result<String, CoreError> {
        let request = Self::build_request(invocation);
        let start_time = Instant::now();

        info!(
            "Calling {} (live search: {}, image: {})",
            self.model,
            invocation.use_live_search,
            invocation.attachment.is_some()
        );

        let response = match self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error calling {}: {}", self.model, e);
                if e.is_timeout() {
                    return Err(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    }
                    .into());
                }
                return Err(CoreError::Network(e));
            }
        };

        if !response.status().is_success() {
            return Err(self.map_error_status(response).await);
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::from(LlmError::RequestTimeout {
                    provider: PROVIDER.to_string(),
                })
            } else {
                error!("Failed to decode Gemini response: {}", e);
                CoreError::from(LlmError::InvalidResponseFormat {
                    provider: PROVIDER.to_string(),
                    details: e.to_string(),
                })
            }
        })?;

        let text = Self::extract_text(&body)?;
        debug!(
            "Gemini answered {} chars in {:?} (timeout {:?})",
            text.len(),
            start_time.elapsed(),
            self.timeout
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use socialarch_core::ImageAttachment;

    fn config() -> GeminiConfig {
        GeminiConfig::default()
    }

    #[test]
    fn test_request_body_shape() {
        let image = ImageAttachment::from_bytes("image/png", b"render").unwrap();
        let invocation = Invocation::new("Analyze this 3D render.")
            .with_instruction("You are an art director.")
            .with_attachment(image)
            .with_live_search(true);

        let body = serde_json::to_value(GeminiBackend::build_request(&invocation)).unwrap();

        assert_eq!(
            body,
            json!({
                "systemInstruction": { "parts": [{ "text": "You are an art director." }] },
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "Analyze this 3D render." },
                        { "inlineData": { "mimeType": "image/png", "data": "cmVuZGVy" } }
                    ]
                }],
                "tools": [{ "googleSearch": {} }]
            })
        );
    }

    #[test]
    fn test_plain_request_omits_optional_fields() {
        let body =
            serde_json::to_value(GeminiBackend::build_request(&Invocation::new("hi"))).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "Hello " },
                    { "text": "world" }
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(GeminiBackend::extract_text(&body).unwrap(), "Hello world");
    }

    #[test]
    fn test_extract_text_reports_blocks_and_empty_bodies() {
        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(matches!(
            GeminiBackend::extract_text(&blocked),
            Err(CoreError::Llm(LlmError::ContentFiltered { .. }))
        ));

        let empty = GenerateContentResponse::default();
        assert!(matches!(
            GeminiBackend::extract_text(&empty),
            Err(CoreError::Llm(LlmError::InvalidResponseFormat { .. }))
        ));

        let no_text: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        assert_eq!(GeminiBackend::extract_text(&no_text).unwrap(), "");
    }

    #[test]
    fn test_empty_key_rejected_at_construction() {
        let result = GeminiBackend::new("  ", &config());
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::MissingEnvironmentVariable { .. }))
        ));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let mut config = config();
        config.base_url = "http://localhost:8080/v1beta/".to_string();
        let backend = GeminiBackend::new("key", &config).unwrap();
        assert_eq!(
            backend.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_an_error() {
        let mut config = config();
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 5;
        let backend = GeminiBackend::new("key", &config).unwrap();

        let result = backend.invoke(&Invocation::new("hello")).await;
        assert!(matches!(
            result,
            Err(CoreError::Network(_)) | Err(CoreError::Llm(LlmError::RequestTimeout { .. }))
        ));
    }
}
