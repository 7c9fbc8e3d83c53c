use crate::error::*;
use std::fmt::Display;
use tracing::warn;

/// Stable codes and user-facing wording for the error taxonomy.
pub trait ErrorExt: Display {
    fn error_code(&self) -> &'static str;

    fn user_friendly_message(&self) -> String;

    fn log_warn(&self) -> &Self {
        warn!(code = self.error_code(), "{}", self);
        self
    }
}

impl ErrorExt for CoreError {
    fn error_code(&self) -> &'static str {
        match self {
            CoreError::Llm(_) => "LLM",
            CoreError::Database(_) => "DATABASE",
            CoreError::Config(_) => "CONFIG",
            CoreError::Io(_) => "IO",
            CoreError::Serialization(_) => "SERIALIZATION",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::Internal { .. } => "INTERNAL",
            CoreError::RequestFailed { .. } => "REQUEST_FAILED",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Llm(e) => e.user_friendly_message(),
            CoreError::Database(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) | CoreError::Io(_) => {
                "Could not reach the AI service. Check your network connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Nothing to send: {message}"),
            CoreError::RequestFailed {
                status_code: Some(code),
                ..
            } => format!("The AI service rejected the request (HTTP {code})."),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl ErrorExt for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            LlmError::AuthenticationFailed { .. } => "LLM_AUTH_FAILED",
            LlmError::InvalidApiKey { .. } => "LLM_INVALID_API_KEY",
            LlmError::RateLimitExceeded { .. } => "LLM_RATE_LIMIT",
            LlmError::ModelNotAvailable { .. } => "LLM_MODEL_NOT_AVAILABLE",
            LlmError::InvalidPrompt { .. } => "LLM_INVALID_PROMPT",
            LlmError::ContentFiltered { .. } => "LLM_CONTENT_FILTERED",
            LlmError::ServiceUnavailable { .. } => "LLM_SERVICE_UNAVAILABLE",
            LlmError::RequestTimeout { .. } => "LLM_TIMEOUT",
            LlmError::InvalidResponseFormat { .. } => "LLM_INVALID_RESPONSE",
            LlmError::MalformedOutput { .. } => "LLM_MALFORMED_OUTPUT",
            LlmError::UnsupportedBackend { .. } => "LLM_UNSUPPORTED_BACKEND",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LlmError::AuthenticationFailed { provider } | LlmError::InvalidApiKey { provider } => {
                format!("{provider} refused the API key. Check the key in your environment.")
            }
            LlmError::RateLimitExceeded {
                provider,
                retry_after,
            } => format!("{provider} is rate limiting requests. Wait {retry_after} seconds."),
            LlmError::ModelNotAvailable { model } => {
                format!("Model '{model}' is not available. Pick another one in the configuration.")
            }
            LlmError::ContentFiltered { .. } => {
                "The provider's safety filter blocked this request.".to_string()
            }
            LlmError::RequestTimeout { provider } => {
                format!("{provider} did not answer in time. Please try again.")
            }
            LlmError::MalformedOutput { .. } | LlmError::InvalidResponseFormat { .. } => {
                "The AI returned an answer that could not be read. Please try again.".to_string()
            }
            LlmError::UnsupportedBackend { .. } => UNSUPPORTED_BACKEND_MESSAGE.to_string(),
            LlmError::InvalidPrompt { .. } | LlmError::ServiceUnavailable { .. } => {
                "The AI service could not handle this request right now.".to_string()
            }
        }
    }
}

impl ErrorExt for DatabaseError {
    fn error_code(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed { .. } => "DB_CONNECTION_FAILED",
            DatabaseError::MigrationFailed { .. } => "DB_MIGRATION_FAILED",
            DatabaseError::CorruptValue { .. } => "DB_CORRUPT_VALUE",
            DatabaseError::Sql(_) => "DB_SQL_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatabaseError::CorruptValue { key, .. } => {
                format!("Saved data for '{key}' is unreadable and was ignored.")
            }
            _ => "The settings store is unavailable.".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR",
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => format!("Configuration file '{path}' not found."),
            ConfigError::MissingEnvironmentVariable { var_name } => {
                format!("Set the '{var_name}' environment variable to your API key.")
            }
            ConfigError::MissingField { field } | ConfigError::InvalidValue { field, .. } => {
                format!("Check the '{field}' entry in the configuration file.")
            }
            ConfigError::ValidationFailed { reason } => format!("Configuration is invalid: {reason}"),
            ConfigError::Parse(_) => "The configuration file is not valid TOML.".to_string(),
        }
    }
}
