//! Degraded results for the always-a-value boundary.
//!
//! Internally every operation returns `Result<T, CoreError>`. The outer façade
//! converts failures into a renderable placeholder but keeps the error around,
//! so callers and tests can still tell a real answer from a fallback.

use crate::{CoreError, ErrorExt};
use tracing::warn;

#[derive(Debug)]
pub enum Outcome<T> {
    /// The provider answered and the answer was usable.
    Fresh(T),
    /// The operation failed; `value` is the placeholder shown instead.
    Degraded { value: T, error: CoreError },
}

impl<T> Outcome<T> {
    /// Keeps `Ok` values and substitutes `fallback(&error)` for failures.
    pub fn from_result<F>(result: Result<T, CoreError>, fallback: F) -> Self
    where
        F: FnOnce(&CoreError) -> T,
    {
        match result {
            Ok(value) => Outcome::Fresh(value),
            Err(error) => {
                error.log_warn();
                let value = fallback(&error);
                Outcome::Degraded { value, error }
            }
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Outcome::Fresh(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Fresh(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Outcome::Fresh(_) => None,
            Outcome::Degraded { error, .. } => Some(error),
        }
    }

    /// The renderable value, whether fresh or a placeholder.
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Fresh(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    /// Back to an explicit result, dropping the placeholder.
    pub fn into_result(self) -> Result<T, CoreError> {
        match self {
            Outcome::Fresh(value) => Ok(value),
            Outcome::Degraded { error, .. } => Err(error),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Fresh(value) => Outcome::Fresh(f(value)),
            Outcome::Degraded { value, error } => Outcome::Degraded {
                value: f(value),
                error,
            },
        }
    }
}

/// Placeholder text for a failed text operation: the fixed advisory when the
/// backend is unsupported, otherwise `prefix` followed by the error message.
pub fn failure_text(prefix: &str, error: &CoreError) -> String {
    if error.is_unsupported_backend() {
        error.user_friendly_message()
    } else {
        warn!("Degrading text result: {}", error);
        format!("{prefix} {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LlmError, LlmSource, UNSUPPORTED_BACKEND_MESSAGE};

    #[test]
    fn test_fresh_result_passes_through() {
        let outcome = Outcome::from_result(Ok("post".to_string()), |_| "fallback".to_string());
        assert!(outcome.is_fresh());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.into_inner(), "post");
    }

    #[test]
    fn test_failure_keeps_error_and_placeholder() {
        let outcome: Outcome<String> = Outcome::from_result(
            Err(CoreError::invalid_input("topic is empty")),
            |e| format!("failed: {e}"),
        );

        assert!(outcome.is_degraded());
        assert!(matches!(outcome.error(), Some(CoreError::InvalidInput { .. })));
        assert_eq!(outcome.value(), "failed: Invalid input: topic is empty");
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_map_preserves_degradation() {
        let outcome: Outcome<Vec<u8>> =
            Outcome::from_result(Err(CoreError::invalid_input("x")), |_| vec![1]);
        let mapped = outcome.map(|v| v.len());
        assert!(mapped.is_degraded());
        assert_eq!(*mapped.value(), 1);
    }

    #[test]
    fn test_failure_text_for_unsupported_backend() {
        let error = CoreError::Llm(LlmError::UnsupportedBackend {
            backend: LlmSource::Local,
        });
        assert_eq!(failure_text("Ignored:", &error), UNSUPPORTED_BACKEND_MESSAGE);

        let error = CoreError::invalid_input("empty topic");
        assert_eq!(
            failure_text("Business AI Error:", &error),
            "Business AI Error: Invalid input: empty topic"
        );
    }
}
