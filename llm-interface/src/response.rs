//! Turns free-form model output into typed record arrays.

use serde::de::DeserializeOwned;
use socialarch_core::{CoreError, ErrorExt, LlmError, Outcome, SentinelRecord};
use tracing::{debug, warn};

/// Removes every fenced-code marker the model may have wrapped around JSON.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Strict parse of a JSON array of records. No salvage of partial output;
/// an empty array counts as malformed because callers always need a record.
pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, LlmError> {
    let cleaned = strip_code_fences(text);
    let records: Vec<T> =
        serde_json::from_str(&cleaned).map_err(|e| LlmError::MalformedOutput {
            details: e.to_string(),
        })?;

    if records.is_empty() {
        return Err(LlmError::MalformedOutput {
            details: "model returned an empty array".to_string(),
        });
    }

    debug!("Parsed {} records from model output", records.len());
    Ok(records)
}

/// Parses a raw backend answer, substituting a single sentinel record for any
/// transport or parse failure.
pub fn normalize_records<T>(raw: Result<String, CoreError>, context: &T::Context) -> Outcome<Vec<T>>
where
    T: DeserializeOwned + SentinelRecord,
{
    let parsed = raw.and_then(|text| parse_json_array::<T>(&text).map_err(CoreError::from));
    if let Err(error) = &parsed {
        warn!("Substituting sentinel record ({})", error.error_code());
    }
    Outcome::from_result(parsed, |error| vec![T::sentinel(context, &sentinel_reason(error))])
}

fn sentinel_reason(error: &CoreError) -> String {
    if error.is_unsupported_backend() {
        error.user_friendly_message()
    } else {
        error.to_string()
    }
}
