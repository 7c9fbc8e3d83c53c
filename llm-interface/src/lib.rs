//! Backend client for the content assistant: one round trip per call to the
//! configured model, plus normalisation of JSON answers into typed records.

pub mod backend;
pub mod gemini;
pub mod response;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod unsupported;

pub use backend::{Backends, Invocation, LlmBackend};
pub use gemini::GeminiBackend;
pub use response::{normalize_records, parse_json_array, strip_code_fences};
pub use unsupported::UnsupportedBackend;
