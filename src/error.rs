//! Error types for the extraction and normalization core.
//!
//! Neither error ever escapes [`crate::extractor::extract`] or
//! [`crate::normalizer::normalize`]; both are logged and downgraded there.
//! They are public so callers that want the reason can use the `try_*`
//! variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no element with id \"{0}\" found in document")]
    TargetNotFound(String),

    #[error("target element has an empty value")]
    EmptyPayload,

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is a JSON {0}, expected an array or object")]
    UnexpectedShape(&'static str),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("invalid target pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("record is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
