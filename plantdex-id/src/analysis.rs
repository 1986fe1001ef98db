//! Generative text parsing
//!
//! The LLM collaborator returns free text that should be JSON but is often
//! wrapped in a markdown fence (```` ```json ... ``` ````) or padded with
//! prose. This module peels that off and deserializes the payload.

use crate::types::NutritionRecord;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Analysis parsing error
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Nothing left after stripping whitespace and fences
    #[error("Analysis text is empty")]
    Empty,

    /// Payload is not the expected JSON
    #[error("Analysis JSON invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Remove a surrounding markdown code fence, if present
///
/// The language tag after the opening fence (`json`, `JSON`, ...) is
/// dropped with it. Text without a fence is returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the language tag up to the end of the opening line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse fenced or bare JSON into any deserializable type
///
/// Prose around a single JSON object is tolerated: parsing is retried on the
/// span between the first `{` and the last `}`.
pub fn parse_generative_json<T: DeserializeOwned>(raw: &str) -> Result<T, AnalysisError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(AnalysisError::Empty);
    }

    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
                return Err(first_err.into());
            };
            if end <= start {
                return Err(first_err.into());
            }

            debug!("Retrying analysis parse on embedded JSON object");
            serde_json::from_str(&body[start..=end]).map_err(|_| first_err.into())
        }
    }
}

/// Parse the LLM analysis into a `NutritionRecord`
///
/// The result is not yet trusted; pass it through the content validator.
pub fn parse_nutrition_record(raw: &str) -> Result<NutritionRecord, AnalysisError> {
    parse_generative_json(raw)
}
