//! Provider response normalizers
//!
//! Pl@ntNet and Plant.id answer with different JSON shapes. Each gets a
//! normalizer producing `IdentificationCandidate`s, selected by the explicit
//! `Provider` tag rather than by sniffing response keys.

pub mod plant_id;
pub mod plantnet;

use crate::types::{IdentificationCandidate, Provider};
use thiserror::Error;
use tracing::debug;

/// Normalizer error
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Response did not match the provider's documented shape
    #[error("Malformed {provider} response: {source}")]
    Malformed {
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    /// Response was well-formed but listed no usable candidate
    #[error("{0} returned no candidates")]
    NoCandidates(Provider),
}

/// Normalize a raw provider response into candidates
///
/// # Errors
/// - `NormalizeError::Malformed` when the JSON does not fit the provider shape
/// - `NormalizeError::NoCandidates` when nothing usable remains
pub fn normalize(
    provider: Provider,
    raw: &serde_json::Value,
) -> Result<Vec<IdentificationCandidate>, NormalizeError> {
    let candidates = match provider {
        Provider::PlantNet => plantnet::normalize(raw)?,
        Provider::PlantId => plant_id::normalize(raw)?,
    };

    if candidates.is_empty() {
        return Err(NormalizeError::NoCandidates(provider));
    }

    debug!(
        provider = %provider,
        candidate_count = candidates.len(),
        "Provider response normalized"
    );

    Ok(candidates)
}

/// First non-blank common name, falling back to the scientific name
pub(crate) fn display_name(common_names: &[String], scientific_name: &str) -> String {
    common_names
        .iter()
        .map(|n| n.trim())
        .find(|n| !n.is_empty())
        .unwrap_or(scientific_name.trim())
        .to_string()
}
