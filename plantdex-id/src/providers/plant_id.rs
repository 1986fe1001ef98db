//! Plant.id response shape
//!
//! ```text
//! { "result": { "classification": { "suggestions": [
//!     { "name": "...", "probability": 0.93,
//!       "details": { "common_names": ["..."] },
//!       "similar_images": [ { "url": "https://..." } ] } ] } } }
//! ```

use super::{display_name, NormalizeError};
use crate::types::{IdentificationCandidate, Provider};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Response {
    result: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    classification: Classification,
}

#[derive(Debug, Deserialize)]
struct Classification {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    name: String,
    probability: f64,
    #[serde(default)]
    details: Option<Details>,
    #[serde(default)]
    similar_images: Option<Vec<SimilarImage>>,
}

#[derive(Debug, Deserialize)]
struct Details {
    #[serde(default)]
    common_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SimilarImage {
    url: String,
}

pub(super) fn normalize(raw: &serde_json::Value) -> Result<Vec<IdentificationCandidate>, NormalizeError> {
    let response = Response::deserialize(raw).map_err(|source| NormalizeError::Malformed {
        provider: Provider::PlantId,
        source,
    })?;

    Ok(response
        .result
        .classification
        .suggestions
        .into_iter()
        .filter(|s| !s.name.trim().is_empty())
        .map(|s| {
            let scientific = s.name.trim().to_string();
            let common_names = s
                .details
                .and_then(|d| d.common_names)
                .unwrap_or_default();
            let name = display_name(&common_names, &scientific);
            let image = s
                .similar_images
                .unwrap_or_default()
                .into_iter()
                .map(|i| i.url)
                .next();

            let mut candidate = IdentificationCandidate::new(name, s.probability, Provider::PlantId)
                .with_scientific_name(scientific);
            candidate.reference_image = image;
            candidate
        })
        .collect())
}
