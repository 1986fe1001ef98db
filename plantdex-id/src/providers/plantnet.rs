//! Pl@ntNet response shape
//!
//! ```text
//! { "results": [ { "score": 0.91,
//!                  "species": { "scientificNameWithoutAuthor": "...",
//!                               "commonNames": ["..."] },
//!                  "images": [ { "url": { "m": "https://..." } } ] } ] }
//! ```

use super::{display_name, NormalizeError};
use crate::types::{IdentificationCandidate, Provider};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Response {
    results: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    score: f64,
    species: Species,
    #[serde(default)]
    images: Option<Vec<Image>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Species {
    scientific_name_without_author: String,
    #[serde(default)]
    common_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: ImageUrl,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    #[serde(default)]
    m: Option<String>,
    #[serde(default)]
    o: Option<String>,
}

pub(super) fn normalize(raw: &serde_json::Value) -> Result<Vec<IdentificationCandidate>, NormalizeError> {
    let response = Response::deserialize(raw).map_err(|source| NormalizeError::Malformed {
        provider: Provider::PlantNet,
        source,
    })?;

    Ok(response
        .results
        .into_iter()
        .filter(|r| !r.species.scientific_name_without_author.trim().is_empty())
        .map(|r| {
            let scientific = r.species.scientific_name_without_author.trim().to_string();
            let common_names = r.species.common_names.unwrap_or_default();
            let name = display_name(&common_names, &scientific);
            let image = r
                .images
                .unwrap_or_default()
                .into_iter()
                .find_map(|i| i.url.m.or(i.url.o));

            let mut candidate = IdentificationCandidate::new(name, r.score, Provider::PlantNet)
                .with_scientific_name(scientific);
            candidate.reference_image = image;
            candidate
        })
        .collect())
}
