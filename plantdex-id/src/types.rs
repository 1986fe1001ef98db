//! Core Types and Collaborator Traits
//!
//! Records flowing through the decision layer, plus the async traits the
//! external services (identification, LLM analysis, video search, wiki
//! image lookup) are injected through.
//!
//! # Data flow
//! candidates → ensemble vote → confidence score → validated nutrition
//! record → image chain + thumbnail cache → `PlantReport`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Identification
// ============================================================================

/// Identification provider a candidate originated from
///
/// Explicit tag used to pick the matching response normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    PlantNet,
    PlantId,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::PlantNet => "PlantNet",
            Provider::PlantId => "PlantId",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification candidate returned by an identification provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationCandidate {
    /// Display label, compared exactly when voting
    pub name: String,
    /// Binomial name, when the provider reports one
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Provider probability (0.0-1.0)
    #[serde(deserialize_with = "deserialize_probability")]
    pub probability: f64,
    /// Originating provider
    pub source: Provider,
    /// Provider-supplied reference image URL
    #[serde(default)]
    pub reference_image: Option<String>,
}

impl IdentificationCandidate {
    /// Create a candidate with probability clamped to 0.0-1.0
    ///
    /// NaN probabilities are stored as 0.0.
    pub fn new(name: impl Into<String>, probability: f64, source: Provider) -> Self {
        Self {
            name: name.into(),
            scientific_name: None,
            probability: clamp_probability(probability),
            source,
            reference_image: None,
        }
    }

    pub fn with_scientific_name(mut self, scientific_name: impl Into<String>) -> Self {
        self.scientific_name = Some(scientific_name.into());
        self
    }

    pub fn with_reference_image(mut self, url: impl Into<String>) -> Self {
        self.reference_image = Some(url.into());
        self
    }
}

fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

fn deserialize_probability<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_probability)
}

/// Consensus label and the fraction of candidates backing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleVote {
    /// Most frequent candidate name
    pub consensus: String,
    /// votes / total, always within 0.0-1.0
    pub agreement: f64,
    /// Candidates whose name equals the consensus
    pub votes: usize,
    /// Total candidates considered
    pub total: usize,
}

/// Fusion error
#[derive(Debug, Error)]
pub enum FusionError {
    /// Not enough input to fuse
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

// ============================================================================
// Confidence
// ============================================================================

/// Origin of the signal being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Vision,
    Llm,
}

/// Inputs to the confidence scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    /// Vision model score (0.0-1.0)
    pub vision_score: f64,
    /// Cross-signal consistency (0.0-1.0)
    pub consistency_score: f64,
    pub modality: Modality,
}

/// Coarse confidence class for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// 85 and above
    High,
    /// 60-84
    Medium,
    /// Below 60
    Low,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "High",
            ConfidenceBand::Medium => "Medium",
            ConfidenceBand::Low => "Low",
        }
    }
}

// ============================================================================
// Generative content
// ============================================================================

/// Nutrient summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrients {
    pub vitamins: String,
    pub minerals: String,
}

/// One health hint (label plus description)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthHint {
    pub label: String,
    pub desc: String,
}

/// Nutrition facts produced by the LLM collaborator
///
/// Either accepted whole or rejected whole by the content validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub nutrients: Nutrients,
    #[serde(default)]
    pub health_hints: Vec<HealthHint>,
    pub specific_usage: String,
}

// ============================================================================
// Images and videos
// ============================================================================

/// Candidate image URLs, one per source, in no particular state of health
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLayers {
    pub wiki: Option<String>,
    pub youtube: Option<String>,
    pub api_provided: Option<String>,
    pub user_upload: Option<String>,
}

/// Which layer an image was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    Wiki,
    Youtube,
    ApiProvided,
    UserUpload,
}

/// Selected image and the layer that supplied it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub source: ImageSource,
    pub url: String,
}

/// Video search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMeta {
    pub title: String,
    pub channel: String,
    pub video_id: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
}

// ============================================================================
// External collaborators
// ============================================================================

/// Failure reported by an external collaborator
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The service answered but found nothing
    #[error("No result: {0}")]
    NoResult(String),

    /// The service could not be reached or failed
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something unusable
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Image → identification candidates
#[async_trait::async_trait]
pub trait PlantIdentifier: Send + Sync {
    async fn identify(&self, image: &[u8]) -> Result<Vec<IdentificationCandidate>, CollaboratorError>;
}

/// Plant name → raw generative analysis text (may be fenced JSON)
#[async_trait::async_trait]
pub trait SafetyAnalyzer: Send + Sync {
    async fn analyze_safety(
        &self,
        name: &str,
        scientific_name: Option<&str>,
    ) -> Result<String, CollaboratorError>;
}

/// Query → video hits
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, query: &str) -> Result<Vec<VideoMeta>, CollaboratorError>;
}

/// Query → wiki thumbnail URL, if any
#[async_trait::async_trait]
pub trait ImageLookup: Send + Sync {
    async fn lookup_image(&self, query: &str) -> Result<Option<String>, CollaboratorError>;
}
