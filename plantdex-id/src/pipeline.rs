//! Identification Pipeline
//!
//! Wires the external collaborators through the decision layer and
//! assembles the final `PlantReport`.
//!
//! # Flow
//! 1. Identify → candidates (failure or empty result aborts)
//! 2. Ensemble vote → consensus + agreement
//! 3. Vision confidence from consensus probability and agreement
//! 4. LLM analysis, video search and wiki lookup run concurrently
//! 5. Analysis parsed and validated; rejected records become a notice
//! 6. Video thumbnails served from / written to the thumbnail cache
//! 7. Image chain: wiki → first video thumbnail → provider image → upload
//!
//! Only step 1 can fail the run. Every other collaborator failure removes
//! its contribution and is logged.

use crate::analysis::parse_nutrition_record;
use crate::config::DecisionComponents;
use crate::fusion::{consensus_probability, get_majority_vote, scientific_name_for};
use crate::scoring::ConfidenceScorer;
use crate::services::{resolve_image, ThumbnailCache};
use crate::types::{
    CollaboratorError, ConfidenceBand, IdentificationCandidate, ImageLayers, ImageLookup, Modality,
    NutritionRecord, PlantIdentifier, ResolvedImage, SafetyAnalyzer, VideoMeta, VideoSearch,
};
use crate::validators::{ContentValidator, FALLBACK_NOTICE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default number of videos kept in a report
pub const DEFAULT_MAX_VIDEOS: usize = 3;

/// Pipeline error
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Identification collaborator failed
    #[error("Identification failed: {0}")]
    Identification(#[source] CollaboratorError),

    /// Identification succeeded but produced no candidate
    #[error("No identification candidate found")]
    NoCandidates,
}

/// External services the pipeline calls
#[derive(Clone)]
pub struct Collaborators {
    pub identifier: Arc<dyn PlantIdentifier>,
    pub analyzer: Arc<dyn SafetyAnalyzer>,
    pub videos: Arc<dyn VideoSearch>,
    pub images: Arc<dyn ImageLookup>,
}

/// Final user-facing identification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantReport {
    pub name: String,
    pub scientific_name: Option<String>,
    /// 0-100
    pub confidence: u8,
    pub band: ConfidenceBand,
    /// Fraction of candidates agreeing with `name`
    pub agreement: f64,
    pub image: Option<ResolvedImage>,
    /// Present only when every field passed validation
    pub nutrition: Option<NutritionRecord>,
    /// Shown instead of `nutrition` when it was rejected or unavailable
    pub nutrition_notice: Option<String>,
    pub videos: Vec<VideoMeta>,
}

/// Identification Pipeline
pub struct IdentificationPipeline {
    collaborators: Collaborators,
    scorer: ConfidenceScorer,
    validator: ContentValidator,
    cache: ThumbnailCache,
    max_videos: usize,
}

impl IdentificationPipeline {
    pub fn new(collaborators: Collaborators, components: DecisionComponents) -> Self {
        Self {
            collaborators,
            scorer: components.scorer,
            validator: components.validator,
            cache: components.cache,
            max_videos: DEFAULT_MAX_VIDEOS,
        }
    }

    /// Limit the number of videos attached to a report
    pub fn with_max_videos(mut self, max_videos: usize) -> Self {
        self.max_videos = max_videos;
        self
    }

    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// Identify `image` and assemble the report
    ///
    /// `user_upload` is the URL of the user's own photo, used as the last
    /// image fallback.
    ///
    /// # Errors
    /// Only identification failures abort the run.
    pub async fn run(&self, image: &[u8], user_upload: Option<String>) -> Result<PlantReport, PipelineError> {
        let candidates = self
            .collaborators
            .identifier
            .identify(image)
            .await
            .map_err(PipelineError::Identification)?;

        let vote = get_majority_vote(&candidates).map_err(|_| PipelineError::NoCandidates)?;
        let scientific_name = scientific_name_for(&candidates, &vote).map(str::to_string);
        let vision_score = consensus_probability(&candidates, &vote);
        let vision_confidence =
            self.scorer
                .calculate_score(vision_score, vote.agreement, Modality::Vision);

        info!(
            consensus = %vote.consensus,
            agreement = vote.agreement,
            vision_confidence,
            "Identification resolved"
        );

        let lookup_query = scientific_name.as_deref().unwrap_or(&vote.consensus);
        let video_query = format!("{} plant care", vote.consensus);

        let (analysis, videos, wiki) = tokio::join!(
            self.collaborators
                .analyzer
                .analyze_safety(&vote.consensus, scientific_name.as_deref()),
            self.collaborators.videos.search_videos(&video_query),
            self.collaborators.images.lookup_image(lookup_query),
        );

        let (nutrition, confidence) = self.assess_analysis(analysis, vision_score, vision_confidence);

        let videos = match videos {
            Ok(videos) => self.attach_thumbnails(videos).await,
            Err(e) => {
                warn!("Video search failed, continuing without videos: {}", e);
                Vec::new()
            }
        };

        let wiki = wiki.unwrap_or_else(|e| {
            warn!("Wiki image lookup failed: {}", e);
            None
        });

        let layers = ImageLayers {
            wiki,
            youtube: videos.first().map(|v| v.thumbnail_url.clone()),
            api_provided: provider_image(&candidates, &vote.consensus),
            user_upload,
        };

        let nutrition_notice = nutrition.is_none().then(|| FALLBACK_NOTICE.to_string());

        Ok(PlantReport {
            name: vote.consensus,
            scientific_name,
            confidence,
            band: self.scorer.band(confidence),
            agreement: vote.agreement,
            image: resolve_image(&layers),
            nutrition,
            nutrition_notice,
            videos,
        })
    }

    /// Validate the analysis and settle the final confidence
    ///
    /// Templated analysis text is scored as a zero-consistency LLM signal and
    /// the lower of the two confidences is reported.
    fn assess_analysis(
        &self,
        analysis: Result<String, CollaboratorError>,
        vision_score: f64,
        vision_confidence: u8,
    ) -> (Option<NutritionRecord>, u8) {
        let text = match analysis {
            Ok(text) => text,
            Err(e) => {
                warn!("Analysis unavailable: {}", e);
                return (None, vision_confidence);
            }
        };

        let confidence = if self.scorer.detect_hallucination(&text) {
            let llm_confidence = self.scorer.calculate_score(vision_score, 0.0, Modality::Llm);
            debug!(llm_confidence, "Analysis text contains generic filler");
            vision_confidence.min(llm_confidence)
        } else {
            vision_confidence
        };

        let nutrition = match parse_nutrition_record(&text) {
            Ok(record) => self.validator.validate_nutrition(record),
            Err(e) => {
                warn!("Analysis could not be parsed: {}", e);
                None
            }
        };

        (nutrition, confidence)
    }

    /// Replace thumbnails with cached ones, caching any new ones
    async fn attach_thumbnails(&self, videos: Vec<VideoMeta>) -> Vec<VideoMeta> {
        let mut attached = Vec::with_capacity(videos.len().min(self.max_videos));

        for mut video in videos.into_iter().take(self.max_videos) {
            match self.cache.get(&video.video_id).await {
                Ok(Some(url)) => video.thumbnail_url = url,
                Ok(None) if !video.thumbnail_url.trim().is_empty() => {
                    if let Err(e) = self.cache.set(&video.video_id, &video.thumbnail_url).await {
                        warn!(video_id = %video.video_id, "Thumbnail cache write failed: {}", e);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(video_id = %video.video_id, "Thumbnail cache read failed: {}", e);
                }
            }
            attached.push(video);
        }

        attached
    }
}

/// First non-blank provider image among candidates agreeing with the consensus
fn provider_image(candidates: &[IdentificationCandidate], consensus: &str) -> Option<String> {
    candidates
        .iter()
        .filter(|c| c.name == consensus)
        .find_map(|c| {
            c.reference_image
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    #[test]
    fn test_provider_image_prefers_agreeing_candidates() {
        let candidates = vec![
            IdentificationCandidate::new("Rosmarinus", 0.2, Provider::PlantId)
                .with_reference_image("http://api/rosemary.jpg"),
            IdentificationCandidate::new("Lavandula", 0.8, Provider::PlantNet),
            IdentificationCandidate::new("Lavandula", 0.7, Provider::PlantId)
                .with_reference_image("http://api/lavender.jpg"),
        ];

        assert_eq!(
            provider_image(&candidates, "Lavandula").as_deref(),
            Some("http://api/lavender.jpg")
        );
        assert_eq!(provider_image(&candidates, "Mentha"), None);
    }

    #[test]
    fn test_provider_image_skips_blank_urls() {
        let candidates = vec![
            IdentificationCandidate::new("Lavandula", 0.9, Provider::PlantNet).with_reference_image("  "),
            IdentificationCandidate::new("Lavandula", 0.8, Provider::PlantId)
                .with_reference_image("http://api/lavender.jpg"),
        ];

        assert_eq!(
            provider_image(&candidates, "Lavandula").as_deref(),
            Some("http://api/lavender.jpg")
        );
    }
}
