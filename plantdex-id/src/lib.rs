//! plantdex-id library interface
//!
//! Decision layer between low-trust identification signals and the final
//! user-facing plant report.

pub mod analysis;
pub mod config;
pub mod db;
pub mod fusion;
pub mod metrics;
pub mod pipeline;
pub mod providers;
pub mod scoring;
pub mod services;
pub mod types;
pub mod validators;

pub use crate::fusion::ensemble_voter::get_majority_vote;
pub use crate::pipeline::{Collaborators, IdentificationPipeline, PipelineError, PlantReport};
pub use crate::scoring::ConfidenceScorer;
pub use crate::services::image_resolver::resolve_image;
pub use crate::services::thumbnail_cache::ThumbnailCache;
pub use crate::validators::{ContentValidator, HallucinationDetector};
