//! Confidence scoring

pub mod confidence_scorer;

pub use confidence_scorer::{ConfidenceScorer, ScoringPolicy};
