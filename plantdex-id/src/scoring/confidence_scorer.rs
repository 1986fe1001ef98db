//! Confidence Scorer
//!
//! Combines a vision score with a cross-signal consistency score into one
//! integer confidence in 0-100. The adjustment depends on modality.
//!
//! # Scoring
//! ```text
//! base = round(vision_score * 100)
//! vision: consistency >= 0.9 → base + 5
//! llm:    consistency <  0.5 → base - 20
//! result = clamp(base + adjustment, 0, 100)
//! ```
//! Observed calibration points: `(0.9, 1.0, vision) → 95`,
//! `(0.8, 0.4, llm) → 60`.
//!
//! The adjustment never decreases as consistency rises. `ScoringPolicy`
//! keeps that property by only allowing a non-negative bonus and a
//! non-negative penalty magnitude.

use crate::types::{ConfidenceBand, ConfidenceInputs, Modality};
use crate::validators::HallucinationDetector;
use plantdex_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Thresholds and adjustments used by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Vision modality: consistency at or above this earns the bonus
    pub vision_bonus_threshold: f64,
    /// Points added for consistent vision results
    pub vision_bonus: u8,
    /// LLM modality: consistency below this takes the penalty
    pub llm_penalty_threshold: f64,
    /// Points removed for inconsistent LLM results
    pub llm_penalty: u8,
    /// Lowest score in the High band
    pub high_band_min: u8,
    /// Lowest score in the Medium band
    pub medium_band_min: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            vision_bonus_threshold: 0.9,
            vision_bonus: 5,
            llm_penalty_threshold: 0.5,
            llm_penalty: 20,
            high_band_min: 85,
            medium_band_min: 60,
        }
    }
}

impl ScoringPolicy {
    /// Check that thresholds are usable
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("vision_bonus_threshold", self.vision_bonus_threshold),
            ("llm_penalty_threshold", self.llm_penalty_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within 0.0-1.0, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("vision_bonus", self.vision_bonus),
            ("llm_penalty", self.llm_penalty),
            ("high_band_min", self.high_band_min),
            ("medium_band_min", self.medium_band_min),
        ] {
            if value > 100 {
                return Err(Error::Config(format!(
                    "{} must be within 0-100, got {}",
                    name, value
                )));
            }
        }

        if self.medium_band_min > self.high_band_min {
            return Err(Error::Config(format!(
                "medium_band_min ({}) exceeds high_band_min ({})",
                self.medium_band_min, self.high_band_min
            )));
        }

        Ok(())
    }
}

/// Confidence Scorer
pub struct ConfidenceScorer {
    policy: ScoringPolicy,
    detector: Arc<HallucinationDetector>,
}

impl ConfidenceScorer {
    /// Scorer with default policy and the built-in phrase list
    pub fn new() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            detector: Arc::new(HallucinationDetector::new()),
        }
    }

    /// Scorer with a custom policy and a shared detector
    ///
    /// # Errors
    /// `Error::Config` when the policy fails validation.
    pub fn with_policy(policy: ScoringPolicy, detector: Arc<HallucinationDetector>) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy, detector })
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Integer confidence in 0-100
    ///
    /// Out-of-range inputs are clamped to 0.0-1.0 and NaN counts as 0.0, so
    /// this never fails.
    pub fn calculate_score(&self, vision_score: f64, consistency_score: f64, modality: Modality) -> u8 {
        let vision = unit_interval(vision_score);
        let consistency = unit_interval(consistency_score);

        let base = (vision * 100.0).round() as i32;
        let adjustment = self.adjustment(consistency, modality);
        let score = (base + adjustment).clamp(0, 100) as u8;

        debug!(
            vision,
            consistency,
            modality = ?modality,
            base,
            adjustment,
            score,
            "Confidence scored"
        );

        score
    }

    /// Same as `calculate_score`, taking the bundled inputs
    pub fn score(&self, inputs: ConfidenceInputs) -> u8 {
        self.calculate_score(inputs.vision_score, inputs.consistency_score, inputs.modality)
    }

    /// True when `text` contains templated filler
    pub fn detect_hallucination(&self, text: &str) -> bool {
        self.detector.detect_hallucination(text)
    }

    /// Display band for a score
    pub fn band(&self, score: u8) -> ConfidenceBand {
        if score >= self.policy.high_band_min {
            ConfidenceBand::High
        } else if score >= self.policy.medium_band_min {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    fn adjustment(&self, consistency: f64, modality: Modality) -> i32 {
        match modality {
            Modality::Vision if consistency >= self.policy.vision_bonus_threshold => {
                i32::from(self.policy.vision_bonus)
            }
            Modality::Llm if consistency < self.policy.llm_penalty_threshold => {
                -i32::from(self.policy.llm_penalty)
            }
            _ => 0,
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
