//! Content Validator
//!
//! Accepts or rejects a generated `NutritionRecord` as a whole.
//!
//! # Checked leaf fields
//! - `nutrients.vitamins`
//! - `nutrients.minerals`
//! - every `health_hints[i].desc`
//! - `specific_usage`
//!
//! A single generic or blank leaf rejects the entire record. Partial
//! acceptance would mix real and fabricated facts in one answer.
//!
//! # Example
//! ```rust,ignore
//! use plantdex_id::validators::{ContentValidator, FALLBACK_NOTICE};
//!
//! let validator = ContentValidator::new(detector);
//! match validator.validate_nutrition(record) {
//!     Some(record) => show(record),
//!     None => show_notice(FALLBACK_NOTICE),
//! }
//! ```

use super::hallucination_detector::HallucinationDetector;
use crate::types::NutritionRecord;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Message the caller shows in place of a rejected record
pub const FALLBACK_NOTICE: &str =
    "Verified nutrition details are not available for this plant.";

/// Why a leaf field failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Field is empty or whitespace
    Blank,
    /// Field contains the given filler phrase
    Generic(String),
}

/// One failing leaf field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path of the field, e.g. `healthHints[1].desc`
    pub field: String,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Blank => write!(f, "{}: blank", self.field),
            IssueKind::Generic(phrase) => write!(f, "{}: generic ('{}')", self.field, phrase),
        }
    }
}

/// Content Validator
///
/// Shares its `HallucinationDetector` with the confidence scorer so both
/// apply the same phrase list.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    detector: Arc<HallucinationDetector>,
}

impl ContentValidator {
    pub fn new(detector: Arc<HallucinationDetector>) -> Self {
        Self { detector }
    }

    /// Returns the record unchanged if every leaf is specific, else `None`
    pub fn validate_nutrition(&self, record: NutritionRecord) -> Option<NutritionRecord> {
        let issues = self.inspect(&record);

        if issues.is_empty() {
            debug!(
                hint_count = record.health_hints.len(),
                "Nutrition record accepted"
            );
            return Some(record);
        }

        debug!(
            issue_count = issues.len(),
            issues = %issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            "Nutrition record rejected"
        );
        None
    }

    /// List every failing leaf field
    pub fn inspect(&self, record: &NutritionRecord) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        self.check_leaf("nutrients.vitamins", &record.nutrients.vitamins, &mut issues);
        self.check_leaf("nutrients.minerals", &record.nutrients.minerals, &mut issues);

        for (i, hint) in record.health_hints.iter().enumerate() {
            self.check_leaf(&format!("healthHints[{}].desc", i), &hint.desc, &mut issues);
        }

        self.check_leaf("specificUsage", &record.specific_usage, &mut issues);

        issues
    }

    fn check_leaf(&self, field: &str, value: &str, issues: &mut Vec<FieldIssue>) {
        if value.trim().is_empty() {
            issues.push(FieldIssue {
                field: field.to_string(),
                kind: IssueKind::Blank,
            });
            return;
        }

        if let Some(phrase) = self.detector.find_match(value) {
            issues.push(FieldIssue {
                field: field.to_string(),
                kind: IssueKind::Generic(phrase.to_string()),
            });
        }
    }
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(Arc::new(HallucinationDetector::new()))
    }
}
