//! Classification metrics
//!
//! Precision, recall and F1 for evaluating the ensemble against labelled
//! identifications. A zero denominator yields 0.0 rather than NaN.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metrics error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Prediction count {predictions} does not match label count {actual}")]
    LengthMismatch { predictions: usize, actual: usize },
}

/// Confusion counts for a binary classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

/// Precision / recall / F1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub counts: ConfusionCounts,
}

/// Tally confusion counts from paired predictions and labels
pub fn confusion_counts(predictions: &[bool], actual: &[bool]) -> Result<ConfusionCounts, MetricsError> {
    if predictions.len() != actual.len() {
        return Err(MetricsError::LengthMismatch {
            predictions: predictions.len(),
            actual: actual.len(),
        });
    }

    let mut counts = ConfusionCounts::default();
    for (&predicted, &expected) in predictions.iter().zip(actual) {
        match (predicted, expected) {
            (true, true) => counts.true_positives += 1,
            (true, false) => counts.false_positives += 1,
            (false, true) => counts.false_negatives += 1,
            (false, false) => counts.true_negatives += 1,
        }
    }

    Ok(counts)
}

/// Precision, recall and F1 of `predictions` against `actual`
pub fn evaluate(predictions: &[bool], actual: &[bool]) -> Result<ClassificationMetrics, MetricsError> {
    let counts = confusion_counts(predictions, actual)?;

    let precision = ratio(counts.true_positives, counts.true_positives + counts.false_positives);
    let recall = ratio(counts.true_positives, counts.true_positives + counts.false_negatives);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    Ok(ClassificationMetrics {
        precision,
        recall,
        f1,
        counts,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
