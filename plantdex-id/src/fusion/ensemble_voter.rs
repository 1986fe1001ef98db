//! Ensemble Voter
//!
//! Majority vote over candidate names from one or more identification
//! providers.
//!
//! # Algorithm
//! 1. Tally occurrences of each `name` (exact, case-sensitive match)
//! 2. Consensus = name with the highest tally
//! 3. Ties go to the name encountered first in the input
//! 4. Agreement = tally(consensus) / total
//!
//! # Example
//! ```rust,ignore
//! use plantdex_id::fusion::get_majority_vote;
//!
//! let vote = get_majority_vote(&candidates)?;
//! // ["Lavandula", "Lavandula", "Rosmarinus"] → Lavandula, agreement 2/3
//! assert_eq!(vote.consensus, "Lavandula");
//! ```

use crate::types::{EnsembleVote, FusionError, IdentificationCandidate};
use std::collections::HashMap;
use tracing::debug;

/// Reduce candidates to one consensus label
///
/// # Errors
/// `FusionError::InsufficientData` when `candidates` is empty.
pub fn get_majority_vote(candidates: &[IdentificationCandidate]) -> Result<EnsembleVote, FusionError> {
    if candidates.is_empty() {
        return Err(FusionError::InsufficientData(
            "Majority vote requires at least one candidate".to_string(),
        ));
    }

    // Tallies kept in first-seen order so ties resolve deterministically
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for candidate in candidates {
        let name = candidate.name.as_str();
        match index.get(name) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(name, order.len());
                order.push((name, 1));
            }
        }
    }

    let mut best = order[0];
    for &entry in &order[1..] {
        // Strictly greater: an equal later tally never displaces an earlier one
        if entry.1 > best.1 {
            best = entry;
        }
    }

    let total = candidates.len();
    let (consensus, votes) = best;
    let agreement = votes as f64 / total as f64;

    debug!(
        consensus = %consensus,
        votes,
        total,
        distinct = order.len(),
        agreement,
        "Ensemble vote complete"
    );

    Ok(EnsembleVote {
        consensus: consensus.to_string(),
        agreement,
        votes,
        total,
    })
}

/// Mean probability of the candidates that agree with the consensus
///
/// Returns 0.0 if no candidate carries the consensus name.
pub fn consensus_probability(candidates: &[IdentificationCandidate], vote: &EnsembleVote) -> f64 {
    let agreeing: Vec<f64> = candidates
        .iter()
        .filter(|c| c.name == vote.consensus)
        .map(|c| c.probability)
        .collect();

    if agreeing.is_empty() {
        return 0.0;
    }

    agreeing.iter().sum::<f64>() / agreeing.len() as f64
}

/// First non-blank scientific name among the agreeing candidates
pub fn scientific_name_for<'a>(
    candidates: &'a [IdentificationCandidate],
    vote: &EnsembleVote,
) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|c| c.name == vote.consensus)
        .filter_map(|c| c.scientific_name.as_deref())
        .find(|s| !s.trim().is_empty())
}
