//! Candidate fusion
//!
//! Reduces the candidates of one identification request to a single
//! consensus label.

pub mod ensemble_voter;

pub use ensemble_voter::{consensus_probability, get_majority_vote, scientific_name_for};
