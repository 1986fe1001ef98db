//! Hallucination Detector
//!
//! Flags templated filler typical of generative output ("rich in vitamins",
//! "good for health", "consult a professional"). Matching is a
//! case-insensitive substring test against a phrase list; there is no
//! statistical model.
//!
//! The phrase list is data: the built-in defaults can be extended from
//! configuration without touching the scorer or validator.
//!
//! Missed filler is tolerated. A false positive only rejects content, which
//! is the safe direction.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Built-in filler phrases, lowercase
pub const DEFAULT_PHRASES: &[&str] = &[
    "rich in vitamins",
    "rich in nutrients",
    "rich in minerals",
    "various vitamins",
    "various minerals",
    "various nutrients",
    "essential nutrients",
    "good for health",
    "good for your health",
    "good for overall health",
    "beneficial for health",
    "many health benefits",
    "various health benefits",
    "numerous health benefits",
    "promotes overall wellness",
    "promotes general well-being",
    "boosts overall health",
    "consult doctor",
    "consult a doctor",
    "consult your doctor",
    "consult a professional",
    "consult a healthcare",
    "consult with a healthcare",
    "consult an expert",
    "can be used in many ways",
    "has many uses",
    "various uses",
    "various purposes",
    "used in traditional medicine",
    "information not available",
    "no specific information",
];

/// Filler phrase list
///
/// Deserialized from a plain array of strings, normalized like `new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseList {
    phrases: Vec<String>,
}

impl PhraseList {
    /// Build from arbitrary phrases (normalized to lowercase, blanks dropped)
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self { phrases: Vec::new() };
        list.extend(phrases);
        list
    }

    /// Add phrases, skipping blanks and duplicates
    pub fn extend<I, S>(&mut self, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            let normalized = phrase.as_ref().trim().to_lowercase();
            if normalized.is_empty() || self.phrases.contains(&normalized) {
                continue;
            }
            self.phrases.push(normalized);
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl From<Vec<String>> for PhraseList {
    fn from(phrases: Vec<String>) -> Self {
        Self::new(phrases)
    }
}

impl From<PhraseList> for Vec<String> {
    fn from(list: PhraseList) -> Self {
        list.phrases
    }
}

impl Default for PhraseList {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES.iter().copied())
    }
}

/// Shared detector used by the confidence scorer and the content validator
#[derive(Debug, Clone, Default)]
pub struct HallucinationDetector {
    phrases: PhraseList,
}

impl HallucinationDetector {
    /// Detector over the built-in phrase list
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector over a custom phrase list
    pub fn with_phrases(phrases: PhraseList) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    /// First phrase found in `text`, if any
    pub fn find_match(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.phrases
            .phrases()
            .iter()
            .find(|phrase| haystack.contains(phrase.as_str()))
            .map(String::as_str)
    }

    /// True when `text` contains any filler phrase
    pub fn detect_hallucination(&self, text: &str) -> bool {
        match self.find_match(text) {
            Some(phrase) => {
                debug!(phrase, "Generic filler detected");
                true
            }
            None => false,
        }
    }
}
