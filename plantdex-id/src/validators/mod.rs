//! Generative content validation
//!
//! 1. **hallucination_detector** - phrase-list filler detection
//! 2. **content_validator** - whole-record accept/reject for nutrition facts

pub mod content_validator;
pub mod hallucination_detector;

pub use content_validator::{ContentValidator, FieldIssue, IssueKind, FALLBACK_NOTICE};
pub use hallucination_detector::{HallucinationDetector, PhraseList, DEFAULT_PHRASES};
