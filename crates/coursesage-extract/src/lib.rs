//! CourseSage Extract: pure text feature extraction.
//!
//! Tokenization, stop-word filtering, term-frequency keywords, Jaccard
//! token-set similarity and rule-based entity tagging. No I/O and no state
//! shared between calls.

pub mod extract;
pub mod tokenize;

pub use extract::entities::{extract_entities, EntityBundle};
pub use extract::keywords::{extract_keywords, weighted_keywords, Keyword, KEYWORD_LIMIT};
pub use extract::similarity::calculate_similarity;
pub use extract::topics::{classify_subjects, SubjectResult};
pub use extract::{analyze, ContentFeatures};
