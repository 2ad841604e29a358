//! Heuristic content features for course material.
//!
//! Everything here is a pure function of its input text. Frequency tables,
//! token sets and candidate lists are built per call and dropped on return,
//! so concurrent callers never observe each other's state.

pub mod entities;
pub mod keywords;
pub mod similarity;
pub mod stemmer;
pub mod topics;

use serde::{Deserialize, Serialize};

use entities::EntityBundle;
use keywords::Keyword;

/// Combined feature set for one text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFeatures {
    pub keywords: Vec<Keyword>,
    pub entities: EntityBundle,
}

/// Run keyword and entity extraction on a text.
pub fn analyze(text: &str, max_keywords: usize) -> ContentFeatures {
    ContentFeatures {
        keywords: keywords::weighted_keywords(text, max_keywords),
        entities: entities::extract_entities(text),
    }
}
