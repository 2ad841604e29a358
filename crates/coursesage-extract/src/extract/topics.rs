//! Keyword-based course subject classification.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::stemmer::simple_stem;
use crate::tokenize::tokenize_lower;

/// Most subjects reported for one text.
pub const MAX_SUBJECTS: usize = 3;

/// Subject classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectResult {
    /// Subjects by descending hit count; empty when nothing matched.
    pub subjects: Vec<String>,
    pub hits: usize,
}

impl SubjectResult {
    pub fn primary(&self) -> Option<&str> {
        self.subjects.first().map(String::as_str)
    }
}

/// Subject → indicative words. Subject names follow the default catalog
/// categories.
const SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Web Development", &[
        "html", "css", "javascript", "react", "angular", "vue", "frontend", "backend",
        "website", "web", "browser", "node", "http", "responsive", "dom", "nextjs",
    ]),
    ("Mobile Development", &[
        "android", "ios", "swift", "kotlin", "flutter", "mobile", "smartphone", "app",
        "tablet", "xcode",
    ]),
    ("Data Science", &[
        "data", "statistics", "statistical", "machine", "regression", "pandas", "numpy",
        "dataset", "model", "neural", "analytics", "visualization", "classification",
        "clustering", "probability", "intelligence",
    ]),
    ("Design", &[
        "design", "typography", "figma", "sketch", "layout", "color", "colour", "prototype",
        "wireframe", "illustration", "graphic", "interface", "ux", "ui",
    ]),
    ("Business", &[
        "business", "management", "entrepreneur", "entrepreneurship", "startup", "finance",
        "accounting", "leadership", "strategy", "revenue", "investment", "economics",
    ]),
    ("Marketing", &[
        "marketing", "seo", "advertising", "brand", "branding", "campaign", "audience",
        "social", "content", "growth", "funnel", "email",
    ]),
    ("Programming", &[
        "programming", "code", "coding", "algorithm", "function", "variable", "compiler",
        "python", "java", "rust", "debugging", "recursion", "loop", "array", "software",
        "developer",
    ]),
    ("Photography", &[
        "photography", "camera", "lens", "exposure", "aperture", "shutter", "lighting",
        "portrait", "landscape", "photo", "editing", "lightroom",
    ]),
    ("Science", &[
        "biology", "chemistry", "physics", "energy", "cell", "plants", "photosynthesis",
        "molecule", "atom", "experiment", "evolution", "ecosystem",
    ]),
];

/// Stemmed word → subject. Exact words are matched first, stems second.
static STEM_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (subject, words) in SUBJECT_KEYWORDS {
        for word in *words {
            index.entry(simple_stem(word)).or_insert(*subject);
        }
    }
    index
});

static WORD_INDEX: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (subject, words) in SUBJECT_KEYWORDS {
        for word in *words {
            index.entry(*word).or_insert(*subject);
        }
    }
    index
});

/// Classify a text into course subjects.
pub fn classify_subjects(text: &str) -> SubjectResult {
    // subject -> (hits, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut hits = 0;

    for (position, token) in tokenize_lower(text).iter().enumerate() {
        let subject = WORD_INDEX
            .get(token.as_str())
            .copied()
            .or_else(|| STEM_INDEX.get(&simple_stem(token)).copied());
        if let Some(subject) = subject {
            counts.entry(subject).or_insert((0, position)).0 += 1;
            hits += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(subject, (count, first))| (subject, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    SubjectResult {
        subjects: ranked
            .into_iter()
            .take(MAX_SUBJECTS)
            .map(|(subject, _, _)| subject.to_string())
            .collect(),
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_web() {
        let result = classify_subjects("Learn HTML and CSS to build a responsive website");
        assert_eq!(result.primary(), Some("Web Development"));
    }

    #[test]
    fn test_classify_by_stem() {
        let result = classify_subjects("Photographers adjusting apertures and shutters");
        assert_eq!(result.primary(), Some("Photography"));
    }

    #[test]
    fn test_classify_science() {
        let result = classify_subjects(
            "Photosynthesis converts light energy into chemical energy in plants.",
        );
        assert_eq!(result.primary(), Some("Science"));
    }

    #[test]
    fn test_unknown_text() {
        let result = classify_subjects("lorem ipsum dolor sit amet");
        assert!(result.subjects.is_empty());
        assert_eq!(result.primary(), None);
    }

    #[test]
    fn test_at_most_three_subjects() {
        let result = classify_subjects(
            "html android statistics typography startup seo python camera",
        );
        assert_eq!(result.subjects.len(), MAX_SUBJECTS);
    }
}
