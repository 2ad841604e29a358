//! Recommendation ranking.
//!
//! Two strategies share one output shape: local similarity scoring against
//! course descriptions, and mapping a provider's free-text ranking back onto
//! the catalog.

use std::cmp::Ordering;
use std::collections::HashSet;

use regex::Regex;

use coursesage_core::RecommendationSettings;
use coursesage_extract::calculate_similarity;
use coursesage_extract::tokenize::tokenize_lower;

use crate::types::{CourseCandidate, RecommendationEntry};

/// The provider is asked for its top three.
pub const PROVIDER_PICKS: usize = 3;

/// Catalog minus anything the user already completed, matched by ref or
/// case-insensitive title.
pub fn open_candidates<'a>(
    catalog: &'a [CourseCandidate],
    completed: &[String],
) -> Vec<&'a CourseCandidate> {
    let done: HashSet<String> = completed.iter().map(|c| c.trim().to_lowercase()).collect();
    catalog
        .iter()
        .filter(|c| {
            !done.contains(&c.course_ref.to_lowercase()) && !done.contains(&c.title.to_lowercase())
        })
        .collect()
}

/// Rank candidates by Jaccard similarity between the joined interests and
/// each course description.
///
/// Scores below `min_similarity_score` are dropped, the rest sorted
/// descending (catalog order breaks ties) and capped at
/// `max_recommendations`. Entries are unique by `course_ref`.
pub fn score_by_similarity(
    interests: &[String],
    candidates: &[&CourseCandidate],
    settings: &RecommendationSettings,
) -> Vec<RecommendationEntry> {
    let interest_text = interests.join(" ");
    let interest_tokens: HashSet<String> = tokenize_lower(&interest_text).into_iter().collect();

    let mut seen = HashSet::new();
    let mut scored: Vec<RecommendationEntry> = candidates
        .iter()
        .filter(|c| seen.insert(c.course_ref.as_str()))
        .map(|c| {
            let score = calculate_similarity(&interest_text, &c.description);
            RecommendationEntry {
                course_ref: c.course_ref.clone(),
                title: c.title.clone(),
                score,
                reason: similarity_reason(&interest_tokens, &c.description),
                category: c.category.clone(),
            }
        })
        .filter(|e| e.score >= settings.min_similarity_score)
        .collect();

    // Vec::sort_by is stable.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(settings.max_recommendations);
    scored
}

fn similarity_reason(interest_tokens: &HashSet<String>, description: &str) -> String {
    let mut shared: Vec<String> = Vec::new();
    for token in tokenize_lower(description) {
        if interest_tokens.contains(&token) && !shared.contains(&token) {
            shared.push(token);
        }
    }
    if shared.is_empty() {
        "Related to your interests".to_string()
    } else {
        format!("Matches your interests: {}", shared.join(", "))
    }
}

/// Map a provider narrative onto catalog entries.
///
/// A course counts as recommended when its title appears in the narrative as
/// a whole phrase; order of first mention is the rank. A mention inside a
/// longer title's mention ("HTML" within "HTML Basics") is not counted. At
/// most [`PROVIDER_PICKS`] entries, scored `(n - i) / n`. The reason is the
/// narrative line naming the course.
pub fn map_narrative(narrative: &str, candidates: &[&CourseCandidate]) -> Vec<RecommendationEntry> {
    let lines: Vec<&str> = narrative.lines().collect();

    let mut seen = HashSet::new();
    let unique: Vec<&CourseCandidate> = candidates
        .iter()
        .copied()
        .filter(|c| !c.title.trim().is_empty() && seen.insert(c.course_ref.as_str()))
        .collect();

    // Every whole-phrase mention: (line, start, end, candidate index).
    let mut spans: Vec<(usize, usize, usize, usize)> = Vec::new();
    for (idx, candidate) in unique.iter().enumerate() {
        let Some(pattern) = title_pattern(&candidate.title) else {
            continue;
        };
        for (line, text) in lines.iter().enumerate() {
            for m in pattern.find_iter(text) {
                if at_word_boundary(text, m.start(), m.end()) {
                    spans.push((line, m.start(), m.end(), idx));
                }
            }
        }
    }

    let shadowed = |&(line, start, end, idx): &(usize, usize, usize, usize)| {
        spans.iter().any(|&(l, s, e, other)| {
            other != idx && l == line && s <= start && end <= e && (e - s) > (end - start)
        })
    };

    // (line, offset, candidate)
    let mut mentions: Vec<(usize, usize, &CourseCandidate)> = Vec::new();
    for (idx, &candidate) in unique.iter().enumerate() {
        let first = spans
            .iter()
            .filter(|span| span.3 == idx && !shadowed(*span))
            .map(|&(line, start, _, _)| (line, start))
            .min();
        if let Some((line, offset)) = first {
            mentions.push((line, offset, candidate));
        }
    }
    mentions.sort_by_key(|(line, offset, _)| (*line, *offset));
    mentions.truncate(PROVIDER_PICKS);

    let n = mentions.len();
    mentions
        .into_iter()
        .enumerate()
        .map(|(rank, (line, _, candidate))| RecommendationEntry {
            course_ref: candidate.course_ref.clone(),
            title: candidate.title.clone(),
            score: (n - rank) as f64 / n as f64,
            reason: clean_line(lines[line]),
            category: candidate.category.clone(),
        })
        .collect()
}

/// Case-insensitive literal pattern for a title, whitespace runs collapsed.
fn title_pattern(title: &str) -> Option<Regex> {
    let words: Vec<String> = title.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", words.join(r"\s+"))).ok()
}

/// The match is not glued to a neighbouring letter or digit.
fn at_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Strip list numbering, bullets and markdown emphasis from a narrative line.
fn clean_line(line: &str) -> String {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')', '-', '*', '#', ' ']);
    trimmed.replace("**", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, title: &str, description: &str) -> CourseCandidate {
        CourseCandidate {
            course_ref: id.into(),
            title: title.into(),
            description: description.into(),
            category: Some("Web Development".into()),
        }
    }

    #[test]
    fn test_unrelated_descriptions_yield_nothing() {
        let catalog = vec![
            course("c1", "HTML", "Learn HTML and CSS"),
            course("c2", "Cooking", "Advanced cooking techniques"),
        ];
        let candidates = open_candidates(&catalog, &[]);
        let entries = score_by_similarity(
            &["Web Development".to_string()],
            &candidates,
            &RecommendationSettings::default(),
        );
        // "web development" shares no token with either description.
        assert!(entries.is_empty());
    }

    #[test]
    fn test_ranking_threshold_and_cap() {
        let catalog = vec![
            course("a", "A", "web development basics"),
            course("b", "B", "web development"),
            course("c", "C", "gardening"),
            course("d", "D", "web development"),
        ];
        let candidates = open_candidates(&catalog, &[]);
        let settings = RecommendationSettings {
            min_similarity_score: 0.3,
            max_recommendations: 2,
        };
        let entries = score_by_similarity(&["web development".to_string()], &candidates, &settings);
        assert_eq!(entries.len(), 2);
        // b and d tie at 1.0; catalog order decides.
        assert_eq!(entries[0].course_ref, "b");
        assert_eq!(entries[1].course_ref, "d");
        assert!(entries.iter().all(|e| e.score >= 0.3));
        assert_eq!(entries[0].reason, "Matches your interests: web, development");
    }

    #[test]
    fn test_duplicates_and_completed_are_excluded() {
        let catalog = vec![
            course("a", "Web Basics", "web development"),
            course("a", "Web Basics", "web development"),
            course("b", "Web Pro", "web development"),
        ];
        let candidates = open_candidates(&catalog, &["web pro".to_string()]);
        let entries = score_by_similarity(
            &["web development".to_string()],
            &candidates,
            &RecommendationSettings::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].course_ref, "a");
    }

    #[test]
    fn test_map_narrative_by_first_mention() {
        let catalog = vec![
            course("html", "HTML Basics", ""),
            course("react", "Intro to React", ""),
            course("node", "Node.js APIs", ""),
            course("cook", "Cooking 101", ""),
        ];
        let candidates = open_candidates(&catalog, &[]);
        let narrative = "Here are my picks:\n\
                         1. **Intro to React** - builds on your JavaScript.\n\
                         2. HTML Basics: a solid foundation.\n\
                         3. Node.js APIs for backend work.";
        let entries = map_narrative(narrative, &candidates);
        let refs: Vec<&str> = entries.iter().map(|e| e.course_ref.as_str()).collect();
        assert_eq!(refs, vec!["react", "html", "node"]);
        assert!((entries[0].score - 1.0).abs() < 1e-9);
        assert!((entries[2].score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(entries[0].reason, "Intro to React - builds on your JavaScript.");
    }

    #[test]
    fn test_map_narrative_ignores_titles_inside_words() {
        let catalog = vec![course("html", "HTML Basics", ""), course("art", "Art", "")];
        let candidates = open_candidates(&catalog, &[]);
        let entries = map_narrative("1. HTML Basics - start with markup.", &candidates);
        let refs: Vec<&str> = entries.iter().map(|e| e.course_ref.as_str()).collect();
        assert_eq!(refs, vec!["html"]);
        assert_eq!(entries[0].reason, "HTML Basics - start with markup.");
    }

    #[test]
    fn test_map_narrative_prefers_longer_title() {
        let catalog = vec![course("short", "HTML", ""), course("long", "HTML Basics", "")];
        let candidates = open_candidates(&catalog, &[]);

        let entries = map_narrative("Begin with HTML Basics.", &candidates);
        let refs: Vec<&str> = entries.iter().map(|e| e.course_ref.as_str()).collect();
        assert_eq!(refs, vec!["long"]);

        let entries = map_narrative("Begin with HTML Basics.\nThen go deeper into HTML.", &candidates);
        let refs: Vec<&str> = entries.iter().map(|e| e.course_ref.as_str()).collect();
        assert_eq!(refs, vec!["long", "short"]);
    }

    #[test]
    fn test_map_narrative_title_with_punctuation() {
        let catalog = vec![course("cpp", "C++ Primer", ""), course("node", "Node.js APIs", "")];
        let candidates = open_candidates(&catalog, &[]);
        let entries = map_narrative("- node.js   apis\n- **C++ Primer**", &candidates);
        let refs: Vec<&str> = entries.iter().map(|e| e.course_ref.as_str()).collect();
        assert_eq!(refs, vec!["node", "cpp"]);
    }

    #[test]
    fn test_map_narrative_without_titles() {
        let catalog = vec![course("html", "HTML Basics", "")];
        let candidates = open_candidates(&catalog, &[]);
        assert!(map_narrative("Try something new!", &candidates).is_empty());
    }
}
