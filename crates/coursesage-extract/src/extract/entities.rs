//! Rule-based named entity tagging: people, places, organizations, topics.
//!
//! Best effort. Gazetteers and capitalization patterns stand in for a real
//! NER model; any input (empty, symbols only, mixed scripts) yields a bundle,
//! possibly empty, and never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::topics::classify_subjects;
use crate::tokenize::is_stop_word;

/// Cap on entries per entity kind.
pub const MAX_PER_KIND: usize = 10;

/// Entities found in one text, each list in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityBundle {
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub organizations: Vec<String>,
    pub topics: Vec<String>,
}

impl EntityBundle {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.places.is_empty()
            && self.organizations.is_empty()
            && self.topics.is_empty()
    }
}

const KNOWN_PLACES: &[&str] = &[
    "Africa", "Asia", "Europe", "North America", "South America", "Australia", "Antarctica",
    "United States", "United Kingdom", "Canada", "Mexico", "Brazil", "Argentina", "France",
    "Germany", "Spain", "Italy", "Portugal", "Netherlands", "Sweden", "Norway", "Poland",
    "Russia", "China", "Japan", "Korea", "India", "Pakistan", "Bangladesh", "Indonesia",
    "Egypt", "Nigeria", "Kenya", "Greece", "Turkey", "Israel", "Iran", "Iraq", "Ireland",
    "London", "Paris", "Berlin", "Madrid", "Rome", "Athens", "Moscow", "Tokyo", "Beijing",
    "Shanghai", "Delhi", "New Delhi", "Mumbai", "Bangalore", "Bengaluru", "Chennai",
    "Hyderabad", "Kolkata", "Singapore", "Sydney", "Toronto", "Vancouver", "New York",
    "San Francisco", "Los Angeles", "Chicago", "Boston", "Seattle", "Silicon Valley",
    "Cairo", "Lagos", "Nairobi", "Dubai", "Amazon Rainforest", "Mediterranean", "Himalayas",
];

const KNOWN_ORGANIZATIONS: &[&str] = &[
    "Google", "Microsoft", "Apple", "Amazon", "Meta", "Facebook", "Netflix", "Tesla",
    "IBM", "Intel", "Nvidia", "OpenAI", "Mozilla", "Adobe", "Oracle", "Samsung", "Twitter",
    "LinkedIn", "GitHub", "NASA", "UNESCO", "WHO", "United Nations", "European Union",
    "MIT", "Harvard", "Stanford", "Oxford", "Cambridge", "Coursera", "Udemy", "edX",
    "Khan Academy", "World Bank",
];

/// Words that mark a capitalized run as a name of a thing, not a person.
const NON_PERSON_WORDS: &[&str] = &[
    "Engine", "Theory", "Development", "Science", "Design", "Course", "Language",
    "Framework", "Act", "War", "Revolution", "Law", "Program", "Project", "System",
    "Studio", "Street", "River", "Mountain", "Ocean", "Sea", "Lake", "Park", "Day",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    "January", "February", "March", "April", "June", "July", "August", "September",
    "October", "November", "December",
];

static NON_PERSON_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NON_PERSON_WORDS.iter().copied().collect());

fn gazetteer_regex(names: &[&str]) -> Regex {
    // Longest names first so "New Delhi" wins over "Delhi".
    let mut sorted: Vec<&str> = names.to_vec();
    sorted.sort_by_key(|n| std::cmp::Reverse(n.len()));
    let alternation = sorted
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("gazetteer names are escaped")
}

static PLACE_RE: Lazy<Regex> = Lazy::new(|| gazetteer_regex(KNOWN_PLACES));
static KNOWN_ORG_RE: Lazy<Regex> = Lazy::new(|| gazetteer_regex(KNOWN_ORGANIZATIONS));

static ORG_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z&]+\s+){1,3}(?:Inc\.|Corp\.|Corporation|LLC|Ltd\.|University|Institute|Foundation|Academy|Association|Agency|College)",
    )
    .expect("static pattern")
});

static ORG_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:University|Institute|Academy|College|Bank) of(?:\s+[A-Z][a-z]+){1,2}")
        .expect("static pattern")
});

static TITLED_PERSON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .expect("static pattern")
});

static CAPITALIZED_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3}\b").expect("static pattern")
});

/// Extract people, places, organizations and subject topics from a text.
pub fn extract_entities(text: &str) -> EntityBundle {
    let mut organizations = Collector::default();
    for m in ORG_SUFFIX_RE.find_iter(text).chain(ORG_OF_RE.find_iter(text)) {
        organizations.push(strip_leading_stop_word(m.as_str()));
    }
    for m in KNOWN_ORG_RE.find_iter(text) {
        organizations.push(m.as_str());
    }

    let mut places = Collector::default();
    for m in PLACE_RE.find_iter(text) {
        if !organizations.covers(m.as_str()) {
            places.push(m.as_str());
        }
    }

    let mut people = Collector::default();
    for cap in TITLED_PERSON_RE.captures_iter(text) {
        if let Some(name) = cap.get(1) {
            people.push(name.as_str());
        }
    }
    for m in CAPITALIZED_RUN_RE.find_iter(text) {
        let candidate = strip_leading_stop_word(m.as_str());
        if candidate.split_whitespace().count() < 2
            || organizations.covers(candidate)
            || places.covers(candidate)
            || candidate
                .split_whitespace()
                .any(|w| NON_PERSON_SET.contains(w))
        {
            continue;
        }
        people.push(candidate);
    }

    EntityBundle {
        people: people.finish(),
        places: places.finish(),
        organizations: organizations.finish(),
        topics: classify_subjects(text).subjects,
    }
}

/// "The Stanford University" -> "Stanford University"; sentence-initial
/// function words are capitalized but never part of a name.
fn strip_leading_stop_word(candidate: &str) -> &str {
    match candidate.split_once(char::is_whitespace) {
        Some((first, rest)) if is_stop_word(&first.to_lowercase()) => rest.trim_start(),
        _ => candidate,
    }
}

/// Ordered, de-duplicated, capped entity list.
#[derive(Default)]
struct Collector {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl Collector {
    fn push(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() || self.items.len() >= MAX_PER_KIND {
            return;
        }
        if self.seen.insert(value.to_lowercase()) {
            self.items.push(value.to_string());
        }
    }

    /// Whether `candidate` is, contains, or is contained in a collected entity.
    fn covers(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        self.seen
            .iter()
            .any(|s| s == &candidate || s.contains(&candidate) || candidate.contains(s.as_str()))
    }

    fn finish(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_people_places_organizations() {
        let text = "Dr. Grace Hopper worked with the Navy in New York. Later she joined \
                    Remington Rand Corporation. Alan Turing studied at Cambridge.";
        let bundle = extract_entities(text);
        assert!(bundle.people.contains(&"Grace Hopper".to_string()));
        assert!(bundle.people.contains(&"Alan Turing".to_string()));
        assert!(bundle.places.contains(&"New York".to_string()));
        assert!(bundle
            .organizations
            .contains(&"Remington Rand Corporation".to_string()));
        assert!(bundle.organizations.contains(&"Cambridge".to_string()));
    }

    #[test]
    fn test_university_of_pattern() {
        let bundle = extract_entities("She teaches at the University of Toronto campus.");
        assert!(bundle
            .organizations
            .iter()
            .any(|o| o.starts_with("University of Toronto")));
        // Toronto is part of the organization name, not a separate place.
        assert!(!bundle.places.contains(&"Toronto".to_string()));
    }

    #[test]
    fn test_things_are_not_people() {
        let bundle = extract_entities("We studied the Analytical Engine and Relativity Theory.");
        assert!(bundle.people.is_empty());
    }

    #[test]
    fn test_topics_come_from_subjects() {
        let bundle = extract_entities("Build responsive websites with HTML, CSS and JavaScript.");
        assert_eq!(bundle.topics.first().map(String::as_str), Some("Web Development"));
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(extract_entities("").is_empty());
        assert!(extract_entities("}{][ \u{0} ### 12345 ...").is_empty());
        let _ = extract_entities("日本語のテキスト Ünïcödé");
    }

    #[test]
    fn test_duplicates_collapse() {
        let bundle = extract_entities("London is big. I love London. LONDON!");
        assert_eq!(bundle.places, vec!["London".to_string()]);
    }
}
