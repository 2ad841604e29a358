//! Light suffix-stripping stemmer used for subject keyword matching.
//!
//! Not a full Porter stemmer: it only needs to map inflected forms
//! ("programming", "programs", "programmer") onto one key.

/// (suffix, replacement), longest first.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("ization", "ize"),
    ("fulness", "ful"),
    ("iveness", "ive"),
    ("ousness", "ous"),
    ("ations", "ate"),
    ("ation", "ate"),
    ("ments", ""),
    ("ment", ""),
    ("ings", ""),
    ("ing", ""),
    ("ness", ""),
    ("ies", "y"),
    ("ied", "y"),
    ("ers", ""),
    ("er", ""),
    ("ed", ""),
    ("ly", ""),
    ("es", ""),
    ("s", ""),
];

/// Minimum characters a stem must keep.
const MIN_STEM: usize = 3;

/// Stem a lowercase word.
pub fn simple_stem(word: &str) -> String {
    if word.len() <= MIN_STEM || !word.is_ascii() {
        return word.to_string();
    }

    let mut stem = word.to_string();
    for &(suffix, replacement) in SUFFIX_RULES {
        if !stem.ends_with(suffix) || stem.len() - suffix.len() < MIN_STEM {
            continue;
        }
        // "class", "campus", "analysis" keep their final s
        if suffix == "s" && (stem.ends_with("ss") || stem.ends_with("us") || stem.ends_with("is")) {
            break;
        }
        stem.truncate(stem.len() - suffix.len());
        stem.push_str(replacement);
        break;
    }

    undouble(&mut stem);
    if stem.len() > MIN_STEM && stem.ends_with('e') {
        stem.pop();
    }
    stem
}

/// "programm" -> "program", "runn" -> "run"; l, s and z doublings stay.
fn undouble(stem: &mut String) {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n > MIN_STEM
        && bytes[n - 1] == bytes[n - 2]
        && !matches!(bytes[n - 1], b'a' | b'e' | b'i' | b'o' | b'u' | b'l' | b's' | b'z')
    {
        stem.pop();
    }
}
