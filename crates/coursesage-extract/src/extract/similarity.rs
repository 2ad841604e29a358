//! Jaccard token-set similarity.

use std::collections::HashSet;

use crate::tokenize::tokenize_lower;

/// |A ∩ B| / |A ∪ B| over the lowercase token sets of two texts.
///
/// No stop-word filtering. Returns 0.0 when both texts have no tokens.
pub fn calculate_similarity(text_a: &str, text_b: &str) -> f64 {
    let a: HashSet<String> = tokenize_lower(text_a).into_iter().collect();
    let b: HashSet<String> = tokenize_lower(text_b).into_iter().collect();

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
