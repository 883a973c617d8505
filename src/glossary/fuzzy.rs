/*!
 * Fuzzy matching for glossary curation.
 *
 * Trigram similarity in the style of PostgreSQL's pg_trgm: each word is
 * lowercased, padded with two leading blanks and one trailing blank, and cut
 * into three-character windows. Similarity is the Jaccard index of the two
 * trigram sets.
 */

use std::collections::HashSet;

type Trigram = (char, char, char);

/// Collect the trigram set of a string
fn trigrams(text: &str) -> HashSet<Trigram> {
    let mut set = HashSet::new();

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars().flat_map(char::to_lowercase))
            .chain(std::iter::once(' '))
            .collect();

        for window in padded.windows(3) {
            set.insert((window[0], window[1], window[2]));
        }
    }

    set
}

/// Similarity between two strings in [0, 1]
pub fn trigram_similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);

    if left.is_empty() && right.is_empty() {
        return if a.trim().is_empty() && b.trim().is_empty() { 1.0 } else { 0.0 };
    }

    let shared = left.intersection(&right).count();
    let total = left.union(&right).count();

    if total == 0 {
        0.0
    } else {
        shared as f64 / total as f64
    }
}

/// Whether `candidate` qualifies as similar to `term`: it contains the term
/// case-insensitively, or its similarity is above the threshold
pub fn is_similar(candidate: &str, term: &str, threshold: f64) -> Option<f64> {
    let score = trigram_similarity(candidate, term);
    let contains = !term.is_empty() && candidate.to_lowercase().contains(&term.to_lowercase());

    if contains || score > threshold {
        Some(score)
    } else {
        None
    }
}
