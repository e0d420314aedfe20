//! Text folding and keyword extraction.
//!
//! Candidates arrive with accented, mixed-case titles from two providers;
//! deduplication and series-name comparison both need a comparable form.
//! [`normalize`] folds text to lowercase ASCII (NFD decomposition with
//! combining marks stripped) and collapses whitespace.

use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words carrying no topical signal, excluded from keyword extraction.
/// English and Spanish, matching the catalogue's two dominant languages.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "el", "la", "de", "en", "y", "que", "los", "las", "un", "una", "su",
    "del", "al",
];

/// Maximum number of keywords derived from a seed book.
const MAX_KEYWORDS: usize = 10;

/// Description words shorter than this carry too little signal to keep.
const MIN_KEYWORD_LEN: usize = 5;

/// Fold text to a comparable ASCII lowercase form.
///
/// Decomposes to NFD, drops combining marks (so `"Años"` folds to
/// `"anos"`), keeps only ASCII alphanumerics and whitespace, lowercases,
/// and collapses whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            folded.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() {
            folded.push(' ');
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extract up to [`MAX_KEYWORDS`] keywords from a seed's categories and
/// description.
///
/// Every category word is a candidate keyword; description words must be
/// at least [`MIN_KEYWORD_LEN`] characters. All keywords are normalized,
/// stop words are excluded, and first-seen order is preserved.
pub fn extract_keywords(categories: &[String], description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    let category_words = categories
        .iter()
        .flat_map(|cat| cat.split_whitespace())
        .map(|w| (w, 0));
    let description_words = description.split_whitespace().map(|w| (w, MIN_KEYWORD_LEN));

    for (word, min_len) in category_words.chain(description_words) {
        if word.chars().count() < min_len {
            continue;
        }
        let folded = normalize(word);
        if folded.is_empty() || is_stop_word(&folded) {
            continue;
        }
        if seen.insert(folded.clone()) {
            keywords.push(folded);
            if keywords.len() >= MAX_KEYWORDS {
                break;
            }
        }
    }

    keywords
}

/// Jaccard similarity of the whitespace-tokenized lowercase word sets of
/// two texts, in [0, 1]. Returns 0 when both texts are empty.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let set_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}
