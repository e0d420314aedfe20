//! Pattern-based saga detection from title strings.
//!
//! Publishers encode installment numbers in a handful of conventions
//! (`Book 2`, `Vol. 3`, `(#4)`, `2 of 5`, …). [`detect_series`] tries an
//! ordered pattern list and, on the first match, strips the matched text
//! from the title to recover the saga name. Pure function, recomputed on
//! demand; titles with incidental numbers may misparse and that is
//! accepted as heuristic noise.

use regex::Regex;
use std::sync::OnceLock;

/// A saga name and installment number extracted from a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesInfo {
    /// Saga name with the installment marker stripped.
    pub name: String,
    /// Installment number as written in the title.
    pub index: String,
}

/// Ordered installment patterns. Order is significant: earlier patterns
/// take precedence over later, more permissive ones. The second element
/// is the capture group holding the installment number; group 1 is the
/// fallback when that group did not participate in the match.
const PATTERNS: &[(&str, usize)] = &[
    (r"(?i)\b(Book|Vol\.?|Volume|Part|Libro|Tomo)\s*(\d+)", 2),
    (r"(?i)\(#(\d+)\)", 1),
    (r"(?i):\s*Book\s*(\d+)", 1),
    (r"(?i),\s*Book\s*(\d+)", 1),
    (r"(?i)\b(\d+)\s*of\s*\d+", 1),
];

fn compiled_patterns() -> &'static Vec<(Regex, usize)> {
    static COMPILED: OnceLock<Vec<(Regex, usize)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(pattern, group)| {
                // PATTERNS is a const table of hand-checked expressions.
                let re = Regex::new(pattern).expect("series pattern must compile");
                (re, *group)
            })
            .collect()
    })
}

/// Detect whether a title names a series installment.
///
/// Returns the saga name and installment number on the first matching
/// pattern, or `None` when no pattern matches. The saga name is the title
/// with every occurrence of the matched pattern removed and trailing
/// punctuation trimmed; an empty leftover yields `None`.
pub fn detect_series(title: &str) -> Option<SeriesInfo> {
    for (re, group) in compiled_patterns() {
        let Some(caps) = re.captures(title) else {
            continue;
        };

        let index = caps
            .get(*group)
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().to_string())?;

        let name = re.replace_all(title, "").to_string();
        let name = name
            .trim()
            .trim_end_matches([':', ',', '-'])
            .trim()
            .to_string();
        if name.is_empty() {
            return None;
        }

        return Some(SeriesInfo { name, index });
    }
    None
}
