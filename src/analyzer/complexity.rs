//! Complexity scoring.
//!
//! Four terms, each normalized to `0.0..=1.0` before weighting:
//!
//! | term               | saturates at | weight |
//! |--------------------|--------------|--------|
//! | length (chars)     | 200          | 0.3    |
//! | words              | 50           | 0.3    |
//! | special characters | 10           | 0.2    |
//! | technical terms    | 5            | 0.2    |

const LENGTH_SATURATION: f64 = 200.0;
const WORD_SATURATION: f64 = 50.0;
const SPECIAL_SATURATION: f64 = 10.0;
const TECHNICAL_SATURATION: f64 = 5.0;

const LENGTH_WEIGHT: f64 = 0.3;
const WORD_WEIGHT: f64 = 0.3;
const SPECIAL_WEIGHT: f64 = 0.2;
const TECHNICAL_WEIGHT: f64 = 0.2;

/// Vocabulary counted toward the technical-term component.
pub const TECHNICAL_TERMS: [&str; 10] = [
    "algorithm",
    "function",
    "database",
    "api",
    "server",
    "quantum",
    "neural",
    "blockchain",
    "compiler",
    "framework",
];

/// Weighted complexity of `query` in `0.0..=1.0`.
pub(crate) fn score(query: &str) -> f64 {
    let length = query.chars().count();
    let words = query.split_whitespace().count();
    let special = special_char_count(query);
    let technical = technical_term_count(query);

    let total = saturate(length, LENGTH_SATURATION) * LENGTH_WEIGHT
        + saturate(words, WORD_SATURATION) * WORD_WEIGHT
        + saturate(special, SPECIAL_SATURATION) * SPECIAL_WEIGHT
        + saturate(technical, TECHNICAL_SATURATION) * TECHNICAL_WEIGHT;

    total.clamp(0.0, 1.0)
}

fn saturate(count: usize, at: f64) -> f64 {
    (count as f64 / at).min(1.0)
}

/// Characters outside `[A-Za-z0-9]` and whitespace.
fn special_char_count(query: &str) -> usize {
    query
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count()
}

/// Number of distinct vocabulary terms present, case-insensitive.
/// Repeating a term does not raise the count.
fn technical_term_count(query: &str) -> usize {
    let lower = query.to_lowercase();
    TECHNICAL_TERMS
        .iter()
        .filter(|term| lower.contains(**term))
        .count()
}
