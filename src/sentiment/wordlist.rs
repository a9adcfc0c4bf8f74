//! Word lists behind the pattern-based polarity scorer.
//!
//! Valences are prior polarities on a [-4, 4] scale for vocabulary common in
//! news copy. Intensifiers and negations are looked up by lowercase token.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[rustfmt::skip]
const VALENCES: &[(&str, f64)] = &[
    ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8),
    ("awesome", 3.1), ("wonderful", 2.7), ("fantastic", 2.6), ("happy", 2.7),
    ("love", 3.2), ("like", 1.5), ("best", 3.2), ("better", 1.9),
    ("success", 2.7), ("successful", 2.8), ("win", 2.8), ("wins", 2.7),
    ("growth", 1.6), ("profit", 1.9), ("profits", 1.9), ("record", 0.6),
    ("gain", 2.0), ("gains", 1.8), ("improve", 1.9), ("improved", 2.1),
    ("benefit", 2.0), ("benefits", 1.8), ("hope", 1.9), ("hopeful", 2.3),
    ("support", 1.7), ("praised", 2.2), ("celebrate", 2.7), ("welcome", 2.0),
    ("strong", 2.3), ("safe", 1.9), ("peace", 2.5), ("approve", 1.9),
    ("approved", 1.8), ("positive", 2.6), ("optimistic", 2.0), ("pleased", 1.9),
    ("glad", 2.0), ("excited", 1.8), ("innovative", 1.9), ("recovery", 1.2),
    ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5),
    ("worst", -3.1), ("worse", -2.1), ("hate", -2.7), ("sad", -2.1),
    ("angry", -2.3), ("fear", -2.2), ("afraid", -2.0), ("disappointed", -1.9),
    ("disappointing", -2.2), ("failure", -2.3), ("fail", -2.5), ("failed", -2.3),
    ("loss", -1.3), ("losses", -1.7), ("decline", -1.1), ("crisis", -3.1),
    ("accident", -2.1), ("damage", -2.2), ("damaged", -1.9), ("injuries", -1.9),
    ("injury", -1.9), ("injured", -1.7), ("killed", -3.5), ("death", -2.9),
    ("dead", -3.3), ("war", -2.9), ("attack", -2.1), ("violence", -3.1),
    ("fraud", -2.8), ("corruption", -2.6), ("scandal", -2.3), ("problem", -1.7),
    ("problems", -1.7), ("risk", -1.1), ("threat", -2.4), ("warned", -1.3),
    ("critics", -1.2), ("concern", -1.4), ("concerns", -1.4), ("weak", -1.9),
    ("poor", -2.1), ("collapse", -2.2), ("disaster", -3.1), ("unsafe", -2.4),
    ("protest", -1.0), ("lawsuit", -1.5), ("bankrupt", -2.6), ("cut", -1.1),
];

#[rustfmt::skip]
const BOOSTERS: &[&str] = &[
    "very", "extremely", "really", "incredibly", "highly", "hugely", "deeply",
    "so", "totally", "absolutely", "remarkably", "especially", "most",
];

#[rustfmt::skip]
const DAMPENERS: &[&str] = &["slightly", "somewhat", "barely", "marginally", "kinda", "partly"];

#[rustfmt::skip]
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor",
    "cannot", "can't", "don't", "doesn't", "didn't", "isn't", "wasn't",
    "aren't", "won't", "wouldn't", "shouldn't", "without",
];

static LEXICON: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| VALENCES.iter().copied().collect());

/// Valence of `word` (lowercase, punctuation stripped), if it carries any.
pub fn valence(word: &str) -> Option<f64> {
    LEXICON.get(word).copied()
}

pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

/// +1 for boosters, -1 for dampeners, 0 otherwise.
pub fn intensity(word: &str) -> f64 {
    if BOOSTERS.contains(&word) {
        1.0
    } else if DAMPENERS.contains(&word) {
        -1.0
    } else {
        0.0
    }
}

/// Lowercased words with surrounding punctuation stripped. Apostrophes are
/// kept so contractions still read as negations.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}
