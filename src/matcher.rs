use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How multiple keywords combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchLogic {
    /// Every keyword must appear.
    And,
    /// At least one keyword must appear.
    #[default]
    Or,
}

impl FromStr for MatchLogic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(format!("unknown match logic '{}', expected AND or OR", other)),
        }
    }
}

impl fmt::Display for MatchLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// Case-insensitive substring test of `keywords` against `text`.
///
/// An empty keyword list never matches.
pub fn matches_keywords<S: AsRef<str>>(text: &str, keywords: &[S], logic: MatchLogic) -> bool {
    if keywords.is_empty() {
        return false;
    }

    let haystack = text.to_lowercase();
    let mut contained = keywords
        .iter()
        .map(|kw| haystack.contains(&kw.as_ref().to_lowercase()));

    match logic {
        MatchLogic::And => contained.all(|found| found),
        MatchLogic::Or => contained.any(|found| found),
    }
}
