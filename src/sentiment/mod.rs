//! Sentiment scoring of extracted page content.
//!
//! Analyzers are strategies behind [`SentimentAnalyzer`]; the crawl engine
//! only ever calls [`analyze`], which turns every failure (including a
//! panicking analyzer) into a [`SentimentResult`] carrying an error message.

pub mod hybrid;
pub mod polarity;
pub mod summary;
pub mod vader;
pub mod wordlist;

pub use hybrid::HybridAnalyzer;
pub use polarity::PolarityAnalyzer;
pub use vader::VaderAnalyzer;
pub use summary::{SentimentCategory, SentimentSummary, filter_by_sentiment};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::extractor::model::normalize_whitespace;

/// Scores at or beyond this magnitude get a non-neutral label.
pub const LABEL_THRESHOLD: f64 = 0.05;
const MIN_ANALYSABLE_CHARS: usize = 10;
pub const TOO_SHORT_ERROR: &str = "Text too short for meaningful analysis";

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?\-]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentMethod {
    #[default]
    Vader,
    #[serde(rename = "textblob")]
    TextBlob,
    Hybrid,
}

impl FromStr for SentimentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vader" => Ok(Self::Vader),
            "textblob" => Ok(Self::TextBlob),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown sentiment method '{}'", other)),
        }
    }
}

impl fmt::Display for SentimentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vader => "vader",
            Self::TextBlob => "textblob",
            Self::Hybrid => "hybrid",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= LABEL_THRESHOLD {
            Self::Positive
        } else if compound <= -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Raw output of one analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    /// Polarity in [-1, 1].
    pub compound: f64,
    pub confidence: Option<Confidence>,
}

impl SentimentScores {
    pub fn new(compound: f64) -> Self {
        Self {
            compound: compound.clamp(-1.0, 1.0),
            confidence: None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("analysis failed: {0}")]
    Failed(String),

    #[error("both analyzers failed")]
    BothFailed,
}

/// Pluggable sentiment strategy.
#[cfg_attr(test, mockall::automock)]
pub trait SentimentAnalyzer: Send + Sync {
    fn method(&self) -> SentimentMethod;

    /// Score already-cleaned text.
    fn score(&self, text: &str) -> Result<SentimentScores, SentimentError>;
}

/// Sentiment attached to a matched page. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub compound: f64,
    pub label: SentimentLabel,
    pub method: SentimentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub text_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    fn failed(method: SentimentMethod, text_length: usize, error: String, confidence: Option<Confidence>) -> Self {
        Self {
            compound: 0.0,
            label: SentimentLabel::Neutral,
            method,
            confidence,
            text_length,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Strip markup and stray symbols, collapse whitespace. Text that ends up
/// shorter than ten characters comes back empty.
pub fn clean_text(text: &str) -> String {
    let text = TAGS.replace_all(text, "");
    let text = NOISE.replace_all(&text, "");
    let text = normalize_whitespace(&text);
    if text.chars().count() < MIN_ANALYSABLE_CHARS {
        return String::new();
    }
    text
}

/// Run `analyzer` over `text`, absorbing every failure into the result.
pub fn analyze(analyzer: &dyn SentimentAnalyzer, text: &str) -> SentimentResult {
    let method = analyzer.method();
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return SentimentResult::failed(method, 0, TOO_SHORT_ERROR.to_string(), Some(Confidence::Low));
    }
    let text_length = cleaned.chars().count();

    match catch_unwind(AssertUnwindSafe(|| analyzer.score(&cleaned))) {
        Ok(Ok(scores)) => SentimentResult {
            compound: scores.compound,
            label: SentimentLabel::from_compound(scores.compound),
            method,
            confidence: scores.confidence,
            text_length,
            error: None,
        },
        Ok(Err(err)) => SentimentResult::failed(method, text_length, err.to_string(), None),
        Err(_) => SentimentResult::failed(
            method,
            text_length,
            "sentiment analyzer panicked".to_string(),
            None,
        ),
    }
}

/// Built-in analyzer for `method`.
pub fn analyzer_for(method: SentimentMethod) -> Arc<dyn SentimentAnalyzer> {
    match method {
        SentimentMethod::Vader => Arc::new(VaderAnalyzer),
        SentimentMethod::TextBlob => Arc::new(PolarityAnalyzer),
        SentimentMethod::Hybrid => Arc::new(HybridAnalyzer::default()),
    }
}
