use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crawl::PageRecord;
use crate::sentiment::{SentimentLabel, SentimentResult};

/// Label filter for [`filter_by_sentiment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[default]
    All,
    Positive,
    Negative,
    Neutral,
}

impl SentimentCategory {
    fn admits(self, label: SentimentLabel) -> bool {
        match self {
            Self::All => true,
            Self::Positive => label == SentimentLabel::Positive,
            Self::Negative => label == SentimentLabel::Negative,
            Self::Neutral => label == SentimentLabel::Neutral,
        }
    }
}

impl FromStr for SentimentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment category '{}'", other)),
        }
    }
}

fn scored(record: &PageRecord) -> Option<&SentimentResult> {
    record.sentiment().filter(|s| !s.is_error())
}

/// Records whose sentiment falls in `category` with a compound score in
/// `[min, max]`.
///
/// Records without a usable score (none attached, or analysis failed) are
/// kept only for [`SentimentCategory::All`].
pub fn filter_by_sentiment(
    records: &[PageRecord],
    category: SentimentCategory,
    min: f64,
    max: f64,
) -> Vec<&PageRecord> {
    records
        .iter()
        .filter(|record| match scored(record) {
            None => category == SentimentCategory::All,
            Some(s) => (min..=max).contains(&s.compound) && category.admits(s.label),
        })
        .collect()
}

/// Upper bounds (inclusive) of the distribution bins, most negative first.
/// Anything above the last bound lands in the final bin.
const BIN_BOUNDS: [f64; 6] = [-0.5, -0.1, -0.05, 0.05, 0.1, 0.5];

pub const BIN_LABELS: [&str; 7] = [
    "Very Negative (-1.0 to -0.5)",
    "Negative (-0.5 to -0.1)",
    "Slightly Negative (-0.1 to -0.05)",
    "Neutral (-0.05 to 0.05)",
    "Slightly Positive (0.05 to 0.1)",
    "Positive (0.1 to 0.5)",
    "Very Positive (0.5 to 1.0)",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Records with no score or a failed analysis.
    pub failed: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Counts per bin, ordered as [`BIN_LABELS`].
    pub distribution: [usize; 7],
}

impl SentimentSummary {
    pub fn from_records(records: &[PageRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        let scores: Vec<f64> = records
            .iter()
            .filter_map(|record| match scored(record) {
                Some(s) => Some(s),
                None => {
                    summary.failed += 1;
                    None
                }
            })
            .map(|s| {
                match s.label {
                    SentimentLabel::Positive => summary.positive += 1,
                    SentimentLabel::Negative => summary.negative += 1,
                    SentimentLabel::Neutral => summary.neutral += 1,
                }
                s.compound
            })
            .collect();

        if scores.is_empty() {
            return summary;
        }

        summary.average = scores.iter().sum::<f64>() / scores.len() as f64;
        summary.min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        summary.max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for score in scores {
            let bin = BIN_BOUNDS
                .iter()
                .position(|bound| score <= *bound)
                .unwrap_or(BIN_BOUNDS.len());
            summary.distribution[bin] += 1;
        }
        summary
    }

    /// Bin labels paired with their counts.
    pub fn bins(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        BIN_LABELS.iter().copied().zip(self.distribution.iter().copied())
    }
}

impl fmt::Display for SentimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} positive, {} negative, {} neutral, {} failed (avg {:.3})",
            self.total, self.positive, self.negative, self.neutral, self.failed, self.average
        )
    }
}
