//! VADER compound scores from the `vader_sentiment` lexicon and rules.

use once_cell::sync::Lazy;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::sentiment::{SentimentAnalyzer, SentimentError, SentimentMethod, SentimentScores};

static VADER: Lazy<SentimentIntensityAnalyzer<'static>> =
    Lazy::new(SentimentIntensityAnalyzer::new);

#[derive(Debug, Clone, Copy, Default)]
pub struct VaderAnalyzer;

impl SentimentAnalyzer for VaderAnalyzer {
    fn method(&self) -> SentimentMethod {
        SentimentMethod::Vader
    }

    fn score(&self, text: &str) -> Result<SentimentScores, SentimentError> {
        let scores = VADER.polarity_scores(text);
        let compound = scores
            .get("compound")
            .copied()
            .ok_or_else(|| SentimentError::Failed("vader returned no compound score".to_string()))?;
        Ok(SentimentScores::new(compound))
    }
}
