use crate::sentiment::{
    Confidence, PolarityAnalyzer, SentimentAnalyzer, SentimentError, SentimentMethod,
    SentimentScores, VaderAnalyzer,
};
use std::sync::Arc;
use tracing::warn;

const HIGH_CONFIDENCE_MAGNITUDE: f64 = 0.3;

/// Averages two analyzers, falling back to whichever one succeeded.
#[derive(Clone)]
pub struct HybridAnalyzer {
    primary: Arc<dyn SentimentAnalyzer>,
    secondary: Arc<dyn SentimentAnalyzer>,
}

impl Default for HybridAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(VaderAnalyzer), Arc::new(PolarityAnalyzer))
    }
}

impl HybridAnalyzer {
    pub fn new(primary: Arc<dyn SentimentAnalyzer>, secondary: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { primary, secondary }
    }
}

impl SentimentAnalyzer for HybridAnalyzer {
    fn method(&self) -> SentimentMethod {
        SentimentMethod::Hybrid
    }

    fn score(&self, text: &str) -> Result<SentimentScores, SentimentError> {
        match (self.primary.score(text), self.secondary.score(text)) {
            (Ok(a), Ok(b)) => {
                let compound = (a.compound + b.compound) / 2.0;
                let confidence = if compound.abs() > HIGH_CONFIDENCE_MAGNITUDE {
                    Confidence::High
                } else {
                    Confidence::Medium
                };
                Ok(SentimentScores {
                    compound,
                    confidence: Some(confidence),
                })
            }
            (Ok(only), Err(err)) | (Err(err), Ok(only)) => {
                warn!(error = %err, "one hybrid sentiment analyzer failed, using the other");
                Ok(only)
            }
            (Err(_), Err(_)) => Err(SentimentError::BothFailed),
        }
    }
}
