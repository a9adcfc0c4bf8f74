//! Averaged word polarity in the style of TextBlob.
//!
//! Every sentiment-bearing word contributes its valence rescaled to [-1, 1];
//! an intensifier in front multiplies it, a negation in front halves and
//! flips it. The page score is the mean over contributing words.

use crate::sentiment::wordlist::{intensity, is_negation, tokenize, valence};
use crate::sentiment::{SentimentAnalyzer, SentimentError, SentimentMethod, SentimentScores};

const VALENCE_SCALE: f64 = 4.0;
const INTENSIFIER_FACTOR: f64 = 1.3;
const DIMINISHER_FACTOR: f64 = 0.7;
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct PolarityAnalyzer;

impl PolarityAnalyzer {
    pub fn polarity(text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut count = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(valence) = valence(token) else {
                continue;
            };
            let mut polarity = valence / VALENCE_SCALE;

            if let Some(prev) = i.checked_sub(1).map(|j| &tokens[j]) {
                polarity *= match intensity(prev) {
                    x if x > 0.0 => INTENSIFIER_FACTOR,
                    x if x < 0.0 => DIMINISHER_FACTOR,
                    _ => 1.0,
                };
            }
            let negated = (1..=2)
                .filter_map(|back| i.checked_sub(back))
                .any(|j| is_negation(&tokens[j]));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            total += polarity.clamp(-1.0, 1.0);
            count += 1;
        }

        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}

impl SentimentAnalyzer for PolarityAnalyzer {
    fn method(&self) -> SentimentMethod {
        SentimentMethod::TextBlob
    }

    fn score(&self, text: &str) -> Result<SentimentScores, SentimentError> {
        Ok(SentimentScores::new(Self::polarity(text)))
    }
}
