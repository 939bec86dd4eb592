//! Inference Collaborator
//! Mission: Text-to-sentiment prediction behind an opaque trait seam

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A single prediction outcome.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    pub label: String, // "POSITIVE" | "NEGATIVE"
    pub score: f64,    // confidence in [0, 1]
}

/// Metadata about the model behind the seam.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub device: String,
    pub loaded: bool,
}

/// The prediction collaborator as the auth core sees it: potentially slow,
/// side-effect-free, invoked only after authorization has succeeded.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, text: &str) -> Result<Prediction>;
    fn info(&self) -> ModelInfo;
    fn is_loaded(&self) -> bool;
}

const POSITIVE_WORDS: &[&str] = &[
    "love", "loved", "great", "good", "excellent", "amazing", "wonderful", "fantastic",
    "awesome", "best", "happy", "delightful", "perfect", "brilliant", "enjoy", "enjoyed",
    "superb", "pleasant", "impressive", "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "hated", "terrible", "bad", "awful", "horrible", "worst", "poor",
    "disappointing", "disappointed", "sad", "angry", "broken", "useless", "waste",
    "boring", "dreadful", "unpleasant", "mediocre", "avoid",
];

/// Deterministic lexicon-based sentiment scorer.
///
/// Stands in for the transformer pipeline the reference deployment runs;
/// everything upstream treats it as a black box behind [`Predictor`], so
/// swapping in a real model is a one-struct change.
pub struct LexiconModel {
    model_name: String,
}

impl LexiconModel {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
        }
    }

    fn score_tokens(&self, text: &str) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;

        for token in text.split_whitespace() {
            let word: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            if POSITIVE_WORDS.contains(&word.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                negative += 1;
            }
        }

        (positive, negative)
    }
}

#[async_trait]
impl Predictor for LexiconModel {
    async fn predict(&self, text: &str) -> Result<Prediction> {
        let (positive, negative) = self.score_tokens(text);
        let hits = positive + negative;

        // No sentiment-bearing words: a weak positive prior, mirroring the
        // label set of the SST-2 style binary classifier this stands in for.
        let (label, score) = if hits == 0 {
            ("POSITIVE", 0.5)
        } else if positive >= negative {
            let confidence = 0.5 + 0.5 * (positive - negative) as f64 / hits as f64;
            ("POSITIVE", confidence)
        } else {
            let confidence = 0.5 + 0.5 * (negative - positive) as f64 / hits as f64;
            ("NEGATIVE", confidence)
        };

        Ok(Prediction {
            label: label.to_string(),
            score: (score * 10_000.0).round() / 10_000.0,
        })
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.model_name.clone(),
            device: "cpu".to_string(),
            loaded: self.is_loaded(),
        }
    }

    fn is_loaded(&self) -> bool {
        true
    }
}
