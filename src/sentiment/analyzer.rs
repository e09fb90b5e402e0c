//! Keyword-count sentiment scoring for mood/journal notes.
//!
//! The score is `(# positive tokens) - (# negative tokens)`; the sign picks
//! the label. No stemming, no negation handling: "not happy" counts as
//! positive. Word lists live in a `Lexicon` so callers can swap them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const DEFAULT_POSITIVE: &[&str] = &[
    "happy", "calm", "relaxed", "good", "great", "rested", "energetic", "excited", "grateful",
    "hopeful", "joy", "love", "peaceful", "content", "better", "wonderful", "amazing", "smile",
];

const DEFAULT_NEGATIVE: &[&str] = &[
    "sad", "tired", "anxious", "stressed", "bad", "angry", "exhausted", "worried", "upset",
    "lonely", "overwhelmed", "pain", "sick", "nauseous", "cry", "crying", "scared", "awful",
];

/// Positive and negative keyword lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE.iter().map(|s| s.to_string()).collect(),
            negative: DEFAULT_NEGATIVE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
    pub score: i64,
    pub label: SentimentLabel,
}

/// Lowercased word sets built once per lexicon.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: &Lexicon) -> Self {
        let normalize = |words: &[String]| {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect::<HashSet<_>>()
        };
        Self {
            positive: normalize(lexicon.positive.as_slice()),
            negative: normalize(lexicon.negative.as_slice()),
        }
    }

    pub fn analyze(&self, text: &str) -> SentimentScore {
        let lowered = text.to_lowercase();
        let mut positive = 0;
        let mut negative = 0;

        for token in tokens(&lowered) {
            if self.positive.contains(token) {
                positive += 1;
            }
            if self.negative.contains(token) {
                negative += 1;
            }
        }

        let score = positive as i64 - negative as i64;
        let label = match score.signum() {
            1 => SentimentLabel::Positive,
            -1 => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        };

        SentimentScore {
            positive,
            negative,
            score,
            label,
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(&Lexicon::default())
    }
}

/// One-shot convenience wrapper.
pub fn analyze_sentiment(text: &str, lexicon: &Lexicon) -> SentimentScore {
    SentimentAnalyzer::new(lexicon).analyze(text)
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
}
