//! Class-conditional likelihood scoring
//!
//! The likelihood of a message under a class is the product of its per-token
//! probabilities. To keep that product representable without going to log
//! space, the running value is rescaled by a constant before each token and
//! reset whenever it overflows to infinity or underflows to zero. Each reset
//! moves an overflow counter up or down, which makes the counter a coarse
//! order of magnitude and the remaining product the fine part.

use serde::Serialize;

use crate::error::{Result, SpamError};

use super::model::{Vocabulary, WordFrequency};

/// Rescale applied before every token
pub const DEFAULT_RESCALE_FACTOR: f64 = 1000.0;

/// Result of scoring one token sequence under one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreOutcome {
    /// Remaining rescaled product
    pub score: f64,
    /// Overflows minus underflows seen while multiplying
    pub overflow: i64,
    /// Average per-token probability of this call
    pub mean_probability: f64,
}

/// Scores token sequences against one trained vocabulary and smoothing alpha
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    vocabulary: &'a Vocabulary,
    alpha: f64,
    rescale_factor: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(vocabulary: &'a Vocabulary, alpha: f64) -> Self {
        Self {
            vocabulary,
            alpha,
            rescale_factor: DEFAULT_RESCALE_FACTOR,
        }
    }

    pub fn with_rescale_factor(mut self, rescale_factor: f64) -> Self {
        self.rescale_factor = rescale_factor;
        self
    }

    /// Smoothed probability of `token` under `class`.
    ///
    /// Tokens outside the training vocabulary are neutral and return 1.
    pub fn word_probability(&self, token: &str, class: &WordFrequency) -> f64 {
        if !self.vocabulary.contains(token) {
            return 1.0;
        }

        let denominator = class.total() as f64
            + self.alpha * self.vocabulary.len() as f64
            + self.alpha;

        match class.get(token) {
            Some(count) => (count as f64 + self.alpha) / denominator,
            None => self.alpha / denominator,
        }
    }

    /// Score `tokens` under `class`, starting the product at `initial`.
    ///
    /// An empty sequence has no mean probability and is an arithmetic error.
    /// So is a known token with an undefined probability, which happens when
    /// alpha is zero and `class` holds no tokens.
    pub fn score(&self, tokens: &[String], class: &WordFrequency, initial: f64) -> Result<ScoreOutcome> {
        if tokens.is_empty() {
            return Err(SpamError::Arithmetic(
                "cannot score an empty token sequence".to_string(),
            ));
        }

        let mut product = initial;
        let mut overflow = 0i64;
        let mut probability_sum = 0.0;

        for token in tokens {
            let probability = self.word_probability(token, class);
            if probability.is_nan() {
                return Err(SpamError::Arithmetic(format!(
                    "undefined probability for '{}' with alpha {}",
                    token, self.alpha
                )));
            }
            probability_sum += probability;

            product *= self.rescale_factor;
            product *= probability;

            if product == f64::INFINITY {
                overflow += 1;
                product = 1.0;
            } else if product == 0.0 {
                overflow -= 1;
                product = 1.0;
            }
        }

        Ok(ScoreOutcome {
            score: product,
            overflow,
            mean_probability: probability_sum / tokens.len() as f64,
        })
    }
}

/// Caller-owned running average of per-call mean probabilities
#[derive(Debug, Clone, Default)]
pub struct ProbabilityTracker {
    sum: f64,
    calls: u64,
}

impl ProbabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &ScoreOutcome) {
        self.sum += outcome.mean_probability;
        self.calls += 1;
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Average over all recorded calls, `None` before the first one
    pub fn mean(&self) -> Option<f64> {
        (self.calls > 0).then(|| self.sum / self.calls as f64)
    }
}
