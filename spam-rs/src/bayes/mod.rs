//! Naive Bayes classifier
//!
//! - [`tokenizer`]: markup-aware word tokenizer
//! - [`model`]: vocabulary and per-class word frequencies
//! - [`smoothing`]: corpus-adaptive smoothing coefficient
//! - [`scorer`]: rescaled likelihood with overflow counting
//! - [`decision`]: spam/ham decision from two scores

pub mod decision;
pub mod model;
pub mod scorer;
pub mod smoothing;
pub mod tokenizer;

pub use decision::{decide, decide_outcomes};
pub use model::{FrequencyModel, ModelBuilder, ModelSummary, Vocabulary, WordFrequency};
pub use scorer::{ProbabilityTracker, ScoreOutcome, Scorer, DEFAULT_RESCALE_FACTOR};
pub use smoothing::{estimate_alpha, OverlapCounter};
pub use tokenizer::Tokenizer;
