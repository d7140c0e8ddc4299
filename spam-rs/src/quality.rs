//! Filter quality evaluation
//!
//! Compares a truth label set with a prediction label set through a binary
//! confusion matrix and folds the counts into a weighted accuracy, where
//! flagging a legitimate message costs more than letting spam through.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use tracing::info;

use crate::config::FilterConfig;
use crate::corpus::{Label, LabelMap};
use crate::error::{Result, SpamError};

/// Weight of a false positive relative to a false negative
pub const DEFAULT_FALSE_POSITIVE_WEIGHT: f64 = 10.0;

/// Confusion matrix counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionCounts {
    pub fn total(&self) -> u64 {
        self.tp + self.tn + self.fp + self.fn_
    }
}

/// Binary confusion matrix over an arbitrary positive/negative tag pair
#[derive(Debug, Clone)]
pub struct ConfusionMatrix<T> {
    pos_tag: T,
    neg_tag: T,
    counts: ConfusionCounts,
}

impl<T: PartialEq + Debug> ConfusionMatrix<T> {
    pub fn new(pos_tag: T, neg_tag: T) -> Self {
        Self {
            pos_tag,
            neg_tag,
            counts: ConfusionCounts::default(),
        }
    }

    fn check_value_of(&self, value: &T, role: &str) -> Result<()> {
        if *value != self.pos_tag && *value != self.neg_tag {
            return Err(SpamError::Input(format!(
                "{} must be either {:?} or {:?}, got {:?}",
                role, self.pos_tag, self.neg_tag, value
            )));
        }
        Ok(())
    }

    /// Count one (truth, prediction) pair
    pub fn update(&mut self, truth: &T, prediction: &T) -> Result<()> {
        self.check_value_of(truth, "truth")?;
        self.check_value_of(prediction, "prediction")?;

        if *prediction == self.pos_tag {
            if truth == prediction {
                self.counts.tp += 1;
            } else {
                self.counts.fp += 1;
            }
        } else if truth == prediction {
            self.counts.tn += 1;
        } else {
            self.counts.fn_ += 1;
        }
        Ok(())
    }

    /// Count every document of `truth` against its prediction
    pub fn compute_from_maps(
        &mut self,
        truth: &HashMap<String, T>,
        prediction: &HashMap<String, T>,
    ) -> Result<()> {
        for (id, truth_value) in truth {
            let predicted = prediction.get(id).ok_or_else(|| {
                SpamError::Input(format!("no prediction for document '{}'", id))
            })?;
            self.update(truth_value, predicted)?;
        }
        Ok(())
    }

    pub fn as_counts(&self) -> ConfusionCounts {
        self.counts
    }
}

/// Weighted accuracy with the default false-positive weight
pub fn quality_score(tp: u64, tn: u64, fp: u64, fn_: u64) -> Result<f64> {
    weighted_quality_score(
        &ConfusionCounts { tp, tn, fp, fn_ },
        DEFAULT_FALSE_POSITIVE_WEIGHT,
    )
}

/// `(tp + tn) / (tp + tn + weight * fp + fn)`
pub fn weighted_quality_score(counts: &ConfusionCounts, false_positive_weight: f64) -> Result<f64> {
    let correct = (counts.tp + counts.tn) as f64;
    let denominator = correct + false_positive_weight * counts.fp as f64 + counts.fn_ as f64;

    if denominator == 0.0 {
        return Err(SpamError::Arithmetic(
            "quality score is undefined for an empty confusion matrix".to_string(),
        ));
    }
    Ok(correct / denominator)
}

/// Outcome of evaluating a corpus
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub counts: ConfusionCounts,
    pub quality: f64,
}

/// Evaluate the prediction file of a corpus directory against its truth file
pub fn evaluate_with(corpus_dir: &Path, config: &FilterConfig) -> Result<Evaluation> {
    let truth = LabelMap::read(&corpus_dir.join(&config.corpus.truth_file), &config.labels)?;
    let prediction = LabelMap::read(
        &corpus_dir.join(&config.corpus.prediction_file),
        &config.labels,
    )?;

    let mut matrix = ConfusionMatrix::new(Label::Spam, Label::Ham);
    matrix.compute_from_maps(truth.as_map(), prediction.as_map())?;

    let counts = matrix.as_counts();
    let quality = weighted_quality_score(&counts, config.evaluation.false_positive_weight)?;

    info!(
        "Evaluated {}: tp={} tn={} fp={} fn={} quality={:.4}",
        corpus_dir.display(),
        counts.tp,
        counts.tn,
        counts.fp,
        counts.fn_,
        quality
    );

    Ok(Evaluation { counts, quality })
}

/// Quality score of a corpus directory with default settings
pub fn evaluate(corpus_dir: &Path) -> Result<f64> {
    evaluate_with(corpus_dir, &FilterConfig::default()).map(|e| e.quality)
}
