//! Train/test pipeline
//!
//! [`SpamFilter`] learns word frequencies from a labeled corpus directory and
//! writes a prediction file for an unlabeled one.

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::bayes::{
    decide_outcomes, estimate_alpha, FrequencyModel, ProbabilityTracker, ScoreOutcome, Scorer,
    Tokenizer,
};
use crate::config::FilterConfig;
use crate::corpus::labels::write_labels;
use crate::corpus::{DirectoryCorpus, DocumentSource, Label, LabeledCorpus};
use crate::error::{Result, SpamError};

/// Classification of a single message
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub label: Label,
    pub spam: ScoreOutcome,
    pub ham: ScoreOutcome,
}

/// Predicted label for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub id: String,
    pub label: Label,
}

/// Summary of a test run
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    /// Smoothing coefficient used for the run
    pub alpha: f64,
    /// Predictions in document iteration order
    pub predictions: Vec<Prediction>,
    /// Average per-token probability over all scoring calls
    pub mean_word_probability: Option<f64>,
}

impl TestReport {
    /// Number of predictions with `label`
    pub fn count(&self, label: Label) -> usize {
        self.predictions.iter().filter(|p| p.label == label).count()
    }
}

/// Naive Bayes spam filter
pub struct SpamFilter {
    config: FilterConfig,
    tokenizer: Tokenizer,
    model: Option<FrequencyModel>,
}

impl SpamFilter {
    /// Create an untrained filter
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tokenizer: Tokenizer::new()?,
            model: None,
        })
    }

    /// Trained model, if any
    pub fn model(&self) -> Option<&FrequencyModel> {
        self.model.as_ref()
    }

    fn trained_model(&self) -> Result<&FrequencyModel> {
        self.model
            .as_ref()
            .ok_or_else(|| SpamError::Input("filter has not been trained".to_string()))
    }

    /// Train on a corpus directory holding a truth file
    pub fn train(&mut self, corpus_dir: &Path) -> Result<&FrequencyModel> {
        info!("Training on {}", corpus_dir.display());
        let corpus = LabeledCorpus::open(
            corpus_dir,
            &self.config.corpus.metadata_marker,
            &self.config.corpus.truth_file,
            &self.config.labels,
        )?;
        self.train_from(&corpus)
    }

    /// Train on any labeled document source
    pub fn train_from<S: DocumentSource>(&mut self, corpus: &LabeledCorpus<S>) -> Result<&FrequencyModel> {
        let bodies = |label: Label| -> Result<Vec<String>> {
            corpus
                .documents_of(label)?
                .map(|document| document.map(|d| d.body))
                .collect()
        };
        let spam = bodies(Label::Spam)?;
        let ham = bodies(Label::Ham)?;

        let model = FrequencyModel::train(&self.tokenizer, &spam, &ham)?;
        let summary = model.summary();
        info!(
            "Trained on {} spam and {} ham documents, vocabulary size {}",
            summary.spam_documents, summary.ham_documents, summary.vocabulary_size
        );
        debug!(
            "Spam tokens {}, ham tokens {}, spam fraction {:.3}",
            summary.spam_tokens, summary.ham_tokens, summary.spam_fraction
        );

        let model = self.model.insert(model);
        Ok(&*model)
    }

    /// Smoothing coefficient for a test corpus (first pass over the documents)
    pub fn estimate_alpha<S: DocumentSource>(&self, source: &S) -> Result<f64> {
        let model = self.trained_model()?;
        let documents = source
            .documents()?
            .map(|document| document.map(|d| self.tokenizer.tokenize(&d.body)))
            .collect::<Result<Vec<_>>>()?;

        let alpha = estimate_alpha(&documents, model.vocabulary())?;
        info!("Smoothing alpha {:.4} over {} test documents", alpha, documents.len());
        Ok(alpha)
    }

    /// Classify one message with a given smoothing coefficient
    pub fn classify(&self, text: &str, alpha: f64) -> Result<Classification> {
        let model = self.trained_model()?;
        let tokens = self.tokenizer.tokenize(text);
        let scorer = Scorer::new(model.vocabulary(), alpha)
            .with_rescale_factor(self.config.classifier.rescale_factor);

        let initial = |label: Label| {
            if self.config.classifier.apply_class_prior {
                model.prior(label)
            } else {
                1.0
            }
        };

        let spam = scorer.score(&tokens, model.class_counts(Label::Spam), initial(Label::Spam))?;
        let ham = scorer.score(&tokens, model.class_counts(Label::Ham), initial(Label::Ham))?;

        Ok(Classification {
            label: decide_outcomes(&spam, &ham),
            spam,
            ham,
        })
    }

    /// Classify every document of a source without writing anything
    pub fn classify_source<S: DocumentSource>(&self, source: &S) -> Result<TestReport> {
        let alpha = self.estimate_alpha(source)?;
        let mut tracker = ProbabilityTracker::new();
        let mut predictions = Vec::new();

        for document in source.documents()? {
            let document = document?;
            let classification = self.classify(&document.body, alpha).map_err(|e| match e {
                SpamError::Arithmetic(msg) => {
                    SpamError::Arithmetic(format!("document '{}': {}", document.id, msg))
                }
                other => other,
            })?;

            tracker.record(&classification.spam);
            tracker.record(&classification.ham);
            debug!(
                "{}: {} (spam {}/{:e}, ham {}/{:e})",
                document.id,
                classification.label,
                classification.spam.overflow,
                classification.spam.score,
                classification.ham.overflow,
                classification.ham.score
            );

            predictions.push(Prediction {
                id: document.id,
                label: classification.label,
            });
        }

        Ok(TestReport {
            alpha,
            predictions,
            mean_word_probability: tracker.mean(),
        })
    }

    /// Classify a corpus directory and write its prediction file.
    ///
    /// Nothing is written unless every document was classified.
    pub fn test(&self, corpus_dir: &Path) -> Result<TestReport> {
        info!("Testing on {}", corpus_dir.display());
        let corpus = DirectoryCorpus::new(corpus_dir, self.config.corpus.metadata_marker.as_str());
        let report = self.classify_source(&corpus)?;

        write_labels(
            &corpus.metadata_path(&self.config.corpus.prediction_file),
            report.predictions.iter().map(|p| (p.id.as_str(), p.label)),
            &self.config.labels,
        )?;

        info!(
            "Classified {} documents: {} spam, {} ham",
            report.predictions.len(),
            report.count(Label::Spam),
            report.count(Label::Ham)
        );
        Ok(report)
    }
}
