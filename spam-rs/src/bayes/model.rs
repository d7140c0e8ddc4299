//! Vocabulary and per-class word frequencies

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::corpus::Label;
use crate::error::{Result, SpamError};

use super::tokenizer::Tokenizer;

/// Word counts of one class
#[derive(Debug, Clone, Default)]
pub struct WordFrequency {
    counts: HashMap<String, u64>,
    total: u64,
}

impl WordFrequency {
    /// Add tokens to the counts
    pub fn extend<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        for token in tokens {
            *self.counts.entry(token).or_insert(0) += 1;
            self.total += 1;
        }
    }

    /// Occurrences of `token` in this class, if it was seen at all
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Total number of tokens in this class
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens in this class
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    fn words(&self) -> impl Iterator<Item = &String> {
        self.counts.keys()
    }
}

/// Distinct tokens seen during training, across both classes
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Training statistics, for logging and reports
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub spam_documents: usize,
    pub ham_documents: usize,
    pub spam_tokens: u64,
    pub ham_tokens: u64,
    pub vocabulary_size: usize,
    pub spam_fraction: f64,
}

/// Accumulates training documents before the model is frozen
#[derive(Debug, Default)]
pub struct ModelBuilder {
    spam: WordFrequency,
    ham: WordFrequency,
    spam_documents: usize,
    ham_documents: usize,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one training document's tokens under `label`
    pub fn learn(&mut self, label: Label, tokens: Vec<String>) {
        match label {
            Label::Spam => {
                self.spam_documents += 1;
                self.spam.extend(tokens);
            }
            Label::Ham => {
                self.ham_documents += 1;
                self.ham.extend(tokens);
            }
        }
    }

    /// Freeze the counts. Both classes need at least one document.
    pub fn build(self) -> Result<FrequencyModel> {
        if self.spam_documents == 0 || self.ham_documents == 0 {
            return Err(SpamError::Input(format!(
                "training needs documents of both classes, got {} spam and {} ham",
                self.spam_documents, self.ham_documents
            )));
        }

        let vocabulary = Vocabulary {
            words: self
                .spam
                .words()
                .chain(self.ham.words())
                .cloned()
                .collect(),
        };

        Ok(FrequencyModel {
            spam: self.spam,
            ham: self.ham,
            vocabulary,
            spam_documents: self.spam_documents,
            ham_documents: self.ham_documents,
        })
    }
}

/// Trained bag-of-words model. Read-only once built.
#[derive(Debug, Clone)]
pub struct FrequencyModel {
    spam: WordFrequency,
    ham: WordFrequency,
    vocabulary: Vocabulary,
    spam_documents: usize,
    ham_documents: usize,
}

impl FrequencyModel {
    /// Train from raw spam and ham message bodies
    pub fn train<S, H>(tokenizer: &Tokenizer, spam: S, ham: H) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        let mut builder = ModelBuilder::new();
        for body in spam {
            builder.learn(Label::Spam, tokenizer.tokenize(body.as_ref()));
        }
        for body in ham {
            builder.learn(Label::Ham, tokenizer.tokenize(body.as_ref()));
        }
        builder.build()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    /// Word counts for one class
    pub fn class_counts(&self, label: Label) -> &WordFrequency {
        match label {
            Label::Spam => &self.spam,
            Label::Ham => &self.ham,
        }
    }

    pub fn class_total(&self, label: Label) -> u64 {
        self.class_counts(label).total()
    }

    /// Number of training documents per class, `(spam, ham)`
    pub fn document_counts(&self) -> (usize, usize) {
        (self.spam_documents, self.ham_documents)
    }

    /// Fraction of training documents that were spam
    pub fn spam_fraction(&self) -> f64 {
        self.spam_documents as f64 / (self.spam_documents + self.ham_documents) as f64
    }

    /// Class prior of `label`
    pub fn prior(&self, label: Label) -> f64 {
        match label {
            Label::Spam => self.spam_fraction(),
            Label::Ham => 1.0 - self.spam_fraction(),
        }
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            spam_documents: self.spam_documents,
            ham_documents: self.ham_documents,
            spam_tokens: self.spam.total(),
            ham_tokens: self.ham.total(),
            vocabulary_size: self.vocabulary_size(),
            spam_fraction: self.spam_fraction(),
        }
    }
}
