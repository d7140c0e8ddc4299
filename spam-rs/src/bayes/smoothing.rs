//! Corpus-adaptive smoothing coefficient
//!
//! Alpha is the share of test tokens that the training vocabulary already
//! knows. A test corpus close to the training data gets a larger alpha.

use crate::error::{Result, SpamError};

use super::model::Vocabulary;

/// Counts how many test tokens fall inside the training vocabulary
#[derive(Debug, Clone, Default)]
pub struct OverlapCounter {
    known: u64,
    total: u64,
}

impl OverlapCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's tokens
    pub fn observe(&mut self, tokens: &[String], vocabulary: &Vocabulary) {
        self.known += tokens.iter().filter(|t| vocabulary.contains(t)).count() as u64;
        self.total += tokens.len() as u64;
    }

    pub fn known(&self) -> u64 {
        self.known
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fraction of observed tokens present in the vocabulary
    pub fn alpha(&self) -> Result<f64> {
        if self.total == 0 {
            return Err(SpamError::Input(
                "cannot estimate smoothing: test corpus contains no tokens".to_string(),
            ));
        }
        Ok(self.known as f64 / self.total as f64)
    }
}

/// Estimate alpha over a whole set of tokenized test documents
pub fn estimate_alpha<I, T>(documents: I, vocabulary: &Vocabulary) -> Result<f64>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[String]>,
{
    let mut counter = OverlapCounter::new();
    for tokens in documents {
        counter.observe(tokens.as_ref(), vocabulary);
    }
    counter.alpha()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vocabulary {
        ["free", "money", "meeting", "agenda"].into_iter().collect()
    }

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_full_overlap_is_one() {
        let docs = vec![tokens("free money"), tokens("meeting agenda free")];
        assert_eq!(estimate_alpha(&docs, &vocabulary()).unwrap(), 1.0);
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let docs = vec![tokens("lunch today"), tokens("call me")];
        assert_eq!(estimate_alpha(&docs, &vocabulary()).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let docs = vec![tokens("free lunch"), tokens("money money call")];
        let alpha = estimate_alpha(&docs, &vocabulary()).unwrap();
        assert!((alpha - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_documents_are_counted_but_add_nothing() {
        let docs = vec![tokens(""), tokens("free call")];
        assert_eq!(estimate_alpha(&docs, &vocabulary()).unwrap(), 0.5);
    }

    #[test]
    fn test_no_tokens_is_an_input_error() {
        let docs: Vec<Vec<String>> = vec![tokens(""), tokens("   ")];
        assert!(matches!(
            estimate_alpha(&docs, &vocabulary()),
            Err(SpamError::Input(_))
        ));
        assert!(matches!(
            estimate_alpha(Vec::<Vec<String>>::new(), &vocabulary()),
            Err(SpamError::Input(_))
        ));
    }

    #[test]
    fn test_counter_tracks_totals() {
        let mut counter = OverlapCounter::new();
        counter.observe(&tokens("free x y"), &vocabulary());
        counter.observe(&tokens("agenda"), &vocabulary());
        assert_eq!(counter.known(), 2);
        assert_eq!(counter.total(), 4);
    }
}
