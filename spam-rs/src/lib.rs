//! spam-rs: Naive Bayes spam filter
//!
//! Trains a bag-of-words model on a labeled mail corpus and classifies the
//! messages of another corpus as spam or ham.
//!
//! # Features
//!
//! - **Tokenizer**: strips HTML comments, tags and punctuation
//! - **Adaptive smoothing**: additive smoothing coefficient derived from the
//!   overlap between test and training vocabulary
//! - **Underflow handling**: rescaled likelihood products with an
//!   overflow/underflow counter instead of log space
//! - **Evaluation**: confusion matrix and a quality score that punishes
//!   false positives ten times harder than false negatives
//!
//! # Corpus layout
//!
//! A corpus is a directory with one file per message. Files starting with `!`
//! are metadata: `!truth.txt` holds the ground truth and `!prediction.txt`
//! is written by a test run, both as `<file name> <SPAM|OK>` lines.
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::config::FilterConfig;
//! use spam_rs::filter::SpamFilter;
//! use spam_rs::quality;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut filter = SpamFilter::new(FilterConfig::default())?;
//!     filter.train(Path::new("corpus/1"))?;
//!     filter.test(Path::new("corpus/2"))?;
//!
//!     let score = quality::evaluate(Path::new("corpus/2"))?;
//!     println!("quality: {:.4}", score);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`bayes`]: tokenizer, frequency model, smoothing, scoring, decision
//! - [`corpus`]: document sources and label files
//! - [`filter`]: train/test pipeline over corpus directories
//! - [`quality`]: confusion matrix and quality score
//! - [`config`]: configuration management
//! - [`error`]: error types

pub mod bayes;
pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod quality;

// Re-export commonly used types
pub use config::FilterConfig;
pub use corpus::Label;
pub use error::{Result, SpamError};
pub use filter::{SpamFilter, TestReport};
