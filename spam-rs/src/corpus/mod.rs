//! Mail corpora
//!
//! - [`source`]: documents read from a directory or held in memory
//! - [`labels`]: truth and prediction label files

pub mod labels;
pub mod source;

pub use labels::{Label, LabelMap, TagPair};
pub use source::{DirectoryCorpus, Document, DocumentSource, LabeledCorpus, MemoryCorpus};
