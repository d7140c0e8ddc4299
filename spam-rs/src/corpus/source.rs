//! Document sources
//!
//! A corpus is anything that can list its document identifiers and read a
//! document by identifier. Every call to [`DocumentSource::documents`] starts a
//! fresh pass, so a directory is re-listed and files are re-read each time.

use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, SpamError};

use super::labels::{Label, LabelMap, TagPair};

/// A single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier, unique within its corpus
    pub id: String,
    /// Raw message text
    pub body: String,
}

impl Document {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Finite, restartable collection of documents
pub trait DocumentSource {
    /// Identifiers of all documents, in iteration order
    fn identifiers(&self) -> Result<Vec<String>>;

    /// Read one document
    fn read(&self, id: &str) -> Result<Document>;

    /// Start a new pass over every document
    fn documents(&self) -> Result<Box<dyn Iterator<Item = Result<Document>> + '_>> {
        let ids = self.identifiers()?;
        Ok(Box::new(ids.into_iter().map(move |id| self.read(&id))))
    }
}

/// Documents stored one per file in a directory.
///
/// Files whose name starts with the metadata marker are skipped.
/// Identifiers are returned in lexicographic order.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    path: PathBuf,
    metadata_marker: String,
}

impl DirectoryCorpus {
    pub fn new(path: impl Into<PathBuf>, metadata_marker: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata_marker: metadata_marker.into(),
        }
    }

    /// Path of a metadata file (e.g. `!truth.txt`) inside the corpus
    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl DocumentSource for DirectoryCorpus {
    fn identifiers(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path).map_err(|e| SpamError::io(&self.path, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SpamError::io(&self.path, e))?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&self.metadata_marker) {
                continue;
            }

            // Follows symlinks, so a linked message file counts as a document
            let path = entry.path();
            let metadata = fs::metadata(&path).map_err(|e| SpamError::io(&path, e))?;
            if !metadata.is_file() {
                debug!("Skipping non-file entry {}", entry.path().display());
                continue;
            }

            ids.push(name);
        }

        ids.sort();
        Ok(ids)
    }

    fn read(&self, id: &str) -> Result<Document> {
        let path = self.path.join(id);
        let bytes = fs::read(&path).map_err(|e| SpamError::io(&path, e))?;

        Ok(Document {
            id: id.to_string(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Documents held in memory, iterated in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    documents: Vec<Document>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, body: impl Into<String>) {
        self.documents.push(Document::new(id, body));
    }

    pub fn with(mut self, id: impl Into<String>, body: impl Into<String>) -> Self {
        self.push(id, body);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemoryCorpus {
    fn identifiers(&self) -> Result<Vec<String>> {
        Ok(self.documents.iter().map(|d| d.id.clone()).collect())
    }

    fn read(&self, id: &str) -> Result<Document> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| SpamError::Input(format!("no document '{}' in memory corpus", id)))
    }

    fn documents(&self) -> Result<Box<dyn Iterator<Item = Result<Document>> + '_>> {
        Ok(Box::new(self.documents.iter().cloned().map(Ok::<Document, SpamError>)))
    }
}

/// A document source paired with its ground-truth labels
pub struct LabeledCorpus<S> {
    source: S,
    labels: LabelMap,
}

impl<S: DocumentSource> LabeledCorpus<S> {
    pub fn new(source: S, labels: LabelMap) -> Self {
        Self { source, labels }
    }

    /// Label of a document, if it has one
    pub fn class_of(&self, id: &str) -> Option<Label> {
        self.labels.get(id)
    }

    /// Documents carrying `label`. Unlabeled documents are never read.
    pub fn documents_of(
        &self,
        label: Label,
    ) -> Result<impl Iterator<Item = Result<Document>> + '_> {
        let ids = self.source.identifiers()?;
        Ok(ids
            .into_iter()
            .filter(move |id| self.labels.get(id) == Some(label))
            .map(move |id| self.source.read(&id)))
    }
}

impl LabeledCorpus<DirectoryCorpus> {
    /// Open a corpus directory together with its truth file
    pub fn open(
        path: impl Into<PathBuf>,
        metadata_marker: &str,
        truth_file: &str,
        tags: &TagPair,
    ) -> Result<Self> {
        let source = DirectoryCorpus::new(path, metadata_marker);
        let labels = LabelMap::read(&source.metadata_path(truth_file), tags)?;
        Ok(Self::new(source, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_corpus() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("msg2"), "second body").unwrap();
        fs::write(dir.path().join("msg1"), "first body").unwrap();
        fs::write(dir.path().join("msg3"), "third body").unwrap();
        fs::write(dir.path().join("!truth.txt"), "msg1 SPAM\nmsg2 OK\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_directory_skips_metadata_and_dirs() {
        let dir = setup_corpus();
        let corpus = DirectoryCorpus::new(dir.path(), "!");

        let ids = corpus.identifiers().unwrap();
        assert_eq!(ids, vec!["msg1", "msg2", "msg3"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "hello there").unwrap();
        fs::write(outside.path().join("target"), "free money").unwrap();
        std::os::unix::fs::symlink(outside.path().join("target"), dir.path().join("b")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();

        let corpus = DirectoryCorpus::new(dir.path(), "!");
        assert_eq!(corpus.identifiers().unwrap(), vec!["a", "b"]);
        assert_eq!(corpus.read("b").unwrap().body, "free money");
    }

    #[test]
    fn test_directory_documents_are_restartable() {
        let dir = setup_corpus();
        let corpus = DirectoryCorpus::new(dir.path(), "!");

        let first: Vec<Document> = corpus.documents().unwrap().map(|d| d.unwrap()).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].body, "first body");

        // A new pass sees files added since the previous one
        fs::write(dir.path().join("msg4"), "fourth body").unwrap();
        let second: Vec<Document> = corpus.documents().unwrap().map(|d| d.unwrap()).collect();
        assert_eq!(second.len(), 4);
    }

    #[test]
    fn test_directory_reads_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("raw"), b"caf\xe9 menu").unwrap();
        let corpus = DirectoryCorpus::new(dir.path(), "!");

        let doc = corpus.read("raw").unwrap();
        assert!(doc.body.starts_with("caf"));
        assert!(doc.body.ends_with(" menu"));
    }

    #[test]
    fn test_missing_directory() {
        let corpus = DirectoryCorpus::new("/nonexistent/spam-rs/corpus", "!");
        assert!(matches!(corpus.identifiers(), Err(SpamError::Io { .. })));
    }

    #[test]
    fn test_memory_corpus_order() {
        let corpus = MemoryCorpus::new().with("b", "bee").with("a", "ay");
        let ids: Vec<String> = corpus.documents().unwrap().map(|d| d.unwrap().id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(corpus.read("a").unwrap().body, "ay");
        assert!(corpus.read("c").is_err());
    }

    #[test]
    fn test_labeled_corpus_partitions_by_label() {
        let dir = setup_corpus();
        let corpus = LabeledCorpus::open(dir.path(), "!", "!truth.txt", &TagPair::default()).unwrap();

        let spam: Vec<String> = corpus
            .documents_of(Label::Spam)
            .unwrap()
            .map(|d| d.unwrap().id)
            .collect();
        let ham: Vec<String> = corpus
            .documents_of(Label::Ham)
            .unwrap()
            .map(|d| d.unwrap().id)
            .collect();

        assert_eq!(spam, vec!["msg1"]);
        assert_eq!(ham, vec!["msg2"]);
        assert_eq!(corpus.class_of("msg3"), None);
    }

    #[test]
    fn test_labeled_memory_corpus() {
        let source = MemoryCorpus::new().with("x", "one").with("y", "two");
        let labels: LabelMap = vec![("x".to_string(), Label::Ham)].into_iter().collect();
        let corpus = LabeledCorpus::new(source, labels);

        let ham: Vec<Document> = corpus
            .documents_of(Label::Ham)
            .unwrap()
            .map(|d| d.unwrap())
            .collect();
        assert_eq!(ham, vec![Document::new("x", "one")]);
        assert_eq!(corpus.documents_of(Label::Spam).unwrap().count(), 0);
    }
}
