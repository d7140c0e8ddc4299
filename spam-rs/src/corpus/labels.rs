//! Label files
//!
//! Reads and writes the two-column `<document_id> <LABEL>` files used for
//! ground truth (`!truth.txt`) and predictions (`!prediction.txt`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, SpamError};

/// Class of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unwanted message (positive class)
    Spam,
    /// Legitimate message (negative class)
    Ham,
}

impl Label {
    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => write!(f, "spam"),
            Label::Ham => write!(f, "ham"),
        }
    }
}

/// Textual tags used for the two classes in label files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPair {
    /// Tag for spam
    pub positive: String,
    /// Tag for ham
    pub negative: String,
}

impl TagPair {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// Map a tag to its label, rejecting anything outside the pair
    pub fn parse(&self, tag: &str) -> Result<Label> {
        if tag == self.positive {
            Ok(Label::Spam)
        } else if tag == self.negative {
            Ok(Label::Ham)
        } else {
            Err(SpamError::Input(format!(
                "label must be either {} or {}, got '{}'",
                self.positive, self.negative, tag
            )))
        }
    }

    /// Tag written for a label
    pub fn tag(&self, label: Label) -> &str {
        match label {
            Label::Spam => &self.positive,
            Label::Ham => &self.negative,
        }
    }
}

impl Default for TagPair {
    fn default() -> Self {
        Self::new("SPAM", "OK")
    }
}

/// Document identifier to label mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: HashMap<String, Label>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse label file content. `origin` is only used in error messages.
    ///
    /// Blank lines are skipped. A repeated identifier keeps the last label.
    pub fn parse(content: &str, tags: &TagPair, origin: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(id) = fields.next() else {
                continue;
            };
            let tag = fields.next().ok_or_else(|| {
                SpamError::Input(format!(
                    "{}:{}: expected '<document> <label>', got '{}'",
                    origin,
                    index + 1,
                    line.trim()
                ))
            })?;
            let label = tags.parse(tag).map_err(|e| {
                SpamError::Input(format!("{}:{}: document '{}': {}", origin, index + 1, id, e))
            })?;

            entries.insert(id.to_string(), label);
        }

        Ok(Self { entries })
    }

    /// Read a label file from disk
    pub fn read(path: &Path, tags: &TagPair) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                SpamError::Input(format!("label file {} not found", path.display()))
            }
            _ => SpamError::io(path, e),
        })?;
        Self::parse(&content, tags, &path.display().to_string())
    }

    pub fn get(&self, id: &str) -> Option<Label> {
        self.entries.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.entries.values().filter(|l| **l == label).count()
    }

    pub fn as_map(&self) -> &HashMap<String, Label> {
        &self.entries
    }
}

impl FromIterator<(String, Label)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (String, Label)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Render records in label file format, preserving their order
pub fn render_labels<'a, I>(records: I, tags: &TagPair) -> String
where
    I: IntoIterator<Item = (&'a str, Label)>,
{
    let mut out = String::new();
    for (id, label) in records {
        out.push_str(id);
        out.push(' ');
        out.push_str(tags.tag(label));
        out.push('\n');
    }
    out
}

/// Write a label file atomically.
///
/// Content goes to `<name>.tmp` next to the target first and is renamed into
/// place, so readers never observe a half-written file.
pub fn write_labels<'a, I>(path: &Path, records: I, tags: &TagPair) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, Label)>,
{
    let content = render_labels(records, tags);
    let tmp_path = temp_path_for(path);

    let mut file = fs::File::create(&tmp_path).map_err(|e| SpamError::io(&tmp_path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| SpamError::io(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| SpamError::io(path, e))?;

    info!("Wrote {} labels to {}", content.lines().count(), path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_label_file() {
        let content = "em1 SPAM\nem2 OK\n\n  em3   SPAM  \n";
        let labels = LabelMap::parse(content, &TagPair::default(), "truth").unwrap();

        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get("em1"), Some(Label::Spam));
        assert_eq!(labels.get("em2"), Some(Label::Ham));
        assert_eq!(labels.get("em3"), Some(Label::Spam));
        assert_eq!(labels.get("em4"), None);
        assert_eq!(labels.count(Label::Spam), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let err = LabelMap::parse("em1 SPAM\nem2 MAYBE\n", &TagPair::default(), "truth").unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SpamError::Input(_)));
        assert!(message.contains("truth:2"));
        assert!(message.contains("em2"));
        assert!(message.contains("MAYBE"));
    }

    #[test]
    fn test_parse_rejects_missing_label() {
        let err = LabelMap::parse("em1\n", &TagPair::default(), "truth").unwrap_err();
        assert!(matches!(err, SpamError::Input(_)));
    }

    #[test]
    fn test_custom_tags() {
        let tags = TagPair::new("junk", "good");
        let labels = LabelMap::parse("a junk\nb good\n", &tags, "custom").unwrap();
        assert_eq!(labels.get("a"), Some(Label::Spam));
        assert_eq!(labels.get("b"), Some(Label::Ham));
        assert!(LabelMap::parse("a SPAM\n", &tags, "custom").is_err());
    }

    #[test]
    fn test_render_keeps_order() {
        let rendered = render_labels(
            vec![("b", Label::Ham), ("a", Label::Spam)],
            &TagPair::default(),
        );
        assert_eq!(rendered, "b OK\na SPAM\n");
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("!prediction.txt");
        let tags = TagPair::default();
        let records = vec![
            ("msg1", Label::Spam),
            ("msg2", Label::Ham),
            ("msg3", Label::Ham),
        ];

        write_labels(&path, records.clone(), &tags).unwrap();
        let read_back = LabelMap::read(&path, &tags).unwrap();

        let expected: LabelMap = records
            .into_iter()
            .map(|(id, label)| (id.to_string(), label))
            .collect();
        assert_eq!(read_back, expected);
        assert!(!dir.path().join("!prediction.txt.tmp").exists());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = LabelMap::read(&dir.path().join("!truth.txt"), &TagPair::default()).unwrap_err();
        assert!(matches!(err, SpamError::Input(_)));
    }
}
