//! Message tokenizer
//!
//! Strips markup and punctuation from a raw message and splits it into
//! word tokens. Sentence-initial capitalization is folded to lowercase;
//! all-caps and internally capitalized words are kept as they are.

use regex::Regex;

use crate::error::Result;

/// HTML comment, possibly wrapping tag-like content
const COMMENT_PATTERN: &str = r"<!--(?:<[^>]+>|[^<>]+)*-->";
/// Anything that looks like a tag
const TAG_PATTERN: &str = r"<[^>]+>";
/// Punctuation dropped before splitting
const PUNCTUATION_PATTERN: &str = r#"[,?.:_"!/()=;-]"#;

/// Word tokenizer with precompiled patterns
#[derive(Debug, Clone)]
pub struct Tokenizer {
    comments: Regex,
    tags: Regex,
    punctuation: Regex,
}

impl Tokenizer {
    /// Compile the tokenizer patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            comments: Regex::new(COMMENT_PATTERN)?,
            tags: Regex::new(TAG_PATTERN)?,
            punctuation: Regex::new(PUNCTUATION_PATTERN)?,
        })
    }

    /// Remove comments, tags and punctuation from a message
    pub fn purify(&self, raw: &str) -> String {
        let text = self.comments.replace_all(raw, "");
        let text = self.tags.replace_all(&text, "");
        self.punctuation.replace_all(&text, "").into_owned()
    }

    /// Split a message into normalized word tokens
    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        self.purify(raw)
            .split_whitespace()
            .map(normalize_case)
            .collect()
    }
}

/// Lowercase words that look like `Capitalized`, leave everything else alone
fn normalize_case(word: &str) -> String {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase() => {
            word.to_lowercase()
        }
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new().unwrap()
    }

    #[test]
    fn test_strips_tags_and_folds_capitals() {
        let tokens = tokenizer().tokenize("<b>Hello</b> World!");
        assert_eq!(tokens, vec!["hello", "world"]);
    }

    #[test]
    fn test_keeps_all_caps_and_inner_capitals() {
        let tokens = tokenizer().tokenize("FREE iPhone McDonald Offer");
        assert_eq!(tokens, vec!["FREE", "iPhone", "mcdonald", "offer"]);
    }

    #[test]
    fn test_single_letter_words_untouched() {
        let tokens = tokenizer().tokenize("I am A person");
        assert_eq!(tokens, vec!["I", "am", "A", "person"]);
    }

    #[test]
    fn test_removes_comments_with_nested_tags() {
        let tokens = tokenizer().tokenize("before <!-- hidden <span>text</span> here --> after");
        assert_eq!(tokens, vec!["before", "after"]);
    }

    #[test]
    fn test_removes_punctuation_set() {
        let tokens = tokenizer().tokenize(r#"a,b?c.d:e_f"g!h/i(j)k=l;m-n"#);
        assert_eq!(tokens, vec!["abcdefghijklmn"]);
    }

    #[test]
    fn test_other_symbols_survive() {
        let tokens = tokenizer().tokenize("$100 & 50% off #deal");
        assert_eq!(tokens, vec!["$100", "&", "50%", "off", "#deal"]);
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let tokens = tokenizer().tokenize("money money\n\tmoney");
        assert_eq!(tokens, vec!["money", "money", "money"]);
    }

    #[test]
    fn test_empty_and_markup_only_input() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let t = tokenizer();
        let raw = "<p>Dear Friend,</p> <!-- x --> CLICK here: http://spam.example/win NOW!!! (Limited) offer";
        let first = t.tokenize(raw);
        let second = t.tokenize(&first.join(" "));
        assert_eq!(first, second);
    }
}
