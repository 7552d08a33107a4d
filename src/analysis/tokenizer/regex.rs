//! Regex-based tokenizer implementation.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{InaworldError, Result};

/// Token pattern for plot summaries: purely alphabetic runs between word boundaries.
pub const ALPHABETIC_WORD_PATTERN: &str = r"\b[a-zA-Z]+\b";

/// Compiled once and shared by every default tokenizer.
static ALPHABETIC_WORD: LazyLock<Arc<Regex>> = LazyLock::new(|| {
    Arc::new(Regex::new(ALPHABETIC_WORD_PATTERN).unwrap())
});

/// A regex-based tokenizer that extracts every match of a pattern as a token.
///
/// The default pattern keeps only purely alphabetic words, so numbers,
/// punctuation and mixed tokens such as `r2d2` never reach the vocabulary.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the alphabetic word pattern.
    pub fn new() -> Result<Self> {
        Ok(Self::default())
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| InaworldError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        RegexTokenizer {
            pattern: Arc::clone(&ALPHABETIC_WORD),
        }
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_tokenizer() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("hello world").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 5);

        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[1].start_offset, 6);
        assert_eq!(tokens[1].end_offset, 11);
    }

    #[test]
    fn test_alphabetic_pattern_skips_numbers_and_mixed_words() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<String> = tokenizer
            .tokenize("In 1977, R2D2 and C-3PO flee... Luke's droids!")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(tokens, vec!["In", "and", "C", "flee", "Luke", "s", "droids"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = RegexTokenizer::with_pattern("[unclosed");
        assert!(matches!(result, Err(InaworldError::Analysis(_))));
    }

    #[test]
    fn test_default_tokenizers_share_the_compiled_pattern() {
        let first = RegexTokenizer::default();
        let second = RegexTokenizer::new().unwrap();

        assert_eq!(first.pattern(), ALPHABETIC_WORD_PATTERN);
        assert!(Arc::ptr_eq(&first.pattern, &second.pattern));
        let tokens: Vec<String> = first.tokenize("Spy 007 returns").unwrap().map(|t| t.text).collect();
        assert_eq!(tokens, vec!["Spy", "returns"]);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(RegexTokenizer::new().unwrap().name(), "regex");
    }
}
