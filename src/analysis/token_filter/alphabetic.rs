//! Filter that keeps only purely alphabetic tokens.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Drops tokens containing anything other than ASCII letters (digits,
/// punctuation, apostrophes, accented characters).
#[derive(Clone, Debug, Default)]
pub struct AlphabeticFilter;

impl AlphabeticFilter {
    /// Create a new alphabetic filter.
    pub fn new() -> Self {
        AlphabeticFilter
    }

    /// Check whether a word consists of ASCII letters only.
    pub fn is_alphabetic(word: &str) -> bool {
        !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl Filter for AlphabeticFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| token.is_stopped() || Self::is_alphabetic(&token.text))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "alphabetic"
    }
}
