//! Proper noun filter.
//!
//! Without a part-of-speech tagger, a capitalized token is taken to be a
//! proper noun unless it opens a sentence. Sentence-initial words keep their
//! place in the stream because their capital letter carries no information.
//! The filter must run before lowercasing.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Removes capitalized tokens that do not start a sentence.
#[derive(Clone, Debug, Default)]
pub struct ProperNounFilter;

impl ProperNounFilter {
    /// Create a new proper noun filter.
    pub fn new() -> Self {
        ProperNounFilter
    }

    fn is_proper_noun(token: &Token) -> bool {
        !token.sentence_start && token.text.chars().next().is_some_and(char::is_uppercase)
    }
}

impl Filter for ProperNounFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| token.is_stopped() || !Self::is_proper_noun(token))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "proper_noun"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proper_noun_filter() {
        let filter = ProperNounFilter::new();
        let tokens = vec![
            Token::new("Luke", 0).with_sentence_start(true),
            Token::new("meets", 1).with_sentence_start(false),
            Token::new("Obi", 2).with_sentence_start(false),
            Token::new("The", 3).with_sentence_start(true),
            Token::new("droids", 4).with_sentence_start(false),
        ];

        let result: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(result, vec!["Luke", "meets", "The", "droids"]);
    }
}
