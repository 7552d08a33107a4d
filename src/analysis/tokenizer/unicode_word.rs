//! Unicode word tokenizer implementation.
//!
//! Splits text using Unicode word boundary rules (UAX #29) and keeps only
//! segments that contain at least one alphanumeric character. Each token
//! records whether it opens a sentence, which the proper-noun filter relies on.
//!
//! # Examples
//!
//! ```
//! use inaworld::analysis::tokenizer::Tokenizer;
//! use inaworld::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world! Bye.").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "Hello");
//! assert!(tokens[0].sentence_start);
//! assert!(!tokens[1].sentence_start);
//! assert!(tokens[2].sentence_start);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    /// Create a new Unicode word tokenizer.
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut at_sentence_start = true;

        for (start_offset, segment) in text.split_word_bound_indices() {
            if segment.chars().any(|c| c.is_alphanumeric()) {
                let position = tokens.len();
                tokens.push(
                    Token::with_offsets(segment, position, start_offset, start_offset + segment.len())
                        .with_sentence_start(at_sentence_start),
                );
                at_sentence_start = false;
            } else if segment.chars().any(|c| SENTENCE_TERMINATORS.contains(&c)) {
                at_sentence_start = true;
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
