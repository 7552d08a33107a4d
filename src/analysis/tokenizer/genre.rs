//! Genre list tokenizer.
//!
//! Raw genre fields look like `["Action", "Space western"]`. Parsing strips
//! the bracket and double-quote characters, splits on commas, trims and
//! lowercases every item:
//!
//! ```
//! use inaworld::analysis::tokenizer::genre::parse_genres;
//!
//! assert_eq!(parse_genres(r#"["Action", "Space western"]"#), vec!["action", "space western"]);
//! assert_eq!(parse_genres("[]"), vec![""]);
//! ```
//!
//! Input with no bracket content yields a single empty item. Empty items are
//! never treated as labels by the label vectorizer.

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

const STRIPPED_CHARS: [char; 3] = ['[', ']', '"'];

/// Parse a raw genre field into an ordered list of normalized genre phrases.
pub fn parse_genres(raw: &str) -> Vec<String> {
    let cleaned: String = raw.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    cleaned
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .collect()
}

/// Tokenizer that emits one token per genre phrase of a raw genre field.
#[derive(Clone, Debug, Default)]
pub struct GenreTokenizer;

impl GenreTokenizer {
    /// Create a new genre tokenizer.
    pub fn new() -> Self {
        GenreTokenizer
    }
}

impl Tokenizer for GenreTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = parse_genres(text)
            .into_iter()
            .enumerate()
            .map(|(position, genre)| Token::new(genre, position))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "genre"
    }
}
