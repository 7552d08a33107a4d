//! Text analysis for movie records.
//!
//! Tokenizers split raw text into tokens, filters transform or drop tokens,
//! and analyzers chain the two. Genre strings and plot summaries each have
//! their own analysis path.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
