//! Selector tokenizer module.

/// Selector token types.
pub mod token;
/// Selector tokenizer implementation.
pub mod tokenizer;

pub use token::{Token, TokenKind};
pub use tokenizer::{Tokenizer, is_identifier};
