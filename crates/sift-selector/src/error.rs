//! Errors produced while turning selector text into an [`Expression`](crate::Expression).
//!
//! Evaluation has no error channel; everything here comes from the tokenizer
//! or the parser, and parsing stops at the first one.

use core::fmt;

use crate::tokenizer::TokenKind;

/// The tokenizer met a character that cannot start any token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal character `{literal}`")]
pub struct LexError {
    /// The offending character.
    pub literal: String,
}

/// A selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// An illegal character was reached.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// No selector can start with this token.
    #[error("no prefix parse function for {found} `{literal}`")]
    NoPrefix {
        /// Kind of the token that could not start an expression.
        found: TokenKind,
        /// Its literal text.
        literal: String,
    },

    /// A specific token was required but something else came next.
    #[error("expected next token to be {expected}, got {found} instead")]
    Expected {
        /// Human-readable description of what was required.
        expected: String,
        /// Kind of the token actually found.
        found: TokenKind,
    },

    /// Input continued after a complete selector.
    #[error("unexpected {found} `{literal}` after selector")]
    UnexpectedToken {
        /// Kind of the leftover token.
        found: TokenKind,
        /// Its literal text.
        literal: String,
    },

    /// The parenthesized argument of a functional pseudo-class did not fit
    /// any argument form.
    #[error("malformed argument `{argument}` to :{name}()")]
    MalformedArgument {
        /// Name of the pseudo-class.
        name: String,
        /// The argument text as collected.
        argument: String,
    },

    /// `:not()` was given something other than simple selectors.
    #[error(":not() cannot contain {found}")]
    InvalidNegation {
        /// Description of the rejected argument.
        found: String,
    },
}

/// Every error reported while parsing one selector.
///
/// Returned by the `Result`-based entry points ([`select`](crate::select) and
/// `Expression::from_str`); never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorErrors(pub Vec<ParseError>);

impl SelectorErrors {
    /// The individual errors, first one first.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }
}

impl fmt::Display for SelectorErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SelectorErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.first().map(|e| e as &(dyn std::error::Error + 'static))
    }
}
