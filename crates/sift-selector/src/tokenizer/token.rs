//! Selector token types.
//!
//! The selector grammar needs a much smaller token set than full CSS syntax:
//! identifiers, strings, digit runs, the delimiters that introduce simple
//! selectors, the combinators, and the attribute match operators.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;

/// The kind of a [`Token`].
///
/// `Display` renders the spelling used in parse error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum TokenKind {
    /// An identifier: letters, digits, `_` and `-`, not starting with a digit.
    #[strum(serialize = "identifier")]
    Ident,
    /// A single- or double-quoted string; the literal excludes the quotes.
    #[strum(serialize = "string")]
    String,
    /// A run of ASCII digits.
    #[strum(serialize = "number")]
    Number,
    /// `.`
    #[strum(serialize = "'.'")]
    Dot,
    /// `#name`; the literal is the name without `#`.
    #[strum(serialize = "hash")]
    Hash,
    /// `:`
    #[strum(serialize = "':'")]
    Colon,
    /// `::`
    #[strum(serialize = "'::'")]
    DoubleColon,
    /// `*`
    #[strum(serialize = "'*'")]
    Asterisk,
    /// `,`
    #[strum(serialize = "','")]
    Comma,
    /// `(`
    #[strum(serialize = "'('")]
    LeftParen,
    /// `)`
    #[strum(serialize = "')'")]
    RightParen,
    /// `[`
    #[strum(serialize = "'['")]
    LeftBracket,
    /// `]`
    #[strum(serialize = "']'")]
    RightBracket,
    /// `|`
    #[strum(serialize = "'|'")]
    VerticalBar,
    /// `+`
    #[strum(serialize = "'+'")]
    Plus,
    /// A lone `-` that does not start an identifier.
    #[strum(serialize = "'-'")]
    Minus,
    /// `>`
    #[strum(serialize = "'>'")]
    GreaterThan,
    /// `=`
    #[strum(serialize = "'='")]
    Equals,
    /// `~`
    #[strum(serialize = "'~'")]
    Tilde,
    /// The descendant combinator.
    ///
    /// Never produced by the tokenizer; the parser synthesizes it when
    /// whitespace separates two compound sequences.
    #[strum(serialize = "whitespace")]
    Whitespace,
    /// `~=`
    #[strum(serialize = "'~='")]
    Includes,
    /// `|=`
    #[strum(serialize = "'|='")]
    DashMatch,
    /// `^=`
    #[strum(serialize = "'^='")]
    PrefixMatch,
    /// `$=`
    #[strum(serialize = "'$='")]
    SuffixMatch,
    /// `*=`
    #[strum(serialize = "'*='")]
    SubstringMatch,
    /// `@name`; the literal is the name without `@`.
    #[strum(serialize = "at-keyword")]
    AtKeyword,
    /// `name(`; the literal is the name, the parenthesis is consumed.
    #[strum(serialize = "function")]
    Function,
    /// End of input. Repeats forever once reached.
    #[strum(serialize = "end of input")]
    Eof,
    /// A character that cannot start any token; the literal is that character.
    #[strum(serialize = "illegal character")]
    Illegal,
}

/// A lexical token: its kind plus the literal text it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What sort of token this is.
    pub kind: TokenKind,
    /// The token's text, without sigils or quotes.
    pub literal: String,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    /// The end-of-input token.
    #[must_use]
    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    /// Whether this token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this is the end-of-input token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// The token as it would be spelled in source, with sigils restored.
    ///
    /// Functional pseudo-class arguments are collected as the concatenation of
    /// their tokens' raw spellings.
    #[must_use]
    pub fn raw(&self) -> String {
        match self.kind {
            TokenKind::Hash => format!("#{}", self.literal),
            TokenKind::AtKeyword => format!("@{}", self.literal),
            TokenKind::Function => format!("{}(", self.literal),
            TokenKind::String => format!("\"{}\"", self.literal),
            _ => self.literal.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "{}", self.kind),
            _ => write!(f, "{} `{}`", self.kind, self.raw()),
        }
    }
}
