use super::token::{Token, TokenKind};

/// On-demand selector tokenizer.
///
/// Produces one token per call to [`Tokenizer::next_token`], with a single
/// character of lookahead. Whitespace is skipped, but the parser can ask
/// whether whitespace precedes the next token through
/// [`Tokenizer::peek_preceded_by_space`]; that is what separates `div p`
/// (descendant) from `div.p` (one compound sequence).
///
/// The stream is not seekable. Once exhausted it returns [`TokenKind::Eof`]
/// forever.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// The input being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Set once the iterator has yielded `Eof`
    finished: bool,
}

impl Tokenizer {
    /// Create a new tokenizer over `input`.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: input.as_ref().chars().collect(),
            position: 0,
            finished: false,
        }
    }

    /// Whether the next unread character is whitespace.
    ///
    /// Queried by the parser before it pulls the next token, so it reports
    /// whether that token is preceded by whitespace.
    #[must_use]
    pub fn peek_preceded_by_space(&self) -> bool {
        self.peek().is_some_and(char::is_whitespace)
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.consume() else {
            return Token::eof();
        };

        match c {
            '"' | '\'' => self.consume_string(c),
            '+' => Token::new(TokenKind::Plus, "+"),
            ',' => Token::new(TokenKind::Comma, ","),
            '.' => Token::new(TokenKind::Dot, "."),
            '(' => Token::new(TokenKind::LeftParen, "("),
            ')' => Token::new(TokenKind::RightParen, ")"),
            '[' => Token::new(TokenKind::LeftBracket, "["),
            ']' => Token::new(TokenKind::RightBracket, "]"),
            '>' => Token::new(TokenKind::GreaterThan, ">"),
            '=' => Token::new(TokenKind::Equals, "="),
            ':' => {
                if self.consume_if(':') {
                    Token::new(TokenKind::DoubleColon, "::")
                } else {
                    Token::new(TokenKind::Colon, ":")
                }
            }
            '*' => self.operator_or('*', TokenKind::SubstringMatch, Some(TokenKind::Asterisk)),
            '~' => self.operator_or('~', TokenKind::Includes, Some(TokenKind::Tilde)),
            '|' => self.operator_or('|', TokenKind::DashMatch, Some(TokenKind::VerticalBar)),
            '^' => self.operator_or('^', TokenKind::PrefixMatch, None),
            '$' => self.operator_or('$', TokenKind::SuffixMatch, None),
            '#' | '@' => {
                if self.peek().is_some_and(char::is_alphabetic) {
                    let name = self.consume_ident();
                    let kind = if c == '#' {
                        TokenKind::Hash
                    } else {
                        TokenKind::AtKeyword
                    };
                    Token::new(kind, name)
                } else {
                    Token::new(TokenKind::Illegal, c.to_string())
                }
            }
            '-' if !self.peek().is_some_and(is_ident_char) => Token::new(TokenKind::Minus, "-"),
            c if is_ident_start(c) => {
                self.reconsume();
                let name = self.consume_ident();
                if self.consume_if('(') {
                    Token::new(TokenKind::Function, name)
                } else {
                    Token::new(TokenKind::Ident, name)
                }
            }
            c if c.is_ascii_digit() => {
                self.reconsume();
                let digits = self.consume_while(|ch| ch.is_ascii_digit());
                Token::new(TokenKind::Number, digits)
            }
            other => Token::new(TokenKind::Illegal, other.to_string()),
        }
    }

    /// A two-character `X=` operator, or the single-character fallback.
    fn operator_or(&mut self, c: char, with_equals: TokenKind, alone: Option<TokenKind>) -> Token {
        if self.consume_if('=') {
            return Token::new(with_equals, format!("{c}="));
        }
        match alone {
            Some(kind) => Token::new(kind, c.to_string()),
            None => Token::new(TokenKind::Illegal, c.to_string()),
        }
    }

    /// Consume a quoted string whose opening quote was just consumed.
    ///
    /// No escape processing; the string ends at the next matching quote. An
    /// unterminated string is reported as an illegal opening quote.
    fn consume_string(&mut self, quote: char) -> Token {
        let start = self.position;
        while let Some(ch) = self.consume() {
            if ch == quote {
                let value: String = self.input[start..self.position - 1].iter().collect();
                return Token::new(TokenKind::String, value);
            }
        }
        Token::new(TokenKind::Illegal, quote.to_string())
    }

    fn consume_ident(&mut self) -> String {
        self.consume_while(is_ident_char)
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.position += 1;
        }
        self.input[start..self.position].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn reconsume(&mut self) {
        self.position -= 1;
    }
}

/// Yields every token up to and including the first `Eof`, then stops.
impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.is_eof();
        Some(token)
    }
}

/// Letters (including non-ASCII), `_` and `-` may start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-'
}

/// Identifiers continue with letters, digits, `_` and `-`.
fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Whether `s` would tokenize as exactly one identifier.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('-') if s.len() == 1 => false,
        Some(first) if is_ident_start(first) => chars.all(is_ident_char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn lone_minus_is_not_an_identifier() {
        assert_eq!(kinds("- 2"), vec![TokenKind::Minus, TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("-n"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert!(!is_identifier("-"));
        assert!(is_identifier("-x"));
    }

    #[test]
    fn identifier_check_matches_tokenizer() {
        for s in ["foo", "foo-bar", "_x1", "a", "data-id"] {
            assert!(is_identifier(s), "{s}");
            assert_eq!(kinds(s), vec![TokenKind::Ident, TokenKind::Eof], "{s}");
        }
        for s in ["", "1a", "a b", "a.b", "é!"] {
            assert!(!is_identifier(s), "{s}");
        }
    }

    #[test]
    fn unterminated_string_is_illegal() {
        let mut tokenizer = Tokenizer::new("'abc");
        assert_eq!(tokenizer.next_token(), Token::new(TokenKind::Illegal, "'"));
    }
}
