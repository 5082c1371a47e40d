//! Precedence-climbing selector parser.
//!
//! [Selectors Level 3 § 10 Grammar](https://www.w3.org/TR/selectors-3/#w3cselgrammar)
//!
//! Compound sequences are parsed as prefixes. Combinators are infix operators:
//! `,` binds loosest, then ` `, `>`, `+` and `~`, which all share one level and
//! associate to the left. The descendant combinator has no token of its own;
//! it is synthesized when whitespace separates two sequences.

use core::str::FromStr;

use crate::ast::{
    Argument, AttributeOperator, AttributeSelector, Base, Combinator, Expression, Group, Has,
    Negatable, Negation, NegationArgument, Pseudo, PseudoFunction, PseudoKind, Selector, Sequence,
    SimpleSelector,
};
use crate::error::{LexError, ParseError, SelectorErrors};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Binding power of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Group,
    Combinator,
}

/// Selector parser over a [`Tokenizer`], with one token of lookahead.
#[derive(Debug)]
pub struct Parser {
    tokenizer: Tokenizer,
    cur: Token,
    peek: Token,
    /// Whitespace precedes `cur`.
    cur_space: bool,
    /// Whitespace precedes `peek`.
    peek_space: bool,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a parser over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        let cur_space = tokenizer.peek_preceded_by_space();
        let cur = tokenizer.next_token();
        let peek_space = tokenizer.peek_preceded_by_space();
        let peek = tokenizer.next_token();
        Self {
            tokenizer,
            cur,
            peek,
            cur_space,
            peek_space,
            errors: Vec::new(),
        }
    }

    /// Parse the whole input as one selector expression.
    ///
    /// Returns `None` once an error is recorded; the errors are then available
    /// from [`Parser::errors`]. Parsing stops at the first error.
    pub fn parse_expression(&mut self) -> Option<Expression> {
        match self.parse_selector_list() {
            Ok(expression) => {
                log::trace!(target: "sift::parser", "parsed `{expression}`");
                Some(expression)
            }
            Err(err) => {
                log::debug!(target: "sift::parser", "parse failed: {err}");
                self.errors.push(err);
                None
            }
        }
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume the parser, returning its recorded errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn parse_selector_list(&mut self) -> Result<Expression, ParseError> {
        let expression = self.parse_with_precedence(Precedence::Lowest)?;
        if !self.peek.is_eof() {
            self.advance()?;
            return Err(ParseError::UnexpectedToken {
                found: self.cur.kind,
                literal: self.cur.raw(),
            });
        }
        Ok(expression)
    }

    fn parse_with_precedence(&mut self, precedence: Precedence) -> Result<Expression, ParseError> {
        let mut left = self.parse_prefix()?;
        while precedence < self.peek_precedence() {
            left = self.parse_infix(left)?;
        }
        Ok(left)
    }

    fn peek_precedence(&self) -> Precedence {
        match self.peek.kind {
            TokenKind::Comma => Precedence::Group,
            TokenKind::GreaterThan | TokenKind::Plus | TokenKind::Tilde => Precedence::Combinator,
            kind if self.peek_space && starts_sequence(kind) => Precedence::Combinator,
            _ => Precedence::Lowest,
        }
    }

    /// Called with `peek` on an infix operator (or, for the descendant
    /// combinator, on the first token of the right-hand sequence).
    fn parse_infix(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let combinator = match self.peek.kind {
            TokenKind::Comma => return self.parse_group(left),
            TokenKind::GreaterThan => Some(Combinator::Child),
            TokenKind::Plus => Some(Combinator::NextSibling),
            TokenKind::Tilde => Some(Combinator::SubsequentSibling),
            _ => None,
        };
        if combinator.is_some() {
            self.advance()?;
        }
        self.advance()?;

        let right = self.parse_with_precedence(Precedence::Combinator)?;
        Ok(Expression::Selector(Selector {
            left: Box::new(left),
            combinator: combinator.unwrap_or(Combinator::Descendant),
            right: Box::new(right),
        }))
    }

    fn parse_group(&mut self, left: Expression) -> Result<Expression, ParseError> {
        self.advance()?;
        self.advance()?;
        let right = self.parse_with_precedence(Precedence::Group)?;

        let mut selectors = match left {
            Expression::Group(group) => group.selectors,
            other => vec![other],
        };
        match right {
            Expression::Group(group) => selectors.extend(group.selectors),
            other => selectors.push(other),
        }
        Ok(Expression::Group(Group { selectors }))
    }

    /// Parse one compound sequence starting at `cur`.
    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        let base = match self.cur.kind {
            TokenKind::Ident => Some(Base::Type(self.cur.literal.clone())),
            TokenKind::Asterisk => Some(Base::Universal),
            kind if starts_filter(kind) => None,
            TokenKind::Illegal => return Err(self.lex_error()),
            kind => {
                return Err(ParseError::NoPrefix {
                    found: kind,
                    literal: self.cur.raw(),
                });
            }
        };

        let mut filters = Vec::new();
        if base.is_none() {
            filters.push(self.parse_filter()?);
        }
        while !self.peek_space && starts_filter(self.peek.kind) {
            self.advance()?;
            filters.push(self.parse_filter()?);
        }

        Ok(Expression::Sequence(Sequence { base, filters }))
    }

    /// Parse the simple selector starting at `cur`, leaving `cur` on its last token.
    fn parse_filter(&mut self) -> Result<SimpleSelector, ParseError> {
        match self.cur.kind {
            TokenKind::Hash => Ok(SimpleSelector::Hash(self.cur.literal.clone())),
            TokenKind::Dot => {
                self.expect_adjacent(TokenKind::Ident, "identifier after '.'")?;
                Ok(SimpleSelector::Class(self.cur.literal.clone()))
            }
            TokenKind::LeftBracket => self.parse_attribute().map(SimpleSelector::Attribute),
            TokenKind::Colon => self.parse_pseudo_class(),
            TokenKind::DoubleColon => {
                self.expect_adjacent(TokenKind::Ident, "identifier after '::'")?;
                Ok(SimpleSelector::Pseudo(Pseudo {
                    ident: self.cur.literal.clone(),
                    kind: PseudoKind::Element,
                }))
            }
            kind => Err(ParseError::Expected {
                expected: "simple selector".to_owned(),
                found: kind,
            }),
        }
    }

    /// `[` IDENT ( op ( IDENT | STRING ) )? `]`
    fn parse_attribute(&mut self) -> Result<AttributeSelector, ParseError> {
        self.expect_peek(TokenKind::Ident, "attribute name")?;
        let name = self.cur.literal.clone();

        let operator = match self.peek.kind {
            TokenKind::RightBracket => {
                self.advance()?;
                return Ok(AttributeSelector {
                    name,
                    operator: AttributeOperator::Exists,
                    value: None,
                });
            }
            TokenKind::Equals => AttributeOperator::Equals,
            TokenKind::Includes => AttributeOperator::Includes,
            TokenKind::DashMatch => AttributeOperator::DashMatch,
            TokenKind::PrefixMatch => AttributeOperator::PrefixMatch,
            TokenKind::SuffixMatch => AttributeOperator::SuffixMatch,
            TokenKind::SubstringMatch => AttributeOperator::SubstringMatch,
            _ => return Err(self.expected_peek("']' or attribute operator")),
        };
        self.advance()?;

        if !matches!(self.peek.kind, TokenKind::Ident | TokenKind::String) {
            return Err(self.expected_peek("attribute value"));
        }
        self.advance()?;
        let value = self.cur.literal.clone();

        self.expect_peek(TokenKind::RightBracket, "']'")?;
        Ok(AttributeSelector {
            name,
            operator,
            value: Some(value),
        })
    }

    /// `:` IDENT, or `:` FUNCTION argument `)`.
    fn parse_pseudo_class(&mut self) -> Result<SimpleSelector, ParseError> {
        if self.peek_space || !matches!(self.peek.kind, TokenKind::Ident | TokenKind::Function) {
            return Err(self.expected_peek("pseudo-class name after ':'"));
        }
        self.advance()?;
        let name = self.cur.literal.clone();

        if self.cur.is(TokenKind::Ident) {
            return Ok(SimpleSelector::Pseudo(Pseudo {
                ident: name,
                kind: PseudoKind::Class,
            }));
        }

        if name.eq_ignore_ascii_case("not") {
            self.parse_negation().map(SimpleSelector::Negation)
        } else if name.eq_ignore_ascii_case("has") {
            self.parse_has().map(SimpleSelector::Has)
        } else {
            let argument = self.parse_function_argument(&name)?;
            Ok(SimpleSelector::PseudoFunction(PseudoFunction { name, argument }))
        }
    }

    /// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
    ///
    /// Called with `cur` on the `not(` function token.
    fn parse_negation(&mut self) -> Result<Negation, ParseError> {
        self.advance()?;
        let mut items = vec![self.parse_negatable()?];
        while self.peek.is(TokenKind::Comma) {
            self.advance()?;
            self.advance()?;
            items.push(self.parse_negatable()?);
        }
        self.expect_peek(TokenKind::RightParen, "')' to close :not()")?;

        let argument = if items.len() == 1 {
            NegationArgument::Single(items.remove(0))
        } else {
            NegationArgument::Group(items)
        };
        Ok(Negation { argument })
    }

    fn parse_negatable(&mut self) -> Result<Negatable, ParseError> {
        let item = match self.cur.kind {
            TokenKind::Ident => Negatable::Type(self.cur.literal.clone()),
            TokenKind::Asterisk => Negatable::Universal,
            kind if starts_filter(kind) => match self.parse_filter()? {
                SimpleSelector::Negation(_) => {
                    return Err(ParseError::InvalidNegation {
                        found: "a nested :not()".to_owned(),
                    });
                }
                SimpleSelector::Has(_) => {
                    return Err(ParseError::InvalidNegation {
                        found: ":has()".to_owned(),
                    });
                }
                simple => Negatable::Simple(Box::new(simple)),
            },
            TokenKind::Illegal => return Err(self.lex_error()),
            kind => {
                return Err(ParseError::Expected {
                    expected: "simple selector inside :not()".to_owned(),
                    found: kind,
                });
            }
        };

        if !self.peek_space && starts_filter(self.peek.kind) {
            return Err(ParseError::InvalidNegation {
                found: "a compound selector".to_owned(),
            });
        }
        Ok(item)
    }

    /// `:has(` combinator? selector `)`
    fn parse_has(&mut self) -> Result<Has, ParseError> {
        self.advance()?;
        let combinator = match self.cur.kind {
            TokenKind::GreaterThan => Some(Combinator::Child),
            TokenKind::Plus => Some(Combinator::NextSibling),
            TokenKind::Tilde => Some(Combinator::SubsequentSibling),
            _ => None,
        };
        if combinator.is_some() {
            self.advance()?;
        }
        let argument = self.parse_with_precedence(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParen, "')' to close :has()")?;
        Ok(Has {
            combinator,
            argument: Box::new(argument),
        })
    }

    /// Collect the raw text up to the closing parenthesis and classify it.
    fn parse_function_argument(&mut self, name: &str) -> Result<Argument, ParseError> {
        let mut raw = String::new();
        let mut tokens = Vec::new();
        loop {
            self.advance()?;
            match self.cur.kind {
                TokenKind::RightParen => break,
                TokenKind::Eof => {
                    return Err(ParseError::Expected {
                        expected: format!("')' to close :{name}()"),
                        found: TokenKind::Eof,
                    });
                }
                TokenKind::LeftParen | TokenKind::Function => {
                    raw.push_str(&self.cur.raw());
                    return Err(malformed(name, &raw));
                }
                _ => {
                    if self.cur_space && !tokens.is_empty() {
                        raw.push(' ');
                    }
                    raw.push_str(&self.cur.raw());
                    tokens.push(self.cur.clone());
                }
            }
        }

        match tokens.as_slice() {
            [token] if token.is(TokenKind::String) => Ok(Argument::String(token.literal.clone())),
            _ if tokens.iter().any(|t| t.is(TokenKind::String)) => Err(malformed(name, &raw)),
            _ => Argument::classify(&raw).ok_or_else(|| malformed(name, &raw)),
        }
    }

    /// Shift the lookahead window by one token.
    ///
    /// Fails when the new current token is illegal.
    fn advance(&mut self) -> Result<(), ParseError> {
        let next_space = self.tokenizer.peek_preceded_by_space();
        let next = self.tokenizer.next_token();
        self.cur = core::mem::replace(&mut self.peek, next);
        self.cur_space = core::mem::replace(&mut self.peek_space, next_space);

        if self.cur.is(TokenKind::Illegal) {
            return Err(self.lex_error());
        }
        Ok(())
    }

    /// Advance onto `peek` if it has the given kind.
    fn expect_peek(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.peek.is(kind) {
            self.advance()
        } else {
            Err(self.expected_peek(expected))
        }
    }

    /// Like [`Parser::expect_peek`], but whitespace may not come first.
    fn expect_adjacent(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.peek_space {
            return Err(ParseError::Expected {
                expected: expected.to_owned(),
                found: TokenKind::Whitespace,
            });
        }
        self.expect_peek(kind, expected)
    }

    fn expected_peek(&self, expected: &str) -> ParseError {
        if self.peek.is(TokenKind::Illegal) {
            return ParseError::Lex(LexError {
                literal: self.peek.literal.clone(),
            });
        }
        ParseError::Expected {
            expected: expected.to_owned(),
            found: self.peek.kind,
        }
    }

    fn lex_error(&self) -> ParseError {
        ParseError::Lex(LexError {
            literal: self.cur.literal.clone(),
        })
    }
}

/// Tokens that may open a compound sequence.
const fn starts_sequence(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Ident | TokenKind::Asterisk) || starts_filter(kind)
}

/// Tokens that may open a simple selector after the base.
const fn starts_filter(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Hash
            | TokenKind::Dot
            | TokenKind::LeftBracket
            | TokenKind::Colon
            | TokenKind::DoubleColon
    )
}

fn malformed(name: &str, raw: &str) -> ParseError {
    ParseError::MalformedArgument {
        name: name.to_owned(),
        argument: raw.to_owned(),
    }
}

impl FromStr for Expression {
    type Err = SelectorErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        match parser.parse_expression() {
            Some(expression) => Ok(expression),
            None => Err(SelectorErrors(parser.into_errors())),
        }
    }
}
