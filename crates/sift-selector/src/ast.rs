//! The selector expression tree.
//!
//! [Selectors Level 3 § 10 Grammar](https://www.w3.org/TR/selectors-3/#w3cselgrammar)
//!
//! Every node renders a canonical string form through `Display`. Parsing that
//! string again yields a structurally equal tree.

use core::fmt;

use serde::Serialize;

use crate::tokenizer::is_identifier;

/// Root of a parsed selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    /// Comma-separated alternatives.
    Group(Group),
    /// Two expressions joined by a combinator.
    Selector(Selector),
    /// A compound sequence of simple selectors.
    Sequence(Sequence),
}

/// [§ 5 Groups of selectors](https://www.w3.org/TR/selectors-3/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the list."
///
/// Always flat: no alternative is itself a `Group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// The alternatives, in source order.
    pub selectors: Vec<Expression>,
}

/// [§ 8 Combinators](https://www.w3.org/TR/selectors-3/#combinators)
///
/// Combinators are left-associative, so `a > b c` is `(a > b) c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// The expression whose matches the combinator starts from.
    pub left: Box<Expression>,
    /// The tree relation to follow.
    pub combinator: Combinator,
    /// The expression applied to the related elements.
    pub right: Box<Expression>,
}

/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Combinator {
    /// [§ 8.1 Descendant combinator](https://www.w3.org/TR/selectors-3/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two sequences of
    /// simple selectors."
    Descendant,

    /// [§ 8.2 Child combinators](https://www.w3.org/TR/selectors-3/#child-combinators)
    /// "A child combinator describes a childhood relationship between two elements."
    Child,

    /// [§ 8.3.1 Next-sibling combinator](https://www.w3.org/TR/selectors-3/#adjacent-sibling-combinators)
    /// "The elements represented by the two sequences share the same parent in
    /// the document tree and the element represented by the first sequence
    /// immediately precedes the element represented by the second one."
    NextSibling,

    /// [§ 8.3.2 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-3/#general-sibling-combinators)
    /// "The elements represented by the two sequences share the same parent in
    /// the document tree and the element represented by the first sequence
    /// precedes (not necessarily immediately) the element represented by the
    /// second one."
    SubsequentSibling,
}

impl Combinator {
    /// The source symbol; a single space for the descendant combinator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::SubsequentSibling => "~",
        }
    }
}

/// [§ 4 Selector syntax](https://www.w3.org/TR/selectors-3/#selector-syntax)
///
/// "A sequence of simple selectors is a chain of simple selectors that are not
/// separated by a combinator. It always begins with a type selector or a
/// universal selector."
///
/// The base is optional in source (`.foo` means `*.foo`). A sequence always
/// has a base or at least one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    /// Leading type or universal selector.
    pub base: Option<Base>,
    /// The remaining simple selectors, applied in order.
    pub filters: Vec<SimpleSelector>,
}

/// The head of a [`Sequence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Base {
    /// [§ 6.1 Type selector](https://www.w3.org/TR/selectors-3/#type-selectors)
    ///
    /// Examples: `div`, `p`, `h1`
    Type(String),
    /// [§ 6.2 Universal selector](https://www.w3.org/TR/selectors-3/#universal-selector)
    ///
    /// Example: `*`
    Universal,
}

/// One predicate in a [`Sequence`] after its base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SimpleSelector {
    /// [§ 6.4 Class selectors](https://www.w3.org/TR/selectors-3/#class-html)
    ///
    /// Example: `.warning`
    Class(String),
    /// [§ 6.5 ID selectors](https://www.w3.org/TR/selectors-3/#id-selectors)
    ///
    /// Example: `#chapter1`
    Hash(String),
    /// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[lang|=en]`
    Attribute(AttributeSelector),
    /// Non-functional pseudo-class or pseudo-element, e.g. `:first-child`, `::before`.
    Pseudo(Pseudo),
    /// Functional pseudo-class other than `:not()` and `:has()`, e.g. `:nth-child(2n+1)`.
    PseudoFunction(PseudoFunction),
    /// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
    Negation(Negation),
    /// Relational pseudo-class `:has()`. Parsed, never matched.
    Has(Has),
}

/// An attribute selector `[name op value]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSelector {
    /// Attribute name.
    pub name: String,
    /// How the value is compared.
    pub operator: AttributeOperator,
    /// Queried value; `None` exactly when `operator` is `Exists`.
    pub value: Option<String>,
}

/// [§ 6.3.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-3/#attribute-representation)
/// [§ 6.3.2 Substring matching attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-substrings)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeOperator {
    /// `[att]`: "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Exists,
    /// `[att=val]`: "Represents an element with the att attribute whose value
    /// is exactly 'val'."
    Equals,
    /// `[att~=val]`: "a whitespace-separated list of words, one of which is
    /// exactly 'val'."
    Includes,
    /// `[att|=val]`: "either being exactly 'val' or beginning with 'val'
    /// immediately followed by '-'."
    DashMatch,
    /// `[att^=val]`: "whose value begins with the prefix 'val'."
    PrefixMatch,
    /// `[att$=val]`: "whose value ends with the suffix 'val'."
    SuffixMatch,
    /// `[att*=val]`: "whose value contains at least one instance of the
    /// substring 'val'."
    SubstringMatch,
}

impl AttributeOperator {
    /// The operator as written; empty for `Exists`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
        }
    }
}

/// Whether a [`Pseudo`] was written with one colon or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PseudoKind {
    /// `:name`
    Class,
    /// `::name`
    Element,
}

/// A non-functional pseudo-class or pseudo-element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pseudo {
    /// The name after the colon(s).
    pub ident: String,
    /// One colon or two.
    pub kind: PseudoKind,
}

/// A functional pseudo-class such as `:nth-child(2n+1)` or `:lang(fr)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PseudoFunction {
    /// Function name without the parenthesis.
    pub name: String,
    /// The classified argument.
    pub argument: Argument,
}

/// The argument of a functional pseudo-class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Argument {
    /// The `An+B` micro-syntax.
    Dimension(Dimension),
    /// A bare signed integer; equivalent to `0n+value`.
    Integer(i64),
    /// `odd` or `even`.
    Keyword(NthKeyword),
    /// A quoted string.
    String(String),
    /// Any other identifier, e.g. the language range of `:lang(fr-be)`.
    Ident(String),
}

impl Argument {
    /// Classify the raw text of a functional pseudo-class argument.
    ///
    /// Tried in order: signed integer, `odd`/`even`, `An+B`, identifier.
    /// Whitespace around signs is ignored, but whitespace inside a term
    /// (`1 2`, `2 n`) makes the argument malformed. Quoted strings are
    /// classified by the parser.
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        if splits_a_term(raw) {
            return None;
        }
        let text: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if text.is_empty() {
            return None;
        }
        if let Some(value) = parse_signed_integer(&text) {
            return Some(Self::Integer(value));
        }
        if text.eq_ignore_ascii_case("odd") {
            return Some(Self::Keyword(NthKeyword::Odd));
        }
        if text.eq_ignore_ascii_case("even") {
            return Some(Self::Keyword(NthKeyword::Even));
        }
        if let Some(dimension) = Dimension::parse(&text) {
            return Some(Self::Dimension(dimension));
        }
        let ident = raw.trim();
        is_identifier(ident).then(|| Self::Ident(ident.to_owned()))
    }

    /// The `(a, b)` pair of an `An+B`-style argument, if it is one.
    #[must_use]
    pub fn formula(&self) -> Option<(i64, i64)> {
        match self {
            Self::Dimension(d) => Some((d.step(), d.offset())),
            Self::Integer(value) => Some((0, *value)),
            Self::Keyword(keyword) => {
                let d = keyword.as_dimension();
                Some((d.step(), d.offset()))
            }
            Self::String(_) | Self::Ident(_) => None,
        }
    }
}

/// Whether whitespace separates two alphanumeric characters in `raw`.
fn splits_a_term(raw: &str) -> bool {
    let mut previous: Option<char> = None;
    let mut gap = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            gap = true;
            continue;
        }
        if gap && c.is_alphanumeric() && previous.is_some_and(char::is_alphanumeric) {
            return true;
        }
        previous = Some(c);
        gap = false;
    }
    false
}

/// Sign of one half of an `An+B` formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Sign {
    /// `+`, also the default when no sign is written.
    #[default]
    Plus,
    /// `-`
    Minus,
}

impl Sign {
    fn apply(self, magnitude: u32) -> i64 {
        match self {
            Self::Plus => i64::from(magnitude),
            Self::Minus => -i64::from(magnitude),
        }
    }
}

/// [§ 6.6.5.2 :nth-child() pseudo-class](https://www.w3.org/TR/selectors-3/#nth-child-pseudo)
///
/// "The :nth-child(an+b) pseudo-class notation represents an element that has
/// an+b-1 siblings before it in the document tree, for any positive integer or
/// zero value of n."
///
/// Magnitudes and signs are stored apart, as written. A zero magnitude always
/// carries `Sign::Plus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimension {
    /// Magnitude of the coefficient of `n`.
    pub a: u32,
    /// Sign of the coefficient.
    pub a_sign: Sign,
    /// Magnitude of the offset.
    pub b: u32,
    /// Sign of the offset.
    pub b_sign: Sign,
}

impl Dimension {
    /// Build a formula from magnitudes and signs, normalizing signed zeros.
    #[must_use]
    pub const fn new(a_sign: Sign, a: u32, b_sign: Sign, b: u32) -> Self {
        Self {
            a,
            a_sign: if a == 0 { Sign::Plus } else { a_sign },
            b,
            b_sign: if b == 0 { Sign::Plus } else { b_sign },
        }
    }

    /// Parse `[sign][digits]n[sign][digits]` (whitespace already removed).
    ///
    /// Omitted coefficient digits mean 1; omitted offset digits mean 0.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (a_sign, rest) = split_sign(text);
        let n_at = rest.find(['n', 'N'])?;
        let (a_digits, tail) = (&rest[..n_at], &rest[n_at + 1..]);

        let a = if a_digits.is_empty() {
            1
        } else {
            parse_digits(a_digits)?
        };

        let (b_sign, b_digits) = split_sign(tail);
        let b = if b_digits.is_empty() {
            0
        } else {
            parse_digits(b_digits)?
        };

        Some(Self::new(a_sign, a, b_sign, b))
    }

    /// Signed coefficient `a`.
    #[must_use]
    pub fn step(&self) -> i64 {
        self.a_sign.apply(self.a)
    }

    /// Signed offset `b`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.b_sign.apply(self.b)
    }
}

/// The `odd` and `even` shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NthKeyword {
    /// `2n+1`
    Odd,
    /// `2n`
    Even,
}

impl NthKeyword {
    /// The formula this keyword stands for.
    #[must_use]
    pub const fn as_dimension(self) -> Dimension {
        match self {
            Self::Odd => Dimension::new(Sign::Plus, 2, Sign::Plus, 1),
            Self::Even => Dimension::new(Sign::Plus, 2, Sign::Plus, 0),
        }
    }
}

/// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
///
/// "The negation pseudo-class, :not(X), is a functional notation taking a
/// simple selector (excluding the negation pseudo-class itself) as an
/// argument. It represents an element that is not represented by its argument."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Negation {
    /// What must not match.
    pub argument: NegationArgument,
}

/// The argument of `:not()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NegationArgument {
    /// `:not(x)`
    Single(Negatable),
    /// `:not(a, b, ...)`: an element survives only if it matches none of them.
    Group(Vec<Negatable>),
}

/// A simple selector allowed inside `:not()`.
///
/// The parser never puts a `Negation` or `Has` inside `Simple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Negatable {
    /// `:not(p)`
    Type(String),
    /// `:not(*)`
    Universal,
    /// `:not(.a)`, `:not([x])`, `:not(:first-child)`, ...
    Simple(Box<SimpleSelector>),
}

/// `:has(> img)`: a relative selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Has {
    /// Leading combinator, if one was written.
    pub combinator: Option<Combinator>,
    /// The selector to look for relative to the subject.
    pub argument: Box<Expression>,
}

fn split_sign(text: &str) -> (Sign, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (Sign::Minus, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (Sign::Plus, rest)
    } else {
        (Sign::Plus, text)
    }
}

fn parse_digits(digits: &str) -> Option<u32> {
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn parse_signed_integer(text: &str) -> Option<i64> {
    let (sign, digits) = split_sign(text);
    if digits.is_empty() {
        return None;
    }
    parse_digits(digits).map(|magnitude| sign.apply(magnitude))
}

/// Write a string value bare when it re-tokenizes as one identifier, quoted otherwise.
fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if is_identifier(value) {
        f.write_str(value)
    } else {
        write_quoted(f, value)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if value.contains('"') {
        write!(f, "'{value}'")
    } else {
        write!(f, "\"{value}\"")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => group.fmt(f),
            Self::Selector(selector) => selector.fmt(f),
            Self::Sequence(sequence) => sequence.fmt(f),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.combinator {
            Combinator::Descendant => write!(f, "{} {}", self.left, self.right),
            other => write!(f, "{} {} {}", self.left, other, self.right),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base) = &self.base {
            write!(f, "{base}")?;
        }
        for filter in &self.filters {
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, ".{name}"),
            Self::Hash(name) => write!(f, "#{name}"),
            Self::Attribute(attr) => attr.fmt(f),
            Self::Pseudo(pseudo) => pseudo.fmt(f),
            Self::PseudoFunction(function) => function.fmt(f),
            Self::Negation(negation) => negation.fmt(f),
            Self::Has(has) => has.fmt(f),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{}", self.name, self.operator.symbol())?;
        if let Some(value) = &self.value {
            write_value(f, value)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PseudoKind::Class => write!(f, ":{}", self.ident),
            PseudoKind::Element => write!(f, "::{}", self.ident),
        }
    }
}

impl fmt::Display for PseudoFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}({})", self.name, self.argument)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension(d) => d.fmt(f),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Keyword(NthKeyword::Odd) => f.write_str("odd"),
            Self::Keyword(NthKeyword::Even) => f.write_str("even"),
            Self::String(value) => write_quoted(f, value),
            Self::Ident(value) => f.write_str(value),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a_sign == Sign::Minus {
            f.write_str("-")?;
        }
        if self.a != 1 {
            write!(f, "{}", self.a)?;
        }
        f.write_str("n")?;
        match (self.b, self.b_sign) {
            (0, _) => Ok(()),
            (b, Sign::Plus) => write!(f, "+{b}"),
            (b, Sign::Minus) => write!(f, "-{b}"),
        }
    }
}

impl fmt::Display for Negation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":not(")?;
        match &self.argument {
            NegationArgument::Single(item) => write!(f, "{item}")?,
            NegationArgument::Group(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for Negatable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Simple(simple) => simple.fmt(f),
        }
    }
}

impl fmt::Display for Has {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.combinator {
            None | Some(Combinator::Descendant) => write!(f, ":has({})", self.argument),
            Some(combinator) => write!(f, ":has({combinator} {})", self.argument),
        }
    }
}
