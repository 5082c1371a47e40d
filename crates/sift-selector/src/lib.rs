//! CSS selector engine.
//!
//! Compiles selector text such as `div.note > p:nth-child(2n+1)` into an
//! [`Expression`] tree and evaluates that tree against a [`DomTree`],
//! returning the matching elements in document order, each at most once.
//!
//! # Pipeline
//!
//! ```text
//! selector text → Tokenizer → Parser → Expression → Evaluator → Vec<NodeId>
//! ```
//!
//! - [`tokenizer`]: lazy token stream with whitespace lookahead
//! - [`parser`]: precedence-climbing parser producing an [`Expression`]
//! - [`eval`]: set-based evaluator over an arena [`DomTree`]
//!
//! # Example
//!
//! ```
//! use sift_dom::{DomTree, ElementData, NodeId};
//!
//! let mut tree = DomTree::new();
//! let body = tree.append_element(NodeId::ROOT, ElementData::new("body"));
//! let first = tree.append_element(body, ElementData::new("p").with_attribute("class", "lead"));
//! let _second = tree.append_element(body, ElementData::new("p"));
//!
//! let matches = sift_selector::select(&tree, NodeId::ROOT, "body > p.lead").unwrap();
//! assert_eq!(matches, vec![first]);
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod tokenizer;

pub use ast::{Combinator, Expression};
pub use error::{LexError, ParseError, SelectorErrors};
pub use eval::{Evaluator, evaluate};
pub use parser::Parser;

use sift_dom::{DomTree, NodeId};

/// Parse selector text.
///
/// Returns the expression, or `None` with a non-empty error list. Parsing
/// stops at the first error, so the list holds at most one entry today.
#[must_use]
pub fn parse(text: &str) -> (Option<Expression>, Vec<ParseError>) {
    let mut parser = Parser::new(text);
    let expression = parser.parse_expression();
    (expression, parser.into_errors())
}

/// Parse `text` and evaluate it against the element descendants of `root`.
///
/// # Errors
///
/// Returns the parse errors if `text` is not a valid selector.
pub fn select(tree: &DomTree, root: NodeId, text: &str) -> Result<Vec<NodeId>, SelectorErrors> {
    let expression: Expression = text.parse()?;
    Ok(evaluate(&expression, tree, root))
}
