//! Selector evaluation over a [`DomTree`].
//!
//! Evaluation works on ordered sets of [`NodeId`]s. Every call starts from the
//! element descendants of the subject root (the root itself excluded) and
//! narrows or expands that set as it walks the expression:
//!
//! - a [`Sequence`] keeps the candidates passing its base and every filter;
//! - a [`Selector`] evaluates its left side, follows the combinator to a new
//!   frontier, then evaluates its right side against that frontier;
//! - a [`Group`] evaluates each alternative against the same incoming set and
//!   unions the results in first-seen order.
//!
//! The candidate set and the type hint are passed by value down the recursion,
//! so no alternative can observe another's intermediate state.
//!
//! Evaluation never fails. Constructs it cannot act on match nothing.

mod attribute;
mod combinator;
mod nth;
mod pseudo;

use std::collections::{HashMap, HashSet};

use sift_common::warning::warn_once;
use sift_dom::{DomTree, NodeId};

use crate::ast::{
    Base, Expression, Group, Negatable, NegationArgument, PseudoKind, Sequence, SimpleSelector,
};

/// Per-call evaluation context: a read-only view of the tree rooted at one
/// subject element.
///
/// Build one per root with [`Evaluator::new`]; it can then evaluate any number
/// of expressions. It holds no mutable state.
#[derive(Debug)]
pub struct Evaluator<'t> {
    tree: &'t DomTree,
    /// Element descendants of the root, in document order.
    full_set: Vec<NodeId>,
    /// Document-order rank of every member of `full_set`.
    positions: HashMap<NodeId, usize>,
    /// The element `:root` matches.
    document_element: Option<NodeId>,
}

impl<'t> Evaluator<'t> {
    /// Snapshot the element descendants of `root` in `tree`.
    #[must_use]
    pub fn new(tree: &'t DomTree, root: NodeId) -> Self {
        let full_set = tree.descendants(root);
        let positions = full_set
            .iter()
            .enumerate()
            .map(|(rank, &id)| (id, rank))
            .collect();
        Self {
            tree,
            document_element: tree.document_element(root),
            full_set,
            positions,
        }
    }

    /// Every element under the root, in document order.
    #[must_use]
    pub fn full_set(&self) -> &[NodeId] {
        &self.full_set
    }

    /// Evaluate `expression` against the full descendant set.
    #[must_use]
    pub fn evaluate(&self, expression: &Expression) -> Vec<NodeId> {
        let matches = self.eval(expression, &self.full_set);
        log::debug!(
            target: "sift::eval",
            "`{expression}`: {} of {} elements matched",
            matches.len(),
            self.full_set.len()
        );
        matches
    }

    fn eval(&self, expression: &Expression, candidates: &[NodeId]) -> Vec<NodeId> {
        match expression {
            Expression::Group(group) => self.eval_group(group, candidates),
            Expression::Selector(selector) => {
                let left = self.eval(&selector.left, candidates);
                if left.is_empty() {
                    return left;
                }
                let frontier = self.expand(selector.combinator, &left);
                self.eval(&selector.right, &frontier)
            }
            Expression::Sequence(sequence) => self.eval_sequence(sequence, candidates),
        }
    }

    /// [§ 5 Groups of selectors](https://www.w3.org/TR/selectors-3/#grouping)
    fn eval_group(&self, group: &Group, candidates: &[NodeId]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut union = Vec::new();
        for alternative in &group.selectors {
            for id in self.eval(alternative, candidates) {
                if seen.insert(id) {
                    union.push(id);
                }
            }
        }
        union
    }

    /// Narrow `candidates` by the sequence's base, then by each filter in turn.
    fn eval_sequence(&self, sequence: &Sequence, candidates: &[NodeId]) -> Vec<NodeId> {
        let hint = match &sequence.base {
            Some(Base::Type(name)) => Some(name.as_str()),
            Some(Base::Universal) | None => None,
        };

        let mut working: Vec<NodeId> = candidates
            .iter()
            .copied()
            .filter(|&id| self.matches_base(sequence.base.as_ref(), id))
            .collect();
        for filter in &sequence.filters {
            if working.is_empty() {
                break;
            }
            working.retain(|&id| self.matches_filter(filter, id, hint));
        }

        log::trace!(
            target: "sift::eval",
            "`{sequence}`: {} -> {}",
            candidates.len(),
            working.len()
        );
        working
    }

    /// [§ 6.1 Type selector](https://www.w3.org/TR/selectors-3/#type-selectors)
    /// [§ 6.2 Universal selector](https://www.w3.org/TR/selectors-3/#universal-selector)
    fn matches_base(&self, base: Option<&Base>, id: NodeId) -> bool {
        match base {
            Some(Base::Type(name)) => self.matches_type(name, id),
            Some(Base::Universal) | None => self.tree.is_element(id),
        }
    }

    fn matches_type(&self, name: &str, id: NodeId) -> bool {
        self.tree
            .tag_name(id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    fn matches_filter(&self, filter: &SimpleSelector, id: NodeId, hint: Option<&str>) -> bool {
        let Some(element) = self.tree.as_element(id) else {
            return false;
        };
        match filter {
            // [§ 6.4 Class selectors](https://www.w3.org/TR/selectors-3/#class-html)
            SimpleSelector::Class(name) => element.classes().any(|class| class == name),

            // [§ 6.5 ID selectors](https://www.w3.org/TR/selectors-3/#id-selectors)
            SimpleSelector::Hash(name) => element
                .attributes_named("id")
                .any(|attr| attr.value == *name),

            SimpleSelector::Attribute(selector) => attribute::matches(selector, element),

            SimpleSelector::Pseudo(pseudo) => match pseudo.kind {
                PseudoKind::Class => self.matches_pseudo_class(&pseudo.ident, id, hint),
                // Pseudo-elements are not elements of the tree.
                PseudoKind::Element => false,
            },

            SimpleSelector::PseudoFunction(function) => {
                self.matches_pseudo_function(&function.name, &function.argument, id, hint)
            }

            // [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
            SimpleSelector::Negation(negation) => match &negation.argument {
                NegationArgument::Single(item) => !self.matches_negatable(item, id, hint),
                NegationArgument::Group(items) => items
                    .iter()
                    .all(|item| !self.matches_negatable(item, id, hint)),
            },

            SimpleSelector::Has(_) => {
                warn_once("eval", ":has() is not evaluated and matches nothing");
                false
            }
        }
    }

    fn matches_negatable(&self, item: &Negatable, id: NodeId, hint: Option<&str>) -> bool {
        match item {
            Negatable::Type(name) => self.matches_type(name, id),
            Negatable::Universal => self.tree.is_element(id),
            Negatable::Simple(simple) => self.matches_filter(simple, id, hint),
        }
    }

    /// Sort into document order and drop repeats.
    fn sort_document_order(&self, ids: &mut Vec<NodeId>) {
        ids.sort_by_key(|id| self.positions.get(id).copied().unwrap_or(usize::MAX));
        ids.dedup();
    }
}

/// Evaluate `expression` against the element descendants of `root`.
///
/// The result is in document order within each group alternative, and
/// alternatives contribute in source order. No element appears twice.
#[must_use]
pub fn evaluate(expression: &Expression, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
    Evaluator::new(tree, root).evaluate(expression)
}
