//! [§ 8 Combinators](https://www.w3.org/TR/selectors-3/#combinators)
//!
//! Expanding a candidate set into the set of elements standing in a given
//! relation to it. Text and comment nodes never appear in a frontier.

use std::collections::HashSet;

use sift_dom::NodeId;

use super::Evaluator;
use crate::ast::Combinator;

impl Evaluator<'_> {
    /// The frontier reached from `left` through `combinator`, in document
    /// order and without duplicates.
    pub(super) fn expand(&self, combinator: Combinator, left: &[NodeId]) -> Vec<NodeId> {
        let tree = self.tree;
        let mut frontier = Vec::new();

        match combinator {
            Combinator::Descendant => {
                // A candidate inside the subtree just walked adds nothing new.
                let mut covered: Option<NodeId> = None;
                for &id in left {
                    if covered.is_some_and(|root| tree.is_descendant_of(id, root)) {
                        continue;
                    }
                    covered = Some(id);
                    frontier.extend(tree.descendants(id));
                }
            }
            Combinator::Child => {
                for &id in left {
                    frontier.extend(tree.element_children(id));
                }
            }
            Combinator::NextSibling => {
                frontier.extend(left.iter().filter_map(|&id| tree.next_element_sibling(id)));
            }
            Combinator::SubsequentSibling => {
                let mut reached = HashSet::new();
                for &id in left {
                    // Already reached as a sibling of an earlier candidate.
                    if reached.contains(&id) {
                        continue;
                    }
                    for sibling in tree.following_siblings(id) {
                        if tree.is_element(sibling) && reached.insert(sibling) {
                            frontier.push(sibling);
                        }
                    }
                }
            }
        }

        self.sort_document_order(&mut frontier);
        log::trace!(
            target: "sift::eval",
            "{combinator:?}: {} candidates -> {} in frontier",
            left.len(),
            frontier.len()
        );
        frontier
    }
}
