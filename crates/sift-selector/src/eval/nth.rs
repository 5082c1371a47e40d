//! Sibling positions and the `An+B` formula.
//!
//! [§ 6.6.5 Structural pseudo-classes](https://www.w3.org/TR/selectors-3/#structural-pseudos)

use sift_dom::{DomTree, NodeId};

/// Which population an element is counted in, and from which end.
#[derive(Debug, Clone, Copy)]
pub(super) struct Population<'a> {
    /// Only siblings with this tag name (ASCII case-insensitive) are counted.
    pub of_type: Option<&'a str>,
    /// Count from the last sibling instead of the first.
    pub from_end: bool,
}

impl<'a> Population<'a> {
    pub(super) const fn children() -> Self {
        Self {
            of_type: None,
            from_end: false,
        }
    }

    pub(super) const fn of_type(tag: &'a str) -> Self {
        Self {
            of_type: Some(tag),
            from_end: false,
        }
    }

    pub(super) const fn reversed(self) -> Self {
        Self {
            from_end: !self.from_end,
            ..self
        }
    }
}

/// 1-based index of `id` among its parent's element children in `population`.
///
/// `None` when the element has no parent or is not part of the population.
pub(super) fn sibling_index(tree: &DomTree, id: NodeId, population: Population<'_>) -> Option<i64> {
    let parent = tree.parent(id)?;
    let in_population = |child: &NodeId| match population.of_type {
        Some(tag) => tree
            .tag_name(*child)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
        None => true,
    };

    let position = if population.from_end {
        tree.element_children(parent)
            .rev()
            .filter(in_population)
            .position(|child| child == id)
    } else {
        tree.element_children(parent)
            .filter(in_population)
            .position(|child| child == id)
    };
    position.and_then(|p| i64::try_from(p + 1).ok())
}

/// Whether `index = a*n + b` for some integer `n >= 0`.
///
/// With `a == 0` this is plain equality with `b`. Otherwise `index - b` must be
/// a multiple of `a` with a non-negative quotient, which covers negative `a`
/// (`-n+3` selects the first three) the same way as positive `a`.
#[must_use]
pub(super) const fn matches_formula(a: i64, b: i64, index: i64) -> bool {
    if a == 0 {
        return index == b;
    }
    let diff = index - b;
    diff % a == 0 && diff / a >= 0
}
